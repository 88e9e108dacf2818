use super::{MessageBody, MessageSubject};

#[derive(Debug)]
pub struct NewMessage {
    pub subject: MessageSubject,
    pub body: MessageBody,
}

impl NewMessage {
    /// Collects every field error instead of stopping at the first one.
    pub fn parse(subject: String, body: String) -> Result<Self, Vec<String>> {
        match (MessageSubject::parse(subject), MessageBody::parse(body)) {
            (Ok(subject), Ok(body)) => Ok(Self { subject, body }),
            (subject, body) => Err(subject.err().into_iter().chain(body.err()).collect()),
        }
    }
}
