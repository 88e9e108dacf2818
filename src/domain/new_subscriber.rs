use super::SubscriberEmail;

pub struct NewSubscriber {
    pub email: SubscriberEmail,
}

impl TryFrom<String> for NewSubscriber {
    type Error = String;

    fn try_from(email: String) -> Result<Self, Self::Error> {
        let email = SubscriberEmail::parse(email)?;
        Ok(Self { email })
    }
}
