use unicode_segmentation::UnicodeSegmentation;

pub const MAX_SUBJECT_LENGTH: usize = 140;

#[derive(Debug, Clone)]
pub struct MessageSubject(String);

impl MessageSubject {
    pub fn parse(s: String) -> Result<Self, String> {
        let s = s.trim().to_string();
        if s.is_empty() {
            return Err("The subject cannot be empty.".into());
        }
        if s.graphemes(true).count() > MAX_SUBJECT_LENGTH {
            return Err(format!(
                "The subject cannot be longer than {MAX_SUBJECT_LENGTH} characters."
            ));
        }
        Ok(Self(s))
    }
}

impl AsRef<str> for MessageSubject {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct MessageBody(String);

impl MessageBody {
    pub fn parse(s: String) -> Result<Self, String> {
        if s.trim().is_empty() {
            return Err("The message body cannot be empty.".into());
        }
        Ok(Self(s))
    }
}

impl AsRef<str> for MessageBody {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
