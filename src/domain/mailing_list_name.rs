use unicode_segmentation::UnicodeSegmentation;

pub const MAX_NAME_LENGTH: usize = 140;

#[derive(Debug, Clone)]
pub struct MailingListName(String);

impl MailingListName {
    pub fn parse(s: String) -> Result<Self, String> {
        let s = s.trim().to_string();
        if s.is_empty() {
            return Err("The mailing list name cannot be empty.".into());
        }
        if s.graphemes(true).count() > MAX_NAME_LENGTH {
            return Err(format!(
                "The mailing list name cannot be longer than {MAX_NAME_LENGTH} characters."
            ));
        }
        Ok(Self(s))
    }
}

impl AsRef<str> for MailingListName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
