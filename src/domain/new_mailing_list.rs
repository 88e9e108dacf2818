use super::MailingListName;

pub struct NewMailingList {
    pub name: MailingListName,
}

impl TryFrom<String> for NewMailingList {
    type Error = String;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        let name = MailingListName::parse(name)?;
        Ok(Self { name })
    }
}
