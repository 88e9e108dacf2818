use uuid::Uuid;

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct MailingList {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
}

impl MailingList {
    pub fn user_can_use_mailing_list(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }
}

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct Subscriber {
    pub id: Uuid,
    pub email: String,
    pub confirmed: bool,
    pub mailing_list_id: Uuid,
}

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct Message {
    pub id: Uuid,
    pub mailing_list_id: Uuid,
    pub subject: String,
    pub body: String,
}
