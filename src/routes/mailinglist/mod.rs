mod confirm;
mod create;
mod delete;
mod detail;
mod errors;
mod list;
mod message;
mod queries;
mod subscribe;
mod unsubscribe;

pub use confirm::confirm_subscription;
pub use create::{create_mailing_list, create_mailing_list_form};
pub use delete::{delete_mailing_list, delete_mailing_list_form};
pub use detail::mailing_list_detail;
pub use errors::MailingListError;
pub use list::mailing_list_list;
pub use message::{create_message, create_message_form, message_detail};
pub use subscribe::{subscribe, subscribe_form, thank_you_for_subscribing};
pub use unsubscribe::{unsubscribe, unsubscribe_form};
