mod credentials;
mod mailing_list_name;
mod message_content;
mod new_mailing_list;
mod new_message;
mod new_subscriber;
mod records;
mod subscriber_email;

pub use credentials::{NewPassword, Username};
pub use mailing_list_name::MailingListName;
pub use message_content::{MessageBody, MessageSubject};
pub use new_mailing_list::NewMailingList;
pub use new_message::NewMessage;
pub use new_subscriber::NewSubscriber;
pub use records::{MailingList, Message, Subscriber};
pub use subscriber_email::SubscriberEmail;
