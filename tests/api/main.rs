mod mailing_lists;
mod messages;
mod user;
