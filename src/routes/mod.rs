mod health_check;
pub mod helpers;
mod home;
mod mailinglist;
mod user;

pub use health_check::health_check;
pub use home::home;
pub use mailinglist::*;
pub use user::*;
