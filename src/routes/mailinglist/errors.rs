use actix_web::{ResponseError, http::StatusCode};

use crate::routes::helpers::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum MailingListError {
    #[error("No such {0}.")]
    NotFound(&'static str),
    #[error("You are not allowed to use this mailing list.")]
    PermissionDenied,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for MailingListError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for MailingListError {
    fn status_code(&self) -> StatusCode {
        match self {
            MailingListError::NotFound(_) => StatusCode::NOT_FOUND,
            MailingListError::PermissionDenied => StatusCode::FORBIDDEN,
            MailingListError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<tera::Error> for MailingListError {
    fn from(e: tera::Error) -> Self {
        MailingListError::UnexpectedError(anyhow::Error::new(e).context("Failed to render a page."))
    }
}
