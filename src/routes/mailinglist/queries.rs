use anyhow::Context;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::MailingListError;
use crate::domain::{MailingList, Message, Subscriber};

#[tracing::instrument(name = "Fetching a mailing list", skip(pool))]
pub async fn get_mailing_list(pool: &PgPool, id: Uuid) -> Result<MailingList, MailingListError> {
    sqlx::query_as::<_, MailingList>(
        r#"
        SELECT id, name, owner_id FROM mailing_lists WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to read the mailing list from the database.")?
    .ok_or(MailingListError::NotFound("mailing list"))
}

/// Fails with `PermissionDenied` unless `user_id` may use the list.
pub async fn get_owned_mailing_list(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<MailingList, MailingListError> {
    let mailing_list = get_mailing_list(pool, id).await?;
    if !mailing_list.user_can_use_mailing_list(user_id) {
        tracing::warn!(mailing_list_id = %id, %user_id, "Mailing list access denied");
        return Err(MailingListError::PermissionDenied);
    }
    Ok(mailing_list)
}

#[tracing::instrument(name = "Fetching a subscriber", skip(pool))]
pub async fn get_subscriber(pool: &PgPool, id: Uuid) -> Result<Subscriber, MailingListError> {
    sqlx::query_as::<_, Subscriber>(
        r#"
        SELECT id, email, confirmed, mailing_list_id FROM subscribers WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to read the subscriber from the database.")?
    .ok_or(MailingListError::NotFound("subscriber"))
}

#[tracing::instrument(name = "Fetching subscribers of a mailing list", skip(executor))]
pub async fn get_subscribers<'e>(
    executor: impl PgExecutor<'e>,
    mailing_list_id: Uuid,
    only_confirmed: bool,
) -> Result<Vec<Subscriber>, sqlx::Error> {
    sqlx::query_as::<_, Subscriber>(
        r#"
        SELECT id, email, confirmed, mailing_list_id
        FROM subscribers
        WHERE mailing_list_id = $1 AND (confirmed OR NOT $2)
        ORDER BY subscribed_at
        "#,
    )
    .bind(mailing_list_id)
    .bind(only_confirmed)
    .fetch_all(executor)
    .await
}

#[tracing::instrument(name = "Fetching messages of a mailing list", skip(pool))]
pub async fn get_messages(pool: &PgPool, mailing_list_id: Uuid) -> Result<Vec<Message>, sqlx::Error> {
    sqlx::query_as::<_, Message>(
        r#"
        SELECT id, mailing_list_id, subject, body
        FROM messages
        WHERE mailing_list_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(mailing_list_id)
    .fetch_all(pool)
    .await
}
