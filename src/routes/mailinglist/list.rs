use actix_web::{HttpResponse, web};
use actix_web_flash_messages::IncomingFlashMessages;
use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::MailingListError;
use crate::{
    authentication::UserId,
    domain::MailingList,
    routes::helpers::{get_message, render_page},
    templates::Templates,
};

#[tracing::instrument(name = "Listing mailing lists", skip_all, fields(user_id = %*user_id))]
pub async fn mailing_list_list(
    user_id: web::ReqData<UserId>,
    pool: web::Data<PgPool>,
    templates: web::Data<Templates>,
    flash_messages: IncomingFlashMessages,
) -> Result<HttpResponse, actix_web::Error> {
    let mailing_lists = get_owned_mailing_lists(&pool, **user_id)
        .await
        .context("Failed to read mailing lists from the database.")
        .map_err(MailingListError::UnexpectedError)?;

    let mut ctx = tera::Context::new();
    ctx.insert("mailinglist_list", &mailing_lists);
    ctx.insert("messages", &get_message(&flash_messages));
    render_page(&templates, "mailinglist/mailinglist_list.html", &ctx)
}

async fn get_owned_mailing_lists(
    pool: &PgPool,
    owner_id: Uuid,
) -> Result<Vec<MailingList>, sqlx::Error> {
    sqlx::query_as::<_, MailingList>(
        r#"
        SELECT id, name, owner_id
        FROM mailing_lists
        WHERE owner_id = $1
        ORDER BY created_at
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await
}
