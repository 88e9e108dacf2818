use actix_web::{HttpResponse, http::header::ContentType, web};
use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    MailingListError,
    queries::{get_mailing_list, get_subscriber},
};
use crate::{routes::helpers::see_other, templates::Templates};

pub async fn unsubscribe_form(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    templates: web::Data<Templates>,
) -> Result<HttpResponse, MailingListError> {
    let subscriber = get_subscriber(&pool, path.into_inner()).await?;
    let mailing_list = get_mailing_list(&pool, subscriber.mailing_list_id).await?;

    let mut ctx = tera::Context::new();
    ctx.insert("subscriber", &subscriber);
    ctx.insert("mailing_list", &mailing_list);
    let page = templates.render("mailinglist/unsubscribe.html", &ctx)?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(page))
}

#[tracing::instrument(name = "Unsubscribing a subscriber", skip(pool))]
pub async fn unsubscribe(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, MailingListError> {
    let subscriber = get_subscriber(&pool, path.into_inner()).await?;

    sqlx::query("DELETE FROM subscribers WHERE id = $1")
        .bind(subscriber.id)
        .execute(pool.get_ref())
        .await
        .context("Failed to delete the subscriber.")?;

    Ok(see_other(&format!(
        "/mailinglist/{}/subscribe",
        subscriber.mailing_list_id
    )))
}
