use actix_web::{HttpResponse, http::header::ContentType, web};
use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::{MailingListError, queries::get_mailing_list};
use crate::{domain::Subscriber, templates::Templates};

#[tracing::instrument(name = "Confirm a pending subscriber", skip(pool, templates))]
pub async fn confirm_subscription(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    templates: web::Data<Templates>,
) -> Result<HttpResponse, MailingListError> {
    let subscriber = mark_subscriber_as_confirmed(&pool, path.into_inner())
        .await
        .context("Failed to confirm the subscriber.")?
        .ok_or(MailingListError::NotFound("subscriber"))?;
    let mailing_list = get_mailing_list(&pool, subscriber.mailing_list_id).await?;

    let mut ctx = tera::Context::new();
    ctx.insert("subscriber", &subscriber);
    ctx.insert("mailing_list", &mailing_list);
    let page = templates.render("mailinglist/confirm_subscription.html", &ctx)?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(page))
}

/// Confirming twice is harmless.
#[tracing::instrument(name = "Mark subscriber as confirmed", skip(pool))]
async fn mark_subscriber_as_confirmed(
    pool: &PgPool,
    subscriber_id: Uuid,
) -> Result<Option<Subscriber>, sqlx::Error> {
    sqlx::query_as::<_, Subscriber>(
        r#"
        UPDATE subscribers SET confirmed = true WHERE id = $1
        RETURNING id, email, confirmed, mailing_list_id
        "#,
    )
    .bind(subscriber_id)
    .fetch_optional(pool)
    .await
}
