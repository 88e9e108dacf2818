use actix_web::{HttpResponse, http::header::ContentType, web};
use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    MailingListError,
    queries::{get_messages, get_owned_mailing_list, get_subscribers},
};
use crate::{authentication::UserId, startup::ApplicationBaseURL, templates::Templates};

#[tracing::instrument(name = "Managing a mailing list", skip(pool, templates, base_url, user_id))]
pub async fn mailing_list_detail(
    path: web::Path<Uuid>,
    user_id: web::ReqData<UserId>,
    pool: web::Data<PgPool>,
    templates: web::Data<Templates>,
    base_url: web::Data<ApplicationBaseURL>,
) -> Result<HttpResponse, MailingListError> {
    let mailing_list = get_owned_mailing_list(&pool, path.into_inner(), **user_id).await?;
    let subscribers = get_subscribers(pool.get_ref(), mailing_list.id, false)
        .await
        .context("Failed to read subscribers from the database.")?;
    let messages = get_messages(&pool, mailing_list.id)
        .await
        .context("Failed to read messages from the database.")?;

    let mut ctx = tera::Context::new();
    ctx.insert(
        "subscribe_link",
        &format!("{}/mailinglist/{}/subscribe", base_url.0, mailing_list.id),
    );
    ctx.insert("mailinglist", &mailing_list);
    ctx.insert("subscribers", &subscribers);
    ctx.insert("message_list", &messages);
    let page = templates.render("mailinglist/mailinglist_detail.html", &ctx)?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(page))
}
