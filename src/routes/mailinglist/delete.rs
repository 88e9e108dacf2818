use actix_web::{HttpResponse, web};
use actix_web_flash_messages::FlashMessage;
use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::{MailingListError, queries::get_owned_mailing_list};
use crate::{authentication::UserId, routes::helpers::see_other, templates::Templates};

pub async fn delete_mailing_list_form(
    path: web::Path<Uuid>,
    user_id: web::ReqData<UserId>,
    pool: web::Data<PgPool>,
    templates: web::Data<Templates>,
) -> Result<HttpResponse, MailingListError> {
    let mailing_list = get_owned_mailing_list(&pool, path.into_inner(), **user_id).await?;

    let mut ctx = tera::Context::new();
    ctx.insert("mailinglist", &mailing_list);
    let page = templates.render("mailinglist/mailinglist_confirm_delete.html", &ctx)?;
    Ok(HttpResponse::Ok()
        .content_type(actix_web::http::header::ContentType::html())
        .body(page))
}

#[tracing::instrument(name = "Deleting a mailing list", skip(pool, user_id), fields(user_id = %*user_id))]
pub async fn delete_mailing_list(
    path: web::Path<Uuid>,
    user_id: web::ReqData<UserId>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, MailingListError> {
    let mailing_list = get_owned_mailing_list(&pool, path.into_inner(), **user_id).await?;

    sqlx::query("DELETE FROM mailing_lists WHERE id = $1")
        .bind(mailing_list.id)
        .execute(pool.get_ref())
        .await
        .context("Failed to delete the mailing list.")?;

    FlashMessage::info(format!("Deleted mailing list {}.", mailing_list.name)).send();
    Ok(see_other("/mailinglist/"))
}
