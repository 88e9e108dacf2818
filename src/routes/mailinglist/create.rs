use actix_web::{HttpResponse, http::StatusCode, web};
use anyhow::Context;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::MailingListError;
use crate::{
    authentication::UserId,
    domain::NewMailingList,
    routes::helpers::{render_page, render_page_with_status, see_other},
    templates::Templates,
};

#[derive(Deserialize)]
pub struct FormData {
    name: String,
}

const TEMPLATE: &str = "mailinglist/mailinglist_form.html";

pub async fn create_mailing_list_form(
    templates: web::Data<Templates>,
) -> Result<HttpResponse, actix_web::Error> {
    render_page(&templates, TEMPLATE, &tera::Context::new())
}

#[tracing::instrument(
    name = "Creating a mailing list",
    skip(form, pool, templates, user_id),
    fields(user_id = %*user_id, name = %form.name)
)]
pub async fn create_mailing_list(
    form: web::Form<FormData>,
    user_id: web::ReqData<UserId>,
    pool: web::Data<PgPool>,
    templates: web::Data<Templates>,
) -> Result<HttpResponse, actix_web::Error> {
    let name = form.into_inner().name;
    let new_list = match NewMailingList::try_from(name.clone()) {
        Ok(new_list) => new_list,
        Err(e) => {
            let mut ctx = tera::Context::new();
            ctx.insert("name", &name);
            ctx.insert("errors", &[e]);
            return render_page_with_status(&templates, TEMPLATE, &ctx, StatusCode::BAD_REQUEST);
        }
    };

    let id = insert_mailing_list(&pool, &new_list, **user_id)
        .await
        .context("Failed to store the new mailing list.")
        .map_err(MailingListError::UnexpectedError)?;

    Ok(see_other(&format!("/mailinglist/{id}/manage")))
}

#[tracing::instrument(name = "Saving new mailing list in the database", skip(pool, new_list))]
async fn insert_mailing_list(
    pool: &PgPool,
    new_list: &NewMailingList,
    owner_id: Uuid,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO mailing_lists (id, name, owner_id, created_at)
        VALUES ($1, $2, $3, now())
        "#,
    )
    .bind(id)
    .bind(new_list.name.as_ref())
    .bind(owner_id)
    .execute(pool)
    .await?;
    Ok(id)
}
