use actix_web::{HttpResponse, http::StatusCode, http::header::ContentType, web};
use anyhow::Context;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{MailingListError, queries::get_mailing_list};
use crate::{
    domain::{MailingList, NewSubscriber, Subscriber},
    email_client::EmailClient,
    emails::send_confirmation_email,
    routes::helpers::see_other,
    startup::ApplicationBaseURL,
    templates::Templates,
};

#[derive(Deserialize)]
pub struct FormData {
    pub email: String,
}

const TEMPLATE: &str = "mailinglist/subscriber_form.html";

pub async fn subscribe_form(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    templates: web::Data<Templates>,
) -> Result<HttpResponse, MailingListError> {
    let mailing_list = get_mailing_list(&pool, path.into_inner()).await?;
    render_form(&templates, &mailing_list, "", &[], StatusCode::OK)
}

#[tracing::instrument(
    name = "Adding a new subscriber.",
    skip(form, pool, email_client, templates, base_url),
    fields(subscriber_email = %form.email)
)]
pub async fn subscribe(
    path: web::Path<Uuid>,
    form: web::Form<FormData>,
    pool: web::Data<PgPool>,
    email_client: web::Data<EmailClient>,
    templates: web::Data<Templates>,
    base_url: web::Data<ApplicationBaseURL>,
) -> Result<HttpResponse, MailingListError> {
    let mailing_list = get_mailing_list(&pool, path.into_inner()).await?;
    let raw_email = form.into_inner().email;

    let new_subscriber = match NewSubscriber::try_from(raw_email.clone()) {
        Ok(new_subscriber) => new_subscriber,
        Err(e) => {
            return render_form(
                &templates,
                &mailing_list,
                &raw_email,
                &[e],
                StatusCode::BAD_REQUEST,
            );
        }
    };

    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool.")?;

    let subscriber = match insert_subscriber(&mut transaction, &new_subscriber, mailing_list.id)
        .await
    {
        Ok(subscriber) => subscriber,
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            let error = format!(
                "{} is already subscribed to this mailing list.",
                new_subscriber.email
            );
            return render_form(
                &templates,
                &mailing_list,
                &raw_email,
                &[error],
                StatusCode::BAD_REQUEST,
            );
        }
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context("Failed to insert a new subscriber in the database.")
                .into());
        }
    };

    send_confirmation_email(&email_client, &templates, &base_url.0, &subscriber, &mailing_list)
        .await?;

    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to store a new subscriber.")?;

    Ok(see_other(&format!("/mailinglist/{}/thankyou", mailing_list.id)))
}

pub async fn thank_you_for_subscribing(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    templates: web::Data<Templates>,
) -> Result<HttpResponse, MailingListError> {
    let mailing_list = get_mailing_list(&pool, path.into_inner()).await?;

    let mut ctx = tera::Context::new();
    ctx.insert("mailinglist", &mailing_list);
    let page = templates.render("mailinglist/subscription_thankyou.html", &ctx)?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(page))
}

fn render_form(
    templates: &Templates,
    mailing_list: &MailingList,
    email: &str,
    errors: &[String],
    status: StatusCode,
) -> Result<HttpResponse, MailingListError> {
    let mut ctx = tera::Context::new();
    ctx.insert("mailing_list", mailing_list);
    ctx.insert("email", email);
    ctx.insert("errors", errors);
    let page = templates.render(TEMPLATE, &ctx)?;
    Ok(HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(page))
}

#[tracing::instrument(
    name = "Saving new subscriber details in the database",
    skip(new_subscriber, transaction)
)]
async fn insert_subscriber(
    transaction: &mut Transaction<'_, Postgres>,
    new_subscriber: &NewSubscriber,
    mailing_list_id: Uuid,
) -> Result<Subscriber, sqlx::Error> {
    sqlx::query_as::<_, Subscriber>(
        r#"
        INSERT INTO subscribers (id, email, confirmed, mailing_list_id, subscribed_at)
        VALUES ($1, $2, false, $3, now())
        RETURNING id, email, confirmed, mailing_list_id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new_subscriber.email.as_ref())
    .bind(mailing_list_id)
    .fetch_one(&mut **transaction)
    .await
}
