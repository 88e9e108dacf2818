use actix_web::{HttpResponse, http::StatusCode, http::header::ContentType, web};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    MailingListError,
    queries::{get_owned_mailing_list, get_subscribers},
};
use crate::{
    authentication::UserId,
    domain::{MailingList, Message, NewMessage},
    email_client::EmailClient,
    emails::send_message,
    routes::helpers::see_other,
    startup::ApplicationBaseURL,
    templates::Templates,
};

pub const SAVE_ACTION: &str = "save";
pub const PREVIEW_ACTION: &str = "preview";

const TEMPLATE: &str = "mailinglist/message_form.html";

#[derive(Deserialize)]
pub struct FormData {
    subject: String,
    body: String,
    action: String,
}

/// What the message form is showing besides its inputs.
#[derive(Default)]
struct MessageForm<'a> {
    subject: &'a str,
    body: &'a str,
    errors: Vec<String>,
    preview: Option<&'a NewMessage>,
}

#[derive(Serialize)]
struct Preview<'a> {
    subject: &'a str,
    body: &'a str,
}

pub async fn create_message_form(
    path: web::Path<Uuid>,
    user_id: web::ReqData<UserId>,
    pool: web::Data<PgPool>,
    templates: web::Data<Templates>,
) -> Result<HttpResponse, MailingListError> {
    let mailing_list = get_owned_mailing_list(&pool, path.into_inner(), **user_id).await?;
    render_form(
        &templates,
        &mailing_list,
        MessageForm::default(),
        StatusCode::OK,
    )
}

#[tracing::instrument(
    name = "Creating a message",
    skip(form, user_id, pool, email_client, templates, base_url),
    fields(user_id = %*user_id, action = %form.action)
)]
pub async fn create_message(
    path: web::Path<Uuid>,
    form: web::Form<FormData>,
    user_id: web::ReqData<UserId>,
    pool: web::Data<PgPool>,
    email_client: web::Data<EmailClient>,
    templates: web::Data<Templates>,
    base_url: web::Data<ApplicationBaseURL>,
) -> Result<HttpResponse, actix_web::Error> {
    let mailing_list = get_owned_mailing_list(&pool, path.into_inner(), **user_id).await?;
    let FormData {
        subject,
        body,
        action,
    } = form.into_inner();

    let new_message = match NewMessage::parse(subject.clone(), body.clone()) {
        Ok(new_message) => new_message,
        Err(errors) => {
            let form = MessageForm {
                subject: &subject,
                body: &body,
                errors,
                preview: None,
            };
            return Ok(render_form(
                &templates,
                &mailing_list,
                form,
                StatusCode::BAD_REQUEST,
            )?);
        }
    };

    match action.as_str() {
        PREVIEW_ACTION => {
            let form = MessageForm {
                subject: &subject,
                body: &body,
                errors: Vec::new(),
                preview: Some(&new_message),
            };
            Ok(render_form(&templates, &mailing_list, form, StatusCode::OK)?)
        }
        SAVE_ACTION => {
            let message = insert_message(&pool, &new_message, mailing_list.id)
                .await
                .context("Failed to store the new message.")
                .map_err(MailingListError::UnexpectedError)?;

            deliver_message(&pool, &email_client, &templates, &base_url.0, &message, &mailing_list)
                .await
                .map_err(MailingListError::UnexpectedError)?;

            Ok(see_other(&format!("/mailinglist/{}/manage", mailing_list.id)))
        }
        other => Err(actix_web::error::ErrorBadRequest(format!(
            "Unknown message action `{other}`."
        ))),
    }
}

#[tracing::instrument(name = "Showing a message", skip(pool, templates, user_id))]
pub async fn message_detail(
    path: web::Path<Uuid>,
    user_id: web::ReqData<UserId>,
    pool: web::Data<PgPool>,
    templates: web::Data<Templates>,
) -> Result<HttpResponse, MailingListError> {
    let message = get_message(&pool, path.into_inner())
        .await
        .context("Failed to read the message from the database.")?
        .ok_or(MailingListError::NotFound("message"))?;
    let mailing_list = get_owned_mailing_list(&pool, message.mailing_list_id, **user_id).await?;

    let mut ctx = tera::Context::new();
    ctx.insert("message", &message);
    ctx.insert("mailing_list", &mailing_list);
    let page = templates.render("mailinglist/message_detail.html", &ctx)?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(page))
}

fn render_form(
    templates: &Templates,
    mailing_list: &MailingList,
    form: MessageForm<'_>,
    status: StatusCode,
) -> Result<HttpResponse, MailingListError> {
    let mut ctx = tera::Context::new();
    ctx.insert("mailing_list", mailing_list);
    ctx.insert("SAVE_ACTION", SAVE_ACTION);
    ctx.insert("PREVIEW_ACTION", PREVIEW_ACTION);
    ctx.insert("subject", form.subject);
    ctx.insert("body", form.body);
    ctx.insert("errors", &form.errors);
    if let Some(preview) = form.preview {
        ctx.insert(
            "message",
            &Preview {
                subject: preview.subject.as_ref(),
                body: preview.body.as_ref(),
            },
        );
    }
    let page = templates.render(TEMPLATE, &ctx)?;
    Ok(HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(page))
}

#[tracing::instrument(name = "Saving new message in the database", skip(pool, new_message))]
async fn insert_message(
    pool: &PgPool,
    new_message: &NewMessage,
    mailing_list_id: Uuid,
) -> Result<Message, sqlx::Error> {
    sqlx::query_as::<_, Message>(
        r#"
        INSERT INTO messages (id, mailing_list_id, subject, body, created_at)
        VALUES ($1, $2, $3, $4, now())
        RETURNING id, mailing_list_id, subject, body
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(mailing_list_id)
    .bind(new_message.subject.as_ref())
    .bind(new_message.body.as_ref())
    .fetch_one(pool)
    .await
}

async fn get_message(pool: &PgPool, id: Uuid) -> Result<Option<Message>, sqlx::Error> {
    sqlx::query_as::<_, Message>(
        r#"
        SELECT id, mailing_list_id, subject, body FROM messages WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Sends the message to every confirmed subscriber. A failed recipient is
/// logged and skipped.
#[tracing::instrument(
    name = "Delivering a message to confirmed subscribers",
    skip_all,
    fields(message_id = %message.id, delivered = tracing::field::Empty)
)]
async fn deliver_message(
    pool: &PgPool,
    email_client: &EmailClient,
    templates: &Templates,
    link_domain: &str,
    message: &Message,
    mailing_list: &MailingList,
) -> Result<(), anyhow::Error> {
    let subscribers = get_subscribers(pool, mailing_list.id, true)
        .await
        .context("Failed to read confirmed subscribers.")?;

    let mut delivered = 0usize;
    for subscriber in &subscribers {
        match send_message(email_client, templates, link_domain, message, subscriber, mailing_list)
            .await
        {
            Ok(()) => delivered += 1,
            Err(e) => {
                tracing::warn!(
                    error.cause_chain = ?e,
                    subscriber_id = %subscriber.id,
                    "Skipping a confirmed subscriber. The message could not be delivered."
                );
            }
        }
    }
    tracing::Span::current().record("delivered", delivered);

    Ok(())
}
