//! Rendering and delivery of the emails sent to subscribers.
//!
//! Every email shares a common template context: the subscriber, their
//! mailing list and a personal unsubscribe link. Callers add their own
//! entries on top of it.

use anyhow::Context;
use serde::Serialize;
use tera::Context as TeraContext;

use crate::{
    domain::{MailingList, Message, Subscriber, SubscriberEmail},
    email_client::{EmailClient, EmailContent},
    templates::Templates,
};

pub fn unsubscribe_path(subscriber: &Subscriber) -> String {
    format!("/mailinglist/unsubscribe/{}", subscriber.id)
}

pub fn confirmation_path(subscriber: &Subscriber) -> String {
    format!("/mailinglist/subscribe/confirm/{}", subscriber.id)
}

pub struct EmailTemplateContext {
    ctx: TeraContext,
}

impl EmailTemplateContext {
    pub fn make_link(link_domain: &str, path: &str) -> String {
        format!("{link_domain}{path}")
    }

    pub fn new(subscriber: &Subscriber, mailing_list: &MailingList, link_domain: &str) -> Self {
        let mut ctx = TeraContext::new();
        ctx.insert("subscriber", subscriber);
        ctx.insert("mailing_list", mailing_list);
        ctx.insert(
            "unsubscribe_link",
            &Self::make_link(link_domain, &unsubscribe_path(subscriber)),
        );
        Self { ctx }
    }

    /// Later entries replace common ones with the same key.
    pub fn insert<T: Serialize + ?Sized>(mut self, key: &str, value: &T) -> Self {
        self.ctx.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&tera::Value> {
        self.ctx.get(key)
    }

    fn render(
        &self,
        templates: &Templates,
        name: &str,
        subject: String,
    ) -> Result<EmailContent, tera::Error> {
        Ok(EmailContent {
            subject,
            html: templates.render(&format!("{name}.html"), &self.ctx)?,
            text: templates.render(&format!("{name}.txt"), &self.ctx)?,
        })
    }
}

pub fn confirmation_email(
    templates: &Templates,
    link_domain: &str,
    subscriber: &Subscriber,
    mailing_list: &MailingList,
) -> Result<EmailContent, tera::Error> {
    let confirmation_link =
        EmailTemplateContext::make_link(link_domain, &confirmation_path(subscriber));
    EmailTemplateContext::new(subscriber, mailing_list, link_domain)
        .insert("confirmation_link", &confirmation_link)
        .render(
            templates,
            "emails/subscriber_confirmation",
            format!("Confirming subscription to {}", mailing_list.name),
        )
}

pub fn message_email(
    templates: &Templates,
    link_domain: &str,
    message: &Message,
    subscriber: &Subscriber,
    mailing_list: &MailingList,
) -> Result<EmailContent, tera::Error> {
    EmailTemplateContext::new(subscriber, mailing_list, link_domain)
        .insert("message", message)
        .render(templates, "emails/message", message.subject.clone())
}

#[tracing::instrument(
    name = "Sending a confirmation email to a new subscriber",
    skip_all,
    fields(subscriber_id = %subscriber.id)
)]
pub async fn send_confirmation_email(
    email_client: &EmailClient,
    templates: &Templates,
    link_domain: &str,
    subscriber: &Subscriber,
    mailing_list: &MailingList,
) -> Result<(), anyhow::Error> {
    let recipient = SubscriberEmail::parse(subscriber.email.clone()).map_err(anyhow::Error::msg)?;
    let content = confirmation_email(templates, link_domain, subscriber, mailing_list)
        .context("Failed to render the confirmation email.")?;
    email_client
        .send_email(&recipient, &content)
        .await
        .context("Failed to send the confirmation email.")
}

#[tracing::instrument(
    name = "Sending a message to a subscriber",
    skip_all,
    fields(message_id = %message.id, subscriber_id = %subscriber.id)
)]
pub async fn send_message(
    email_client: &EmailClient,
    templates: &Templates,
    link_domain: &str,
    message: &Message,
    subscriber: &Subscriber,
    mailing_list: &MailingList,
) -> Result<(), anyhow::Error> {
    let recipient = SubscriberEmail::parse(subscriber.email.clone()).map_err(anyhow::Error::msg)?;
    let content = message_email(templates, link_domain, message, subscriber, mailing_list)
        .context("Failed to render the message email.")?;
    email_client
        .send_email(&recipient, &content)
        .await
        .with_context(|| format!("Failed to send message {} to {}", message.id, recipient))
}
