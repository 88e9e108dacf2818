use std::error::Error;
use std::fmt::Write;

use actix_web::{
    HttpResponse,
    http::{StatusCode, header::ContentType, header::LOCATION},
};
use actix_web_flash_messages::IncomingFlashMessages;

use crate::templates::Templates;

pub fn error_chain_fmt(e: &impl Error, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    writeln!(f, "{e}\n")?;
    let mut current = e.source();

    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{cause}")?;
        current = cause.source();
    }

    Ok(())
}

pub fn render_page(
    templates: &Templates,
    template_name: &str,
    ctx: &tera::Context,
) -> Result<HttpResponse, actix_web::Error> {
    render_page_with_status(templates, template_name, ctx, StatusCode::OK)
}

/// Used to re-render a form that failed validation.
pub fn render_page_with_status(
    templates: &Templates,
    template_name: &str,
    ctx: &tera::Context,
    status: StatusCode,
) -> Result<HttpResponse, actix_web::Error> {
    let page = templates.render(template_name, ctx).map_err(e500)?;
    Ok(HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(page))
}

pub fn e500<T>(e: T) -> actix_web::Error
where
    T: std::fmt::Debug + std::fmt::Display + 'static,
{
    actix_web::error::ErrorInternalServerError(e)
}

pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location))
        .finish()
}

pub fn get_message(flash_messages: &IncomingFlashMessages) -> String {
    let mut message = String::new();
    for m in flash_messages.iter() {
        let _ = writeln!(message, "{}", m.content());
    }
    message
}
