use actix_web::{HttpResponse, http::StatusCode, web};
use secrecy::SecretString;
use serde::Deserialize;
use sqlx::PgPool;

use crate::{
    authentication::{AuthError, register_user},
    domain::{NewPassword, Username},
    routes::helpers::{e500, render_page, render_page_with_status, see_other},
    templates::Templates,
};

#[derive(Deserialize)]
pub struct FormData {
    username: String,
    password1: SecretString,
    password2: SecretString,
}

pub async fn register_form(templates: web::Data<Templates>) -> Result<HttpResponse, actix_web::Error> {
    render_page(&templates, "user/register.html", &tera::Context::new())
}

#[tracing::instrument(
    name = "Registering a new user",
    skip(form, pool, templates),
    fields(username = %form.username)
)]
pub async fn register(
    form: web::Form<FormData>,
    pool: web::Data<PgPool>,
    templates: web::Data<Templates>,
) -> Result<HttpResponse, actix_web::Error> {
    let FormData {
        username,
        password1,
        password2,
    } = form.into_inner();

    let mut errors = Vec::new();
    let parsed_username = Username::parse(username.clone()).map_err(|e| errors.push(e)).ok();
    let password = NewPassword::parse(password1, password2)
        .map_err(|e| errors.push(e))
        .ok();

    let (Some(parsed_username), Some(password)) = (parsed_username, password) else {
        return invalid_form(&templates, &username, errors);
    };

    match register_user(&parsed_username, password.into_secret(), &pool).await {
        Ok(_) => Ok(see_other("/user/login")),
        Err(AuthError::UsernameTaken) => invalid_form(
            &templates,
            &username,
            vec!["A user with that username already exists.".into()],
        ),
        Err(e) => Err(e500(e)),
    }
}

fn invalid_form(
    templates: &Templates,
    username: &str,
    errors: Vec<String>,
) -> Result<HttpResponse, actix_web::Error> {
    let mut ctx = tera::Context::new();
    ctx.insert("username", username);
    ctx.insert("errors", &errors);
    render_page_with_status(templates, "user/register.html", &ctx, StatusCode::BAD_REQUEST)
}
