use uuid::Uuid;

use crate::helpers::{assert_is_redirect_to, spawn_app};

#[tokio::test]
async fn register_form_is_served_to_anonymous_visitors() {
    let app = spawn_app().await;

    let html_page = app.get_html("/user/register").await;

    assert!(html_page.contains(r#"form name="register""#));
}

#[tokio::test]
async fn a_valid_registration_stores_a_hashed_password() {
    let app = spawn_app().await;
    let password = Uuid::new_v4().to_string();

    let response = app
        .post_form(
            "/user/register",
            &serde_json::json!({
                "username": "ursula",
                "password1": &password,
                "password2": &password,
            }),
        )
        .await;

    assert_is_redirect_to(&response, "/user/login");

    let (stored_hash,): (String,) =
        sqlx::query_as("SELECT password_hash FROM users WHERE username = 'ursula'")
            .fetch_one(&app.db_pool)
            .await
            .expect("Failed to fetch the registered user.");
    assert!(stored_hash.starts_with("$argon2id$"));
    assert_ne!(stored_hash, password);
}

#[tokio::test]
async fn a_registered_user_can_log_in() {
    let app = spawn_app().await;
    let password = Uuid::new_v4().to_string();
    app.post_form(
        "/user/register",
        &serde_json::json!({
            "username": "ursula",
            "password1": &password,
            "password2": &password,
        }),
    )
    .await;

    let response = app
        .post_login(&serde_json::json!({ "username": "ursula", "password": &password }))
        .await;

    assert_is_redirect_to(&response, "/mailinglist/");
}

#[tokio::test]
async fn invalid_registrations_are_rejected_with_a_400() {
    let app = spawn_app().await;
    let test_cases = vec![
        (
            serde_json::json!({"username": "ursula", "password1": "a-long-password", "password2": "another-password"}),
            "The two password fields didn&#x27;t match.",
        ),
        (
            serde_json::json!({"username": "ursula", "password1": "short", "password2": "short"}),
            "This password is too short.",
        ),
        (
            serde_json::json!({"username": "ursula", "password1": "123456789", "password2": "123456789"}),
            "This password is entirely numeric.",
        ),
        (
            serde_json::json!({"username": "ursula le guin", "password1": "a-long-password", "password2": "a-long-password"}),
            "Enter a valid username.",
        ),
    ];

    for (body, expected_error) in test_cases {
        let response = app.post_form("/user/register", &body).await;

        assert_eq!(400, response.status().as_u16(), "payload: {body}");
        let html_page = response.text().await.unwrap();
        assert!(
            html_page.contains(expected_error),
            "`{expected_error}` missing for payload {body}"
        );
    }

    let (users,): (i64,) = sqlx::query_as("SELECT count(*) FROM users")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(users, 1, "Only the test user should exist");
}

#[tokio::test]
async fn a_taken_username_is_a_form_error() {
    let app = spawn_app().await;

    let response = app
        .post_form(
            "/user/register",
            &serde_json::json!({
                "username": &app.test_user.username,
                "password1": "a-long-password",
                "password2": "a-long-password",
            }),
        )
        .await;

    assert_eq!(400, response.status().as_u16());
    assert!(
        response
            .text()
            .await
            .unwrap()
            .contains("A user with that username already exists.")
    );
}

#[tokio::test]
async fn an_error_flash_message_is_set_on_failure() {
    let app = spawn_app().await;

    let response = app
        .post_login(&serde_json::json!({
            "username": "random-username",
            "password": "random-password"
        }))
        .await;
    assert_is_redirect_to(&response, "/user/login");

    let html_page = app.get_html("/user/login").await;
    assert!(html_page.contains("Authentication failed"));

    let html_page = app.get_html("/user/login").await;
    assert!(!html_page.contains("Authentication failed"));
}

#[tokio::test]
async fn logout_clears_session_state() {
    let app = spawn_app().await;
    app.login_test_user().await;

    let response = app.get("/mailinglist/").await;
    assert_eq!(200, response.status().as_u16());

    let response = app.post_logout().await;
    assert_is_redirect_to(&response, "/user/login");

    let html_page = app.get_html("/user/login").await;
    assert!(html_page.contains("You have successfully logged out."));

    let response = app.get("/mailinglist/").await;
    assert_is_redirect_to(&response, "/user/login");
}
