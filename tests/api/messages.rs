use uuid::Uuid;
use wiremock::{
    Mock, ResponseTemplate,
    matchers::{any, body_partial_json, method, path},
};

use crate::helpers::{TestApp, assert_is_redirect_to, spawn_app};

fn message_form(action: &str) -> serde_json::Value {
    serde_json::json!({
        "subject": "Issue #1",
        "body": "Hello <subscribers>",
        "action": action,
    })
}

async fn message_count(app: &TestApp) -> i64 {
    let (messages,): (i64,) = sqlx::query_as("SELECT count(*) FROM messages")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    messages
}

#[tokio::test]
async fn the_message_form_offers_preview_and_save() {
    let app = spawn_app().await;
    app.login_test_user().await;
    let id = app.create_mailing_list("Rust weekly").await;

    let html_page = app.get_html(&format!("/mailinglist/{id}/message/new")).await;

    assert!(html_page.contains(r#"form name="message""#));
    assert!(html_page.contains(r#"value="preview""#));
    assert!(html_page.contains(r#"value="save""#));
}

#[tokio::test]
async fn previewing_a_message_renders_it_without_saving() {
    let app = spawn_app().await;
    app.login_test_user().await;
    let id = app.create_mailing_list("Rust weekly").await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let response = app
        .post_form(
            &format!("/mailinglist/{id}/message/new"),
            &message_form("preview"),
        )
        .await;

    assert_eq!(200, response.status().as_u16());
    let html_page = response.text().await.unwrap();
    assert!(html_page.contains("Message preview"));
    assert!(html_page.contains("Hello &lt;subscribers&gt;"));
    assert_eq!(message_count(&app).await, 0);
}

#[tokio::test]
async fn saving_a_message_delivers_it_to_confirmed_subscribers_only() {
    let app = spawn_app().await;
    app.login_test_user().await;
    let id = app.create_mailing_list("Rust weekly").await;
    app.create_confirmed_subscriber(id, "confirmed@example.com").await;
    app.create_unconfirmed_subscriber(id, "pending@example.com").await;

    Mock::given(path("v1/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app
        .post_form(&format!("/mailinglist/{id}/message/new"), &message_form("save"))
        .await;

    assert_is_redirect_to(&response, &format!("/mailinglist/{id}/manage"));
    assert_eq!(message_count(&app).await, 1);

    let email_request = app
        .email_server
        .received_requests()
        .await
        .unwrap()
        .pop()
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&email_request.body).unwrap();
    assert_eq!(body["subject"], "Issue #1");
    assert_eq!(body["to"][0]["email"], "confirmed@example.com");
    assert!(body["text"].as_str().unwrap().contains("Hello <subscribers>"));
    assert!(body["text"].as_str().unwrap().contains("/mailinglist/unsubscribe/"));

    let html_page = app.get_html(&format!("/mailinglist/{id}/manage")).await;
    assert!(html_page.contains("Issue #1"));
}

#[tokio::test]
async fn a_failed_delivery_does_not_fail_the_save() {
    let app = spawn_app().await;
    app.login_test_user().await;
    let id = app.create_mailing_list("Rust weekly").await;
    app.create_confirmed_subscriber(id, "confirmed@example.com").await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app
        .post_form(&format!("/mailinglist/{id}/message/new"), &message_form("save"))
        .await;

    assert_is_redirect_to(&response, &format!("/mailinglist/{id}/manage"));
    assert_eq!(message_count(&app).await, 1);
}

#[tokio::test]
async fn one_failing_recipient_does_not_stop_delivery_to_the_others() {
    let app = spawn_app().await;
    app.login_test_user().await;
    let id = app.create_mailing_list("Rust weekly").await;
    app.create_confirmed_subscriber(id, "bounces@example.com").await;
    app.create_confirmed_subscriber(id, "reader@example.com").await;

    Mock::given(path("v1/email"))
        .and(method("POST"))
        .and(body_partial_json(
            serde_json::json!({ "to": [{ "email": "bounces@example.com" }] }),
        ))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.email_server)
        .await;
    Mock::given(path("v1/email"))
        .and(method("POST"))
        .and(body_partial_json(
            serde_json::json!({ "to": [{ "email": "reader@example.com" }] }),
        ))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app
        .post_form(&format!("/mailinglist/{id}/message/new"), &message_form("save"))
        .await;

    assert_is_redirect_to(&response, &format!("/mailinglist/{id}/manage"));
    assert_eq!(message_count(&app).await, 1);

    let subscribers: Vec<(Uuid, String)> = sqlx::query_as("SELECT id, email FROM subscribers")
        .fetch_all(&app.db_pool)
        .await
        .unwrap();
    let message_bodies: Vec<serde_json::Value> = app
        .email_server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| serde_json::from_slice::<serde_json::Value>(&r.body).unwrap())
        .filter(|body| body["subject"] == "Issue #1")
        .collect();
    assert_eq!(message_bodies.len(), 2);

    for (subscriber_id, email) in subscribers {
        let body = message_bodies
            .iter()
            .find(|body| body["to"][0]["email"] == email.as_str())
            .unwrap();
        let unsubscribe_path = format!("/mailinglist/unsubscribe/{subscriber_id}");
        assert!(body["text"].as_str().unwrap().contains(&unsubscribe_path));
    }
}

#[tokio::test]
async fn an_unknown_action_is_rejected_with_a_400() {
    let app = spawn_app().await;
    app.login_test_user().await;
    let id = app.create_mailing_list("Rust weekly").await;

    let response = app
        .post_form(&format!("/mailinglist/{id}/message/new"), &message_form("publish"))
        .await;

    assert_eq!(400, response.status().as_u16());
    assert_eq!(message_count(&app).await, 0);
}

#[tokio::test]
async fn an_invalid_message_is_rejected_with_a_400() {
    let app = spawn_app().await;
    app.login_test_user().await;
    let id = app.create_mailing_list("Rust weekly").await;

    let response = app
        .post_form(
            &format!("/mailinglist/{id}/message/new"),
            &serde_json::json!({ "subject": "", "body": "   ", "action": "save" }),
        )
        .await;

    assert_eq!(400, response.status().as_u16());
    let html_page = response.text().await.unwrap();
    assert!(html_page.contains("The subject cannot be empty."));
    assert!(html_page.contains("The message body cannot be empty."));
    assert_eq!(message_count(&app).await, 0);
}

#[tokio::test]
async fn only_the_owner_can_post_or_read_messages() {
    let app = spawn_app().await;
    app.login_test_user().await;
    let id = app.create_mailing_list("Rust weekly").await;
    app.post_form(&format!("/mailinglist/{id}/message/new"), &message_form("save"))
        .await;
    let (message_id,): (Uuid,) = sqlx::query_as("SELECT id FROM messages")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();

    let html_page = app.get_html(&format!("/message/{message_id}")).await;
    assert!(html_page.contains("Issue #1"));
    app.post_logout().await;

    let password = Uuid::new_v4().to_string();
    app.post_form(
        "/user/register",
        &serde_json::json!({
            "username": "intruder",
            "password1": &password,
            "password2": &password,
        }),
    )
    .await;
    app.post_login(&serde_json::json!({ "username": "intruder", "password": &password }))
        .await;

    let response = app.get(&format!("/message/{message_id}")).await;
    assert_eq!(403, response.status().as_u16());

    let response = app
        .post_form(&format!("/mailinglist/{id}/message/new"), &message_form("save"))
        .await;
    assert_eq!(403, response.status().as_u16());
    assert_eq!(message_count(&app).await, 1);
}

#[tokio::test]
async fn unknown_messages_are_a_404() {
    let app = spawn_app().await;
    app.login_test_user().await;

    let response = app.get(&format!("/message/{}", Uuid::new_v4())).await;

    assert_eq!(404, response.status().as_u16());
}
