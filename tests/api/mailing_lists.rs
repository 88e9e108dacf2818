use uuid::Uuid;

use crate::helpers::{TestUser, assert_is_redirect_to, spawn_app};

#[tokio::test]
async fn you_must_be_logged_in_to_manage_mailing_lists() {
    let app = spawn_app().await;
    let id = Uuid::new_v4();

    for route in [
        "/mailinglist/".to_string(),
        "/mailinglist/new".to_string(),
        format!("/mailinglist/{id}/manage"),
        format!("/mailinglist/{id}/delete"),
        format!("/mailinglist/{id}/message/new"),
        format!("/message/{id}"),
    ] {
        let response = app.get(&route).await;
        assert_is_redirect_to(&response, "/user/login");
    }

    let response = app
        .post_form("/mailinglist/new", &serde_json::json!({ "name": "Rust weekly" }))
        .await;
    assert_is_redirect_to(&response, "/user/login");
}

#[tokio::test]
async fn a_created_mailing_list_is_owned_by_the_logged_in_user() {
    let app = spawn_app().await;
    app.login_test_user().await;

    let id = app.create_mailing_list("Rust weekly").await;

    let (name, owner_id): (String, Uuid) =
        sqlx::query_as("SELECT name, owner_id FROM mailing_lists WHERE id = $1")
            .bind(id)
            .fetch_one(&app.db_pool)
            .await
            .expect("Failed to fetch the saved mailing list.");
    assert_eq!(name, "Rust weekly");
    assert_eq!(owner_id, app.test_user.user_id);

    let html_page = app.get_html("/mailinglist/").await;
    assert!(html_page.contains("Rust weekly"));
}

#[tokio::test]
async fn the_list_view_only_shows_the_users_own_lists() {
    let app = spawn_app().await;
    let other_user = TestUser::generate();
    sqlx::query(
        "INSERT INTO users (user_id, username, password_hash, created_at) VALUES ($1, $2, 'x', now())",
    )
    .bind(other_user.user_id)
    .bind(&other_user.username)
    .execute(&app.db_pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO mailing_lists (id, name, owner_id, created_at) VALUES ($1, 'Somebody else', $2, now())",
    )
    .bind(Uuid::new_v4())
    .bind(other_user.user_id)
    .execute(&app.db_pool)
    .await
    .unwrap();
    app.login_test_user().await;
    app.create_mailing_list("Mine").await;

    let html_page = app.get_html("/mailinglist/").await;

    assert!(html_page.contains("Mine"));
    assert!(!html_page.contains("Somebody else"));
}

#[tokio::test]
async fn an_invalid_name_is_rejected_with_a_400() {
    let app = spawn_app().await;
    app.login_test_user().await;

    let too_long = "a".repeat(141);
    for name in ["", "   ", too_long.as_str()] {
        let response = app
            .post_form("/mailinglist/new", &serde_json::json!({ "name": name }))
            .await;
        assert_eq!(400, response.status().as_u16(), "name: {name:?}");
    }

    let (lists,): (i64,) = sqlx::query_as("SELECT count(*) FROM mailing_lists")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(lists, 0);
}

#[tokio::test]
async fn the_manage_page_shows_subscribers_and_the_subscribe_link() {
    let app = spawn_app().await;
    app.login_test_user().await;
    let id = app.create_mailing_list("Rust weekly").await;
    app.create_unconfirmed_subscriber(id, "ursula@example.com").await;

    let html_page = app.get_html(&format!("/mailinglist/{id}/manage")).await;

    assert!(html_page.contains("Rust weekly Management"));
    assert!(html_page.contains("ursula@example.com"));
    assert!(html_page.contains("(unconfirmed)"));
    assert!(html_page.contains(&format!("{id}&#x2F;subscribe")));
}

#[tokio::test]
async fn unknown_mailing_lists_are_a_404() {
    let app = spawn_app().await;
    app.login_test_user().await;

    let response = app
        .get(&format!("/mailinglist/{}/manage", Uuid::new_v4()))
        .await;

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn other_users_cannot_manage_or_delete_a_list() {
    let app = spawn_app().await;
    app.login_test_user().await;
    let id = app.create_mailing_list("Rust weekly").await;
    app.post_logout().await;

    let intruder = TestUser::generate();
    let password = intruder.password.clone();
    app.post_form(
        "/user/register",
        &serde_json::json!({
            "username": &intruder.username,
            "password1": &password,
            "password2": &password,
        }),
    )
    .await;
    app.post_login(&serde_json::json!({
        "username": &intruder.username,
        "password": &password,
    }))
    .await;

    let response = app.get(&format!("/mailinglist/{id}/manage")).await;
    assert_eq!(403, response.status().as_u16());

    let response = app
        .post_form(&format!("/mailinglist/{id}/delete"), &serde_json::json!({}))
        .await;
    assert_eq!(403, response.status().as_u16());

    let (lists,): (i64,) = sqlx::query_as("SELECT count(*) FROM mailing_lists")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(lists, 1);
}

#[tokio::test]
async fn deleting_a_list_removes_it_with_its_subscribers_and_messages() {
    let app = spawn_app().await;
    app.login_test_user().await;
    let id = app.create_mailing_list("Rust weekly").await;
    app.create_unconfirmed_subscriber(id, "ursula@example.com").await;
    let response = app
        .post_form(
            &format!("/mailinglist/{id}/message/new"),
            &serde_json::json!({ "subject": "Issue #1", "body": "Hello", "action": "save" }),
        )
        .await;
    assert_is_redirect_to(&response, &format!("/mailinglist/{id}/manage"));

    let html_page = app.get_html(&format!("/mailinglist/{id}/delete")).await;
    assert!(html_page.contains("Confirm delete?"));

    let response = app
        .post_form(&format!("/mailinglist/{id}/delete"), &serde_json::json!({}))
        .await;
    assert_is_redirect_to(&response, "/mailinglist/");

    let html_page = app.get_html("/mailinglist/").await;
    assert!(html_page.contains("Deleted mailing list Rust weekly."));

    let (subscribers,): (i64,) = sqlx::query_as("SELECT count(*) FROM subscribers")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(subscribers, 0);

    let (messages,): (i64,) = sqlx::query_as("SELECT count(*) FROM messages")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(messages, 0);
}
