use std::net::TcpListener;
use std::time::Duration;

use actix_session::SessionMiddleware;
use actix_session::storage::RedisSessionStore;
use actix_web::cookie::Key;
use actix_web::dev::Server;
use actix_web::middleware::from_fn;
use actix_web::{App, HttpServer, web};
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_flash_messages::storage::CookieMessageStore;
use anyhow::Context;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing_actix_web::TracingLogger;

use crate::authentication::reject_anonymous_users;
use crate::configuration::{DatabaseSettings, Settings};
use crate::email_client::EmailClient;
use crate::routes::{
    confirm_subscription, create_mailing_list, create_mailing_list_form, create_message,
    create_message_form, delete_mailing_list, delete_mailing_list_form, health_check, home, login,
    login_form, logout, mailing_list_detail, mailing_list_list, message_detail, register,
    register_form, subscribe, subscribe_form, thank_you_for_subscribing, unsubscribe,
    unsubscribe_form,
};
use crate::templates::Templates;

pub struct Application {
    port: u16,
    server: Server,
}

/// Prefix for links sent out by email.
pub struct ApplicationBaseURL(pub String);

impl Application {
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let email_client = config.email_client.client()?;
        let templates = Templates::load(&config.app.templates)
            .context("Failed to load page and email templates.")?;

        let address = format!("{}:{}", config.app.host, config.app.port);
        let connection_pool = get_connection_pool(&config.database);

        let listener = TcpListener::bind(&address)
            .with_context(|| format!("Failed to bind {address}."))?;
        let port = listener.local_addr()?.port();
        let server = run(
            listener,
            connection_pool,
            email_client,
            templates,
            config.app.base_url,
            config.app.hmac_secret,
            config.redis_uri,
        )
        .await?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub async fn run(
    listener: TcpListener,
    db_pool: PgPool,
    email_client: EmailClient,
    templates: Templates,
    base_url: String,
    hmac_secret: SecretString,
    redis_uri: SecretString,
) -> Result<Server, anyhow::Error> {
    let db_pool = web::Data::new(db_pool);
    let email_client = web::Data::new(email_client);
    let templates = web::Data::new(templates);
    let base_url = web::Data::new(ApplicationBaseURL(base_url));
    let secret_key = Key::from(hmac_secret.expose_secret().as_bytes());
    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();
    let redis_store = RedisSessionStore::new(redis_uri.expose_secret()).await?;

    let server = HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(SessionMiddleware::new(
                redis_store.clone(),
                secret_key.clone(),
            ))
            .wrap(TracingLogger::default())
            .route("/", web::get().to(home))
            .route("/health_check", web::get().to(health_check))
            .service(
                web::scope("/user")
                    .route("/register", web::get().to(register_form))
                    .route("/register", web::post().to(register))
                    .route("/login", web::get().to(login_form))
                    .route("/login", web::post().to(login))
                    .route("/logout", web::post().to(logout)),
            )
            .service(
                web::scope("/mailinglist")
                    .route(
                        "/subscribe/confirm/{subscriber_id}",
                        web::get().to(confirm_subscription),
                    )
                    .route("/unsubscribe/{subscriber_id}", web::get().to(unsubscribe_form))
                    .route("/unsubscribe/{subscriber_id}", web::post().to(unsubscribe))
                    .route("/{mailinglist_id}/subscribe", web::get().to(subscribe_form))
                    .route("/{mailinglist_id}/subscribe", web::post().to(subscribe))
                    .route(
                        "/{mailinglist_id}/thankyou",
                        web::get().to(thank_you_for_subscribing),
                    )
                    .service(
                        web::resource("/")
                            .wrap(from_fn(reject_anonymous_users))
                            .route(web::get().to(mailing_list_list)),
                    )
                    .service(
                        web::resource("/new")
                            .wrap(from_fn(reject_anonymous_users))
                            .route(web::get().to(create_mailing_list_form))
                            .route(web::post().to(create_mailing_list)),
                    )
                    .service(
                        web::resource("/{mailinglist_id}/manage")
                            .wrap(from_fn(reject_anonymous_users))
                            .route(web::get().to(mailing_list_detail)),
                    )
                    .service(
                        web::resource("/{mailinglist_id}/delete")
                            .wrap(from_fn(reject_anonymous_users))
                            .route(web::get().to(delete_mailing_list_form))
                            .route(web::post().to(delete_mailing_list)),
                    )
                    .service(
                        web::resource("/{mailinglist_id}/message/new")
                            .wrap(from_fn(reject_anonymous_users))
                            .route(web::get().to(create_message_form))
                            .route(web::post().to(create_message)),
                    ),
            )
            .service(
                web::resource("/message/{message_id}")
                    .wrap(from_fn(reject_anonymous_users))
                    .route(web::get().to(message_detail)),
            )
            .app_data(db_pool.clone())
            .app_data(email_client.clone())
            .app_data(templates.clone())
            .app_data(base_url.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

pub fn get_connection_pool(db_config: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy_with(db_config.with_db())
}
