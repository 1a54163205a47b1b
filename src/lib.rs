#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_files::Files;
#[cfg(feature = "server")]
use actix_identity::IdentityMiddleware;
#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::Key;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware as actix_middleware, web};
#[cfg(feature = "server")]
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
#[cfg(feature = "server")]
use tera::Tera;

#[cfg(feature = "server")]
use crate::api::client::ApiClient;
#[cfg(feature = "server")]
use crate::middleware::RedirectUnauthorized;
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::routes::admin::{generate_batch, show_dashboard, show_generate};
#[cfg(feature = "server")]
use crate::routes::api::api_tickets;
#[cfg(feature = "server")]
use crate::routes::auth::{login, logout, show_login};
#[cfg(feature = "server")]
use crate::routes::public::{redeem_ticket, show_redeem, show_validate, validate_ticket};
#[cfg(feature = "server")]
use crate::routes::tickets::{
    download_pdf, export_tickets, import_tickets, mark_ticket_paid, pdf_link, remove_pdf,
    show_tickets,
};

pub mod domain;
pub mod dto;
pub mod listing;
pub mod pagination;

#[cfg(feature = "server")]
pub mod api;
#[cfg(feature = "server")]
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

/// Role the API must report for a user to enter the admin area.
pub const ADMIN_ROLE: &str = "ADMIN";

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    server_config.check_secret().map_err(std::io::Error::other)?;

    let client = ApiClient::new(
        &server_config.api_base_url,
        std::time::Duration::from_secs(server_config.api_timeout_secs),
    )
    .map_err(|e| std::io::Error::other(format!("Failed to build API client: {e}")))?;

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(server_config.cookie_secure)
                    .cookie_domain(server_config.cookie_domain())
                    .build(),
            )
            .wrap(actix_middleware::Compress::default())
            .wrap(actix_middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(show_validate)
            .service(validate_ticket)
            .service(show_redeem)
            .service(redeem_ticket)
            .service(show_login)
            .service(login)
            .service(logout)
            .service(web::scope("/admin/api").service(api_tickets))
            .service(
                web::scope("/admin")
                    .wrap(RedirectUnauthorized)
                    .service(show_dashboard)
                    .service(show_generate)
                    .service(generate_batch)
                    .service(export_tickets)
                    .service(import_tickets)
                    .service(mark_ticket_paid)
                    .service(show_tickets)
                    .service(download_pdf)
                    .service(pdf_link)
                    .service(remove_pdf),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(client.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
