#![allow(dead_code)]

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer, web};
use tera::Tera;

/// Starts a stand-in for the ticket API on a random local port.
pub async fn spawn_api<F>(configure: F) -> (String, ServerHandle)
where
    F: Fn(&mut web::ServiceConfig) + Send + Clone + 'static,
{
    let server = HttpServer::new(move || App::new().configure(configure.clone()))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);
    (format!("http://{addr}"), handle)
}

pub fn templates() -> Tera {
    Tera::new("templates/**/*").unwrap()
}

pub fn server_config(api_base_url: &str) -> bilhetes_web::models::config::ServerConfig {
    bilhetes_web::models::config::ServerConfig {
        domain: "localhost".to_string(),
        address: "127.0.0.1".to_string(),
        port: 0,
        templates_dir: "templates/**/*".to_string(),
        secret: "x".repeat(64),
        api_base_url: api_base_url.to_string(),
        api_timeout_secs: 5,
        page_size: 10,
        search_debounce_ms: 500,
        cookie_secure: false,
    }
}

/// Application wired like the real server, pointed at `$base_url`.
#[macro_export]
macro_rules! web_app {
    ($base_url:expr) => {{
        use actix_identity::IdentityMiddleware;
        use actix_session::{SessionMiddleware, storage::CookieSessionStore};
        use actix_web::cookie::Key;
        use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};

        let key = Key::from(&[7u8; 64]);
        let message_store = CookieMessageStore::builder(key.clone()).build();
        let client = bilhetes_web::api::client::ApiClient::new(
            $base_url,
            std::time::Duration::from_secs(5),
        )
        .unwrap();

        actix_web::App::new()
            .wrap(FlashMessagesFramework::builder(message_store).build())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), key)
                    .cookie_secure(false)
                    .build(),
            )
            .service(bilhetes_web::routes::public::show_validate)
            .service(bilhetes_web::routes::public::validate_ticket)
            .service(bilhetes_web::routes::public::show_redeem)
            .service(bilhetes_web::routes::public::redeem_ticket)
            .service(bilhetes_web::routes::auth::show_login)
            .service(bilhetes_web::routes::auth::login)
            .service(bilhetes_web::routes::auth::logout)
            .service(
                actix_web::web::scope("/admin/api")
                    .service(bilhetes_web::routes::api::api_tickets),
            )
            .service(
                actix_web::web::scope("/admin")
                    .wrap(bilhetes_web::middleware::RedirectUnauthorized)
                    .service(bilhetes_web::routes::admin::show_dashboard)
                    .service(bilhetes_web::routes::admin::show_generate)
                    .service(bilhetes_web::routes::tickets::show_tickets),
            )
            .app_data(actix_web::web::Data::new($crate::common::templates()))
            .app_data(actix_web::web::Data::new(client))
            .app_data(actix_web::web::Data::new($crate::common::server_config($base_url)))
    }};
}
