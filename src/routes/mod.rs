//! HTTP handlers and the helpers they share.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::api::client::{ApiClient, HttpTicketApi};
use crate::middleware::LOGIN_PATH;
use crate::models::auth::{AuthenticatedAdmin, end_session};
use crate::services::ServiceError;

pub mod admin;
pub mod api;
pub mod auth;
pub mod public;
pub mod tickets;

/// Maps flash levels to Bootstrap alert classes.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Context every page starts from: alerts, current user and active menu item.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: Option<&AuthenticatedAdmin>,
    current_page: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", &user);
    context.insert("current_page", current_page);
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Logs the administrator out after the API rejected their token.
pub fn session_expired(req: &HttpRequest) -> HttpResponse {
    end_session(req);
    FlashMessage::warning(ServiceError::SessionExpired.to_string()).send();
    redirect(LOGIN_PATH)
}

/// Standard handling of a failed admin action: flash and go back.
pub fn fail_to(req: &HttpRequest, err: ServiceError, location: &str) -> HttpResponse {
    match err {
        ServiceError::SessionExpired => session_expired(req),
        ServiceError::Internal => HttpResponse::InternalServerError().finish(),
        ServiceError::TypeConstraint(_) => {
            FlashMessage::error("Identificador de bilhete inválido.").send();
            redirect(location)
        }
        other => {
            FlashMessage::error(other.to_string()).send();
            redirect(location)
        }
    }
}

/// API client bound to the administrator's token.
pub fn admin_api(client: &ApiClient, admin: &AuthenticatedAdmin) -> HttpTicketApi {
    client.session(Some(admin.token.clone()))
}
