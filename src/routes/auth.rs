use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::client::ApiClient;
use crate::forms::auth::LoginForm;
use crate::middleware::LOGIN_PATH;
use crate::models::auth::{AuthenticatedAdmin, end_session, start_session};
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::auth as auth_service;

/// Landing page after a successful login.
pub const ADMIN_HOME: &str = "/admin";

#[get("/login")]
pub async fn show_login(
    user: Option<AuthenticatedAdmin>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if user.is_some() {
        return redirect(ADMIN_HOME);
    }
    let context = base_context(&flash_messages, None, "login");
    render_template(&tera, "auth/login.html", &context)
}

#[post("/login")]
pub async fn login(
    req: HttpRequest,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    let api = client.session(None);
    match auth_service::login(&api, form).await {
        Ok(session) => {
            if let Err(err) = start_session(&req, &session) {
                log::error!("Failed to start session: {err}");
                FlashMessage::error("Erro ao fazer login").send();
                return redirect(LOGIN_PATH);
            }
            redirect(ADMIN_HOME)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Acesso restrito a administradores.").send();
            redirect(LOGIN_PATH)
        }
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            redirect(LOGIN_PATH)
        }
    }
}

#[post("/logout")]
pub async fn logout(req: HttpRequest) -> impl Responder {
    end_session(&req);
    redirect(LOGIN_PATH)
}
