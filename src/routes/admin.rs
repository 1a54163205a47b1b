use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::client::ApiClient;
use crate::domain::types::{MAX_BATCH_SIZE, MAX_PREFIX_LEN};
use crate::forms::batches::GenerateBatchForm;
use crate::models::auth::AuthenticatedAdmin;
use crate::models::config::ServerConfig;
use crate::routes::{admin_api, base_context, fail_to, redirect, render_template, session_expired};
use crate::services::ServiceError;
use crate::services::batches as batch_service;
use crate::services::tickets as ticket_service;

#[get("")]
pub async fn show_dashboard(
    req: HttpRequest,
    admin: AuthenticatedAdmin,
    client: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let api = admin_api(&client, &admin);
    let data = match ticket_service::load_dashboard(&api, server_config.page_size).await {
        Ok(data) => data,
        Err(ServiceError::SessionExpired) => return session_expired(&req),
        Err(err) => {
            log::error!("Failed to load dashboard: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut context = base_context(&flash_messages, Some(&admin), "dashboard");
    context.insert("storage", &data.storage);
    context.insert("storage_error", &data.storage_error);
    context.insert("stats", &data.stats);
    context.insert("recent", &data.recent);
    context.insert("total_tickets", &data.total_tickets);

    render_template(&tera, "admin/dashboard.html", &context)
}

#[get("/gerar")]
pub async fn show_generate(
    admin: AuthenticatedAdmin,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(&flash_messages, Some(&admin), "generate");
    context.insert("max_quantity", &MAX_BATCH_SIZE);
    context.insert("max_prefix_len", &MAX_PREFIX_LEN);
    render_template(&tera, "admin/generate.html", &context)
}

#[post("/gerar")]
pub async fn generate_batch(
    req: HttpRequest,
    admin: AuthenticatedAdmin,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<GenerateBatchForm>,
) -> impl Responder {
    let api = admin_api(&client, &admin);
    match batch_service::generate_batch(&api, form).await {
        Ok(receipt) => {
            FlashMessage::success(batch_service::success_message(&receipt)).send();
            redirect("/admin/gerar")
        }
        Err(err) => fail_to(&req, err, "/admin/gerar"),
    }
}
