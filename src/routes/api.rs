use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use serde_json::json;

use crate::api::client::ApiClient;
use crate::models::auth::{AuthenticatedAdmin, end_session};
use crate::models::config::ServerConfig;
use crate::routes::admin_api;
use crate::routes::tickets::{listing_for, parse_query, remember_listing};
use crate::services::ServiceError;
use crate::services::tickets as ticket_service;

/// Ticket listing for the page script. Shares the listing state with the
/// HTML page and echoes `seq` so late answers can be discarded.
#[get("/bilhetes")]
pub async fn api_tickets(
    req: HttpRequest,
    admin: AuthenticatedAdmin,
    client: web::Data<ApiClient>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let query = parse_query(&req);
    let mut state = listing_for(&req, &query, server_config.page_size);

    let api = admin_api(&client, &admin);
    match ticket_service::list_tickets_json(&api, &mut state, query.seq).await {
        Ok(body) => {
            remember_listing(&req, &state);
            HttpResponse::Ok().json(body)
        }
        Err(ServiceError::SessionExpired) => {
            end_session(&req);
            HttpResponse::Unauthorized()
                .json(json!({ "error": ServiceError::SessionExpired.to_string() }))
        }
        Err(err) => {
            log::error!("Failed to list tickets: {err}");
            HttpResponse::BadGateway().json(json!({ "error": err.to_string(), "seq": query.seq }))
        }
    }
}
