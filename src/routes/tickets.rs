use actix_multipart::form::MultipartForm;
use actix_session::SessionExt;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Local;
use serde::Serialize;
use tera::Tera;

use crate::api::client::ApiClient;
use crate::domain::ticket::TicketStatus;
use crate::dto::tickets::FilterValues;
use crate::forms::tickets::{MarkPaidForm, TicketsQuery, UploadTicketsForm};
use crate::listing::{ListingSnapshot, ListingState, PAGE_SIZE_CHOICES};
use crate::models::auth::AuthenticatedAdmin;
use crate::models::config::ServerConfig;
use crate::routes::{admin_api, base_context, fail_to, redirect, render_template};
use crate::services::tickets as ticket_service;

/// Session key of the listing snapshot.
const LISTING_SESSION_KEY: &str = "listing";
pub const TICKETS_PATH: &str = "/admin/bilhetes";

/// Parses the listing query string; a malformed one counts as empty.
pub(crate) fn parse_query(req: &HttpRequest) -> TicketsQuery {
    serde_html_form::from_str(req.query_string()).unwrap_or_else(|err| {
        log::warn!("Ignoring malformed listing query: {err}");
        TicketsQuery::default()
    })
}

/// Restores the listing from the session and applies the request's navigation.
pub(crate) fn listing_for(
    req: &HttpRequest,
    query: &TicketsQuery,
    default_page_size: usize,
) -> ListingState {
    let snapshot = req
        .get_session()
        .get::<ListingSnapshot>(LISTING_SESSION_KEY)
        .ok()
        .flatten()
        .unwrap_or_default();

    let mut state = ListingState::restore(snapshot, default_page_size);
    query.apply_to(&mut state);
    state
}

pub(crate) fn remember_listing(req: &HttpRequest, state: &ListingState) {
    if let Err(err) = req
        .get_session()
        .insert(LISTING_SESSION_KEY, state.snapshot())
    {
        log::warn!("Failed to store listing state: {err}");
    }
}

fn is_blank(value: &&str) -> bool {
    value.is_empty()
}

#[derive(Serialize)]
struct LinkParams<'a> {
    #[serde(skip_serializing_if = "is_blank")]
    status: &'a str,
    #[serde(skip_serializing_if = "is_blank")]
    start_date: &'a str,
    #[serde(skip_serializing_if = "is_blank")]
    end_date: &'a str,
    #[serde(skip_serializing_if = "is_blank")]
    code: &'a str,
    #[serde(skip_serializing_if = "is_blank")]
    prefix: &'a str,
    page_size: usize,
}

/// Query string that reproduces the current filters, used by page links.
fn link_query(filters: &FilterValues, page_size: usize) -> String {
    let params = LinkParams {
        status: &filters.status,
        start_date: &filters.start_date,
        end_date: &filters.end_date,
        code: &filters.code,
        prefix: &filters.prefix,
        page_size,
    };
    serde_html_form::to_string(&params).unwrap_or_else(|err| {
        log::warn!("Failed to encode listing link: {err}");
        String::new()
    })
}

#[get("/bilhetes")]
pub async fn show_tickets(
    req: HttpRequest,
    admin: AuthenticatedAdmin,
    client: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query = parse_query(&req);
    let mut state = listing_for(&req, &query, server_config.page_size);

    let api = admin_api(&client, &admin);
    let data = match ticket_service::load_tickets_page(&api, &mut state).await {
        Ok(data) => data,
        Err(err) => return fail_to(&req, err, "/admin"),
    };
    remember_listing(&req, &state);

    let statuses = TicketStatus::ALL
        .iter()
        .map(|s| (s.code(), s.label()))
        .collect::<Vec<_>>();

    let mut context = base_context(&flash_messages, Some(&admin), "tickets");
    context.insert("tickets", &data.tickets);
    context.insert("stats", &data.stats);
    context.insert("error", &data.error);
    context.insert("filters", &data.filters);
    context.insert("has_filters", &data.has_filters);
    context.insert("page_size", &data.page_size);
    context.insert("page_sizes", &PAGE_SIZE_CHOICES);
    context.insert("statuses", &statuses);
    context.insert("link_query", &link_query(&data.filters, data.page_size));
    context.insert("debounce_ms", &server_config.search_debounce_ms);

    render_template(&tera, "admin/tickets.html", &context)
}

#[get("/bilhetes/exportar")]
pub async fn export_tickets(
    req: HttpRequest,
    admin: AuthenticatedAdmin,
    client: web::Data<ApiClient>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let filters = parse_query(&req).filters();
    let api = admin_api(&client, &admin);
    let today = Local::now().date_naive();

    match ticket_service::export_tickets_csv(&api, &filters, server_config.page_size, today).await
    {
        Ok(export) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.file_name),
            ))
            .body(export.content),
        Err(err) => fail_to(&req, err, TICKETS_PATH),
    }
}

#[post("/bilhetes/importar")]
pub async fn import_tickets(
    req: HttpRequest,
    _admin: AuthenticatedAdmin,
    MultipartForm(mut form): MultipartForm<UploadTicketsForm>,
) -> impl Responder {
    match ticket_service::preview_import(&mut form) {
        Ok(report) => {
            FlashMessage::success(ticket_service::import_message(&report)).send();
            if !report.warnings.is_empty() {
                FlashMessage::warning(report.warnings.join("; ")).send();
            }
            if !report.errors.is_empty() {
                FlashMessage::error(report.errors.join("; ")).send();
            }
            redirect(TICKETS_PATH)
        }
        Err(err) => fail_to(&req, err, TICKETS_PATH),
    }
}

#[post("/bilhetes/marcar-como-pago")]
pub async fn mark_ticket_paid(
    req: HttpRequest,
    admin: AuthenticatedAdmin,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<MarkPaidForm>,
) -> impl Responder {
    let api = admin_api(&client, &admin);
    match ticket_service::mark_ticket_paid(&api, form).await {
        Ok(receipt) => {
            FlashMessage::success(receipt.message).send();
            redirect(TICKETS_PATH)
        }
        Err(err) => fail_to(&req, err, TICKETS_PATH),
    }
}

#[get("/bilhetes/{ticket_id}/pdf")]
pub async fn download_pdf(
    req: HttpRequest,
    ticket_id: web::Path<String>,
    admin: AuthenticatedAdmin,
    client: web::Data<ApiClient>,
) -> impl Responder {
    let api = admin_api(&client, &admin);
    match ticket_service::download_pdf(&api, &ticket_id).await {
        Ok((file_name, document)) => HttpResponse::Ok()
            .content_type("application/pdf")
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{file_name}\""),
            ))
            .body(document.content),
        Err(err) => fail_to(&req, err, TICKETS_PATH),
    }
}

#[get("/bilhetes/{ticket_id}/pdf-url")]
pub async fn pdf_link(
    req: HttpRequest,
    ticket_id: web::Path<String>,
    admin: AuthenticatedAdmin,
    client: web::Data<ApiClient>,
) -> impl Responder {
    let api = admin_api(&client, &admin);
    match ticket_service::pdf_link(&api, &ticket_id).await {
        Ok(link) => redirect(&link.url),
        Err(err) => fail_to(&req, err, TICKETS_PATH),
    }
}

#[post("/bilhetes/{ticket_id}/pdf/remover")]
pub async fn remove_pdf(
    req: HttpRequest,
    ticket_id: web::Path<String>,
    admin: AuthenticatedAdmin,
    client: web::Data<ApiClient>,
) -> impl Responder {
    let api = admin_api(&client, &admin);
    match ticket_service::remove_pdf(&api, &ticket_id).await {
        Ok(message) => {
            FlashMessage::success(message).send();
            redirect(TICKETS_PATH)
        }
        Err(err) => fail_to(&req, err, TICKETS_PATH),
    }
}
