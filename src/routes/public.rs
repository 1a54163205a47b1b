use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::{Context, Tera};

use crate::api::client::ApiClient;
use crate::domain::redemption::ValidationOutcome;
use crate::domain::ticket::{format_brl, format_date_br};
use crate::dto::tickets::TicketRow;
use crate::forms::public::{RedeemTicketForm, ValidateTicketForm};
use crate::services::ServiceError;
use crate::services::public as public_service;
use crate::routes::{base_context, render_template};

#[derive(Deserialize)]
struct CodeQuery {
    #[serde(alias = "codigo")]
    code: Option<String>,
}

fn insert_outcome(context: &mut Context, outcome: &ValidationOutcome) {
    context.insert("outcome", outcome);
    context.insert("heading", outcome.kind.heading());
    context.insert("can_redeem", &outcome.can_redeem());
    if let Some(ticket) = &outcome.ticket {
        context.insert("ticket", &TicketRow::from(ticket));
        context.insert("prize", &ticket.prize_amount.map(format_brl));
    }
}

#[get("/")]
pub async fn show_validate(
    params: web::Query<CodeQuery>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(&flash_messages, None, "validate");
    context.insert("code", params.code.as_deref().unwrap_or_default());
    render_template(&tera, "public/validate.html", &context)
}

#[post("/validar")]
pub async fn validate_ticket(
    client: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<ValidateTicketForm>,
) -> impl Responder {
    let mut context = base_context(&flash_messages, None, "validate");
    context.insert("code", form.code.trim());

    let api = client.session(None);
    match public_service::validate_ticket(&api, form).await {
        Ok(outcome) => insert_outcome(&mut context, &outcome),
        Err(err) => context.insert("form_error", &err.to_string()),
    }

    render_template(&tera, "public/validate.html", &context)
}

#[get("/resgatar")]
pub async fn show_redeem(
    params: web::Query<CodeQuery>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(&flash_messages, None, "redeem");
    context.insert(
        "form",
        &RedeemTicketForm {
            code: params.code.clone().unwrap_or_default().to_uppercase(),
            ..Default::default()
        },
    );
    render_template(&tera, "public/redeem.html", &context)
}

#[post("/resgatar")]
pub async fn redeem_ticket(
    client: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<RedeemTicketForm>,
) -> impl Responder {
    let mut context = base_context(&flash_messages, None, "redeem");
    context.insert("form", &form);

    let api = client.session(None);
    match public_service::redeem_ticket(&api, form).await {
        Ok(receipt) => {
            context.insert("message", &receipt.message);
            context.insert(
                "redeemed_at",
                &receipt.redeemed_at.as_deref().map(format_date_br),
            );
            render_template(&tera, "public/redeem_done.html", &context)
        }
        Err(ServiceError::Internal) => HttpResponse::InternalServerError().finish(),
        Err(err) => {
            context.insert("form_error", &err.to_string());
            render_template(&tera, "public/redeem.html", &context)
        }
    }
}
