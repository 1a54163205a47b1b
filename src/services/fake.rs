//! Recording in-memory [`TicketApi`] used by service tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::api::{ApiError, ApiResult, QueryPairs, TicketApi};
use crate::domain::auth::{AdminUser, Credentials, LoginSession};
use crate::domain::batch::{BatchReceipt, NewBatch};
use crate::domain::page::{PageInfo, TicketPage};
use crate::domain::pdf::{PdfDocument, PdfLink, PdfRemoval, StorageInfo};
use crate::domain::redemption::{
    MarkPaidRequest, PaymentReceipt, RedemptionReceipt, RedemptionRequest, ValidationOutcome,
    ValidationRequest,
};
use crate::domain::ticket::{Ticket, TicketStatus};
use crate::domain::types::{AccessToken, TicketId};

pub fn ticket(id: &str, status: TicketStatus) -> Ticket {
    Ticket {
        id: TicketId::new(id).unwrap(),
        sequence_number: format!("GANHADOR {id}"),
        code: "A1B2C3D4E5F".to_string(),
        status,
        prize_amount: Some(100.0),
        created_at: "2024-01-15T13:30:00Z".to_string(),
        updated_at: None,
        redeemed_at: None,
        holder_name: None,
        phone: None,
        email: None,
        pix_key: None,
        pdf_url: None,
        qr_code_ref: None,
    }
}

pub fn page(current: usize, total_pages: usize, tickets: Vec<Ticket>) -> TicketPage {
    TicketPage {
        page_info: PageInfo {
            current_page: current,
            per_page: tickets.len().max(1),
            total_items: tickets.len() * total_pages,
            total_pages,
            has_previous: current > 1,
            has_next: current < total_pages,
        },
        tickets,
    }
}

pub fn status_error(status: u16, message: &str) -> ApiError {
    ApiError::Status {
        status,
        message: message.to_string(),
        payload: serde_json::json!({ "message": message }),
    }
}

fn unconfigured<T>() -> ApiResult<T> {
    Err(ApiError::Connection("not configured".to_string()))
}

/// Every endpoint answers with its configured result and records the call.
#[derive(Default)]
pub struct FakeTicketApi {
    pub calls: RefCell<Vec<String>>,
    pub list_queries: RefCell<Vec<Vec<(&'static str, String)>>>,
    pub login: RefCell<Option<ApiResult<LoginSession>>>,
    pub batch: RefCell<Option<ApiResult<BatchReceipt>>>,
    pub pages: RefCell<VecDeque<ApiResult<TicketPage>>>,
    pub validation: RefCell<Option<ApiResult<ValidationOutcome>>>,
    pub redemption: RefCell<Option<ApiResult<RedemptionReceipt>>>,
    pub payment: RefCell<Option<ApiResult<PaymentReceipt>>>,
    pub pdf_link: RefCell<Option<ApiResult<PdfLink>>>,
    pub pdf: RefCell<Option<ApiResult<PdfDocument>>>,
    pub removal: RefCell<Option<ApiResult<PdfRemoval>>>,
    pub storage: RefCell<Option<ApiResult<StorageInfo>>>,
}

impl FakeTicketApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_login(self, role: &str) -> Self {
        *self.login.borrow_mut() = Some(Ok(LoginSession {
            access_token: AccessToken::new("token-123").unwrap(),
            user: AdminUser {
                id: "u1".to_string(),
                email: "admin@teste.com".to_string(),
                name: "Administrador".to_string(),
                role: role.to_string(),
            },
        }));
        self
    }

    pub fn with_pages(self, pages: Vec<ApiResult<TicketPage>>) -> Self {
        self.pages.borrow_mut().extend(pages);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }
}

fn take<T: Clone>(slot: &RefCell<Option<ApiResult<T>>>) -> ApiResult<T> {
    slot.borrow().clone().unwrap_or_else(unconfigured)
}

impl TicketApi for FakeTicketApi {
    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginSession> {
        self.record(format!("login {}", credentials.email));
        take(&self.login)
    }

    async fn generate_batch(&self, batch: &NewBatch) -> ApiResult<BatchReceipt> {
        self.record(format!("gerar-lote {} {}", batch.quantity, batch.prefix));
        take(&self.batch)
    }

    async fn list_tickets(&self, query: &QueryPairs) -> ApiResult<TicketPage> {
        self.record("list");
        self.list_queries.borrow_mut().push(query.to_vec());
        self.pages
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(page(1, 0, vec![])))
    }

    async fn validate_ticket(&self, request: &ValidationRequest) -> ApiResult<ValidationOutcome> {
        self.record(format!("validar {}", request.code));
        take(&self.validation)
    }

    async fn redeem_ticket(&self, request: &RedemptionRequest) -> ApiResult<RedemptionReceipt> {
        self.record(format!("resgatar {}", request.code));
        take(&self.redemption)
    }

    async fn mark_paid(&self, request: &MarkPaidRequest) -> ApiResult<PaymentReceipt> {
        self.record(format!("marcar-como-pago {}", request.ticket_id));
        take(&self.payment)
    }

    async fn pdf_link(&self, id: &TicketId) -> ApiResult<PdfLink> {
        self.record(format!("pdf-url {id}"));
        take(&self.pdf_link)
    }

    async fn download_pdf(&self, id: &TicketId) -> ApiResult<PdfDocument> {
        self.record(format!("pdf {id}"));
        take(&self.pdf)
    }

    async fn remove_pdf(&self, id: &TicketId) -> ApiResult<PdfRemoval> {
        self.record(format!("remover-pdf {id}"));
        take(&self.removal)
    }

    async fn storage_info(&self) -> ApiResult<StorageInfo> {
        self.record("storage");
        take(&self.storage)
    }
}
