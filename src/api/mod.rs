//! Access to the remote ticket API.

use thiserror::Error;

use crate::domain::auth::{Credentials, LoginSession};
use crate::domain::batch::{BatchReceipt, NewBatch};
use crate::domain::page::TicketPage;
use crate::domain::pdf::{PdfDocument, PdfLink, PdfRemoval, StorageInfo};
use crate::domain::redemption::{
    MarkPaidRequest, PaymentReceipt, RedemptionReceipt, RedemptionRequest, ValidationOutcome,
    ValidationRequest,
};
use crate::domain::types::TicketId;

pub mod client;

/// Query pairs sent with list requests.
pub type QueryPairs = [(&'static str, String)];

/// Errors returned by the ticket API client.
#[derive(Clone, Debug, Error)]
pub enum ApiError {
    /// The API answered with a non-success status.
    #[error("{message}")]
    Status {
        status: u16,
        message: String,
        payload: serde_json::Value,
    },
    /// The request never produced a response.
    #[error("Erro de conexão")]
    Connection(String),
    /// The response could not be decoded into the expected shape.
    #[error("Resposta inválida da API")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The API rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Convenient result alias for API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// One method per backend endpoint.
#[allow(async_fn_in_trait)]
pub trait TicketApi {
    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginSession>;
    async fn generate_batch(&self, batch: &NewBatch) -> ApiResult<BatchReceipt>;
    async fn list_tickets(&self, query: &QueryPairs) -> ApiResult<TicketPage>;
    async fn validate_ticket(&self, request: &ValidationRequest) -> ApiResult<ValidationOutcome>;
    async fn redeem_ticket(&self, request: &RedemptionRequest) -> ApiResult<RedemptionReceipt>;
    async fn mark_paid(&self, request: &MarkPaidRequest) -> ApiResult<PaymentReceipt>;
    async fn pdf_link(&self, id: &TicketId) -> ApiResult<PdfLink>;
    async fn download_pdf(&self, id: &TicketId) -> ApiResult<PdfDocument>;
    async fn remove_pdf(&self, id: &TicketId) -> ApiResult<PdfRemoval>;
    async fn storage_info(&self) -> ApiResult<StorageInfo>;
}
