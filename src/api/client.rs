//! reqwest-backed implementation of [`TicketApi`].

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::{ApiError, ApiResult, QueryPairs, TicketApi};
use crate::domain::auth::{Credentials, LoginSession};
use crate::domain::batch::{BatchReceipt, NewBatch};
use crate::domain::page::TicketPage;
use crate::domain::pdf::{PdfDocument, PdfLink, PdfRemoval, StorageInfo};
use crate::domain::redemption::{
    MarkPaidRequest, PaymentReceipt, RedemptionReceipt, RedemptionRequest, ValidationOutcome,
    ValidationRequest,
};
use crate::domain::ticket::Ticket;
use crate::domain::types::{AccessToken, TicketId};

/// Upper bound for establishing a TCP connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Response body after status handling.
#[derive(Debug, PartialEq)]
pub enum ApiBody {
    Json(Value),
    Binary(Vec<u8>),
}

/// Shared connection pool and base URL. Cheap to clone.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(|e| ApiError::Connection(e.to_string()))?;

        let base_url = base_url.trim_end_matches('/').to_string();
        log::info!("Ticket API client initialized: {base_url}");
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Binds the client to the caller's access token, if any.
    pub fn session(&self, token: Option<AccessToken>) -> HttpTicketApi {
        HttpTicketApi {
            client: self.clone(),
            token,
        }
    }
}

/// Builds the user-facing message for a failed response.
///
/// `message` wins (arrays are joined with `", "`), then `mensagem`, then a
/// generic status line.
pub fn error_message(status: u16, payload: &Value) -> String {
    match payload.get("message") {
        Some(Value::Array(parts)) if !parts.is_empty() => {
            return parts
                .iter()
                .map(|part| match part {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ");
        }
        Some(Value::String(s)) if !s.is_empty() => return s.clone(),
        _ => {}
    }
    match payload.get("mensagem") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => format!("Erro HTTP {status}"),
    }
}

fn decode<T: DeserializeOwned>(body: ApiBody) -> ApiResult<T> {
    match body {
        ApiBody::Json(value) => {
            serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
        }
        ApiBody::Binary(_) => Err(ApiError::Decode(
            "expected JSON, received binary content".to_string(),
        )),
    }
}

/// Newer API versions wrap the list with pagination metadata.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListResponse {
    Paged(TicketPage),
    Bare(Vec<Ticket>),
}

/// Per-request view of [`ApiClient`] carrying the bearer token.
#[derive(Clone, Debug)]
pub struct HttpTicketApi {
    client: ApiClient,
    token: Option<AccessToken>,
}

impl HttpTicketApi {
    fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.client.base_url, path);
        log::debug!("→ {method} {url}");

        let builder = self
            .client
            .http
            .request(method, &url)
            .header(ACCEPT, "application/json");
        match &self.token {
            Some(token) => builder.bearer_auth(token.as_str()),
            None => builder,
        }
    }

    /// Sends the request and applies the status/content-type rules.
    pub async fn execute(&self, builder: RequestBuilder) -> ApiResult<ApiBody> {
        let response = builder.send().await.map_err(|e| {
            log::error!("Ticket API request failed: {e}");
            ApiError::Connection(e.to_string())
        })?;

        let status = response.status();
        let is_pdf = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/pdf"));

        let bytes = response.bytes().await.map_err(|e| {
            log::error!("Failed to read ticket API response: {e}");
            ApiError::Connection(e.to_string())
        })?;

        if status.is_success() && is_pdf {
            return Ok(ApiBody::Binary(bytes.to_vec()));
        }

        let payload: Value =
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::Object(Default::default()));

        if !status.is_success() {
            let message = error_message(status.as_u16(), &payload);
            log::warn!("Ticket API answered {status}: {message}");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
                payload,
            });
        }

        Ok(ApiBody::Json(payload))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        decode(self.execute(self.builder(Method::GET, path)).await?)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        decode(
            self.execute(self.builder(Method::POST, path).json(body))
                .await?,
        )
    }
}

impl TicketApi for HttpTicketApi {
    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginSession> {
        self.post("/auth/login", credentials).await
    }

    async fn generate_batch(&self, batch: &NewBatch) -> ApiResult<BatchReceipt> {
        self.post("/bilhetes/gerar-lote", batch).await
    }

    async fn list_tickets(&self, query: &QueryPairs) -> ApiResult<TicketPage> {
        let builder = self.builder(Method::GET, "/bilhetes").query(query);
        let response: ListResponse = decode(self.execute(builder).await?)?;
        Ok(match response {
            ListResponse::Paged(page) => page,
            ListResponse::Bare(tickets) => TicketPage::from_all(tickets),
        })
    }

    async fn validate_ticket(&self, request: &ValidationRequest) -> ApiResult<ValidationOutcome> {
        self.post("/bilhetes/validar", request).await
    }

    async fn redeem_ticket(&self, request: &RedemptionRequest) -> ApiResult<RedemptionReceipt> {
        self.post("/bilhetes/resgatar", request).await
    }

    async fn mark_paid(&self, request: &MarkPaidRequest) -> ApiResult<PaymentReceipt> {
        self.post("/bilhetes/marcar-como-pago", request).await
    }

    async fn pdf_link(&self, id: &TicketId) -> ApiResult<PdfLink> {
        self.get(&format!("/bilhetes/{id}/pdf-url")).await
    }

    async fn download_pdf(&self, id: &TicketId) -> ApiResult<PdfDocument> {
        let builder = self.builder(Method::GET, &format!("/bilhetes/{id}/pdf"));
        match self.execute(builder).await? {
            ApiBody::Binary(content) => Ok(PdfDocument { content }),
            ApiBody::Json(_) => Err(ApiError::Decode(
                "expected a PDF document, received JSON".to_string(),
            )),
        }
    }

    async fn remove_pdf(&self, id: &TicketId) -> ApiResult<PdfRemoval> {
        let builder = self.builder(Method::DELETE, &format!("/bilhetes/{id}/pdf"));
        decode(self.execute(builder).await?)
    }

    async fn storage_info(&self) -> ApiResult<StorageInfo> {
        self.get("/bilhetes/storage/info").await
    }
}
