//! Service layer: one function per page operation, generic over [`TicketApi`].
//!
//! [`TicketApi`]: crate::api::TicketApi

use thiserror::Error;

use crate::api::ApiError;
use crate::forms::FormError;

pub mod auth;
pub mod batches;
pub mod public;
pub mod tickets;

#[cfg(test)]
pub(crate) mod fake;

/// Errors surfaced by services to the routes.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The user lacks the role required for the operation.
    #[error("unauthorized")]
    Unauthorized,
    /// The API rejected the stored access token.
    #[error("Sessão expirada. Faça login novamente.")]
    SessionExpired,
    /// Input validation failed; the message is shown to the user.
    #[error("{0}")]
    Form(String),
    #[error("Bilhete não encontrado")]
    NotFound,
    #[error("type constraint violation: {0}")]
    TypeConstraint(String),
    #[error("{0}")]
    Api(ApiError),
    #[error("internal error")]
    Internal,
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<ApiError> for ServiceError {
    fn from(err: ApiError) -> Self {
        if err.is_unauthorized() {
            ServiceError::SessionExpired
        } else if err.is_not_found() {
            ServiceError::NotFound
        } else {
            ServiceError::Api(err)
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}
