use crate::ADMIN_ROLE;
use crate::api::{ApiError, TicketApi};
use crate::domain::auth::{Credentials, LoginSession};
use crate::forms::auth::LoginForm;
use crate::services::{ServiceError, ServiceResult};

/// Validates the login form and exchanges the credentials for a token.
///
/// Rejected credentials surface as a form message rather than as an expired
/// session, since no session exists yet.
pub async fn login<A>(api: &A, form: LoginForm) -> ServiceResult<LoginSession>
where
    A: TicketApi + ?Sized,
{
    let credentials = Credentials::try_from(form)?;

    let session = api.login(&credentials).await.map_err(|err| match err {
        ApiError::Status { message, .. } => ServiceError::Form(message),
        other => {
            log::error!("Failed to log in: {other:?}");
            ServiceError::Api(other)
        }
    })?;

    if !session.user.role.eq_ignore_ascii_case(ADMIN_ROLE) {
        log::warn!("Login refused for non-admin account {}", session.user.email);
        return Err(ServiceError::Unauthorized);
    }

    log::info!("Administrator {} logged in", session.user.email);
    Ok(session)
}
