//! Authenticated administrator extracted from the identity and session cookies.

use std::future::{Ready, ready};

use actix_identity::{Identity, IdentityExt};
use actix_session::SessionExt;
use actix_web::dev::Payload;
use actix_web::error::{ErrorInternalServerError, ErrorUnauthorized};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use serde::Serialize;

use crate::domain::auth::{AdminUser, LoginSession};
use crate::domain::types::AccessToken;

/// Session key holding the logged-in [`AdminUser`].
pub const SESSION_USER_KEY: &str = "admin_user";

/// Administrator behind the current request.
///
/// The identity id is the API access token; the profile lives in the session.
#[derive(Clone, Debug, Serialize)]
pub struct AuthenticatedAdmin {
    #[serde(skip_serializing)]
    pub token: AccessToken,
    #[serde(flatten)]
    pub user: AdminUser,
}

impl AuthenticatedAdmin {
    fn extract(req: &HttpRequest) -> Result<Self, Error> {
        let identity = req
            .get_identity()
            .map_err(|_| ErrorUnauthorized("login required"))?;
        let token = identity
            .id()
            .ok()
            .and_then(|id| AccessToken::new(id).ok())
            .ok_or_else(|| ErrorUnauthorized("login required"))?;
        let user = req
            .get_session()
            .get::<AdminUser>(SESSION_USER_KEY)
            .ok()
            .flatten()
            .ok_or_else(|| ErrorUnauthorized("login required"))?;

        Ok(Self { token, user })
    }
}

impl FromRequest for AuthenticatedAdmin {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Self::extract(req))
    }
}

/// Attaches the token and profile returned by a successful login.
pub fn start_session(req: &HttpRequest, session: &LoginSession) -> Result<(), Error> {
    Identity::login(&req.extensions(), session.access_token.to_string())
        .map_err(ErrorInternalServerError)?;
    req.get_session()
        .insert(SESSION_USER_KEY, &session.user)
        .map_err(ErrorInternalServerError)?;
    Ok(())
}

/// Forgets the token and everything kept in the session.
pub fn end_session(req: &HttpRequest) {
    if let Ok(identity) = req.get_identity() {
        identity.logout();
    }
    req.get_session().purge();
}
