use serde::{Deserialize, Serialize};

use crate::domain::types::{AccessToken, ContactEmail};

/// Credentials posted to `POST /auth/login`.
#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
    pub email: ContactEmail,
    pub password: String,
}

/// Account returned together with the access token.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminUser {
    pub id: String,
    pub email: String,
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
}

/// Successful login response.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginSession {
    pub access_token: AccessToken,
    pub user: AdminUser,
}
