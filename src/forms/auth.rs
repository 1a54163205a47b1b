use serde::Deserialize;
use validator::Validate;

use crate::domain::auth::Credentials;
use crate::domain::types::ContactEmail;
use crate::forms::FormError;

#[derive(Deserialize, Validate)]
/// Administrator login form.
pub struct LoginForm {
    #[validate(length(min = 1, message = "E-mail é obrigatório"))]
    pub email: String,
    #[validate(length(min = 1, message = "Senha é obrigatória"))]
    pub password: String,
}

impl TryFrom<LoginForm> for Credentials {
    type Error = FormError;

    fn try_from(form: LoginForm) -> Result<Self, Self::Error> {
        let form = LoginForm {
            email: form.email.trim().to_string(),
            password: form.password,
        };
        form.validate()?;

        let email = ContactEmail::new(form.email).map_err(|_| FormError::InvalidEmail)?;
        Ok(Credentials {
            email,
            password: form.password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn missing_email_is_reported_first() {
        let err = Credentials::try_from(form("  ", "")).unwrap_err();
        assert_eq!(err.to_string(), "E-mail é obrigatório");
    }

    #[test]
    fn missing_password() {
        let err = Credentials::try_from(form("admin@teste.com", "")).unwrap_err();
        assert_eq!(err.to_string(), "Senha é obrigatória");
    }

    #[test]
    fn malformed_email() {
        let err = Credentials::try_from(form("admin", "password123")).unwrap_err();
        assert_eq!(err.to_string(), "E-mail deve ter um formato válido");
    }

    #[test]
    fn valid_credentials_are_normalized() {
        let credentials = Credentials::try_from(form(" Admin@Teste.com ", "password123")).unwrap();
        assert_eq!(credentials.email.as_str(), "admin@teste.com");
        assert_eq!(credentials.password, "password123");
    }
}
