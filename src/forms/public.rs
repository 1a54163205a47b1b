use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::redemption::{RedemptionRequest, ValidationRequest};
use crate::domain::types::{ContactEmail, HolderName, PhoneNumber, PixKey, TicketCode};
use crate::forms::FormError;

#[derive(Clone, Debug, Default, Deserialize, Validate)]
/// Public code check form.
pub struct ValidateTicketForm {
    #[validate(length(min = 1, message = "Código é obrigatório"))]
    #[serde(default)]
    pub code: String,
}

impl TryFrom<ValidateTicketForm> for ValidationRequest {
    type Error = FormError;

    fn try_from(form: ValidateTicketForm) -> Result<Self, Self::Error> {
        let form = ValidateTicketForm {
            code: form.code.trim().to_string(),
        };
        form.validate()?;
        let code = TicketCode::new(form.code).map_err(|_| FormError::InvalidCode)?;
        Ok(ValidationRequest { code })
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, Validate)]
/// Payout contact details submitted by a winner.
pub struct RedeemTicketForm {
    #[validate(length(min = 1, message = "Código é obrigatório"))]
    #[serde(default)]
    pub code: String,
    #[validate(length(min = 1, message = "Nome completo é obrigatório"))]
    #[serde(default)]
    pub full_name: String,
    #[validate(length(min = 1, message = "Telefone é obrigatório"))]
    #[serde(default)]
    pub phone: String,
    #[validate(length(min = 1, message = "E-mail é obrigatório"))]
    #[serde(default)]
    pub email: String,
    #[validate(length(min = 1, message = "Chave PIX é obrigatória"))]
    #[serde(default)]
    pub pix_key: String,
}

impl RedeemTicketForm {
    fn trimmed(self) -> Self {
        Self {
            code: self.code.trim().to_string(),
            full_name: self.full_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            pix_key: self.pix_key.trim().to_string(),
        }
    }
}

impl TryFrom<RedeemTicketForm> for RedemptionRequest {
    type Error = FormError;

    fn try_from(form: RedeemTicketForm) -> Result<Self, Self::Error> {
        let form = form.trimmed();
        form.validate()?;

        let code = TicketCode::new(form.code).map_err(|_| FormError::InvalidCode)?;
        if !code.is_standard_format() {
            return Err(FormError::NonStandardCode);
        }

        Ok(RedemptionRequest {
            code,
            holder_name: HolderName::new(form.full_name).map_err(|_| FormError::InvalidName)?,
            phone: PhoneNumber::new(form.phone).map_err(|_| FormError::InvalidPhoneNumber)?,
            email: ContactEmail::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            pix_key: PixKey::new(form.pix_key).map_err(|_| FormError::InvalidPixKey)?,
        })
    }
}
