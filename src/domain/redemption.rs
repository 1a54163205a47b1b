//! Public validation, prize redemption and payment confirmation.

use serde::{Deserialize, Serialize};

use crate::domain::ticket::Ticket;
use crate::domain::types::{ContactEmail, HolderName, PhoneNumber, PixKey, TicketCode, TicketId};

/// Severity attached to a validation answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Sucesso,
    Aviso,
    Erro,
}

impl OutcomeKind {
    pub fn heading(self) -> &'static str {
        match self {
            OutcomeKind::Sucesso => "🎉 Parabéns!",
            OutcomeKind::Aviso => "Bilhete Válido",
            OutcomeKind::Erro => "Bilhete Inválido",
        }
    }
}

/// Body for `POST /bilhetes/validar`.
#[derive(Clone, Debug, Serialize)]
pub struct ValidationRequest {
    #[serde(rename = "codigo")]
    pub code: TicketCode,
}

/// Answer to a public code check.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ValidationOutcome {
    #[serde(rename = "valido", default)]
    pub valid: bool,
    #[serde(rename = "bilhete", default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<Ticket>,
    #[serde(rename = "mensagem", default)]
    pub message: String,
    #[serde(rename = "tipo")]
    pub kind: OutcomeKind,
}

impl ValidationOutcome {
    /// Outcome shown when the API could not answer.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            ticket: None,
            message: message.into(),
            kind: OutcomeKind::Erro,
        }
    }

    /// Winning tickets that were not redeemed yet may proceed to redemption.
    pub fn can_redeem(&self) -> bool {
        self.kind == OutcomeKind::Sucesso
            && !self.ticket.as_ref().is_some_and(Ticket::is_redeemed)
    }
}

/// Body for `POST /bilhetes/resgatar`.
#[derive(Clone, Debug, Serialize)]
pub struct RedemptionRequest {
    #[serde(rename = "codigo")]
    pub code: TicketCode,
    #[serde(rename = "nomeCompleto")]
    pub holder_name: HolderName,
    #[serde(rename = "telefone")]
    pub phone: PhoneNumber,
    pub email: ContactEmail,
    #[serde(rename = "chavePix")]
    pub pix_key: PixKey,
}

/// Confirmation of a stored redemption.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RedemptionReceipt {
    #[serde(rename = "sucesso", default)]
    pub success: bool,
    #[serde(rename = "mensagem", default)]
    pub message: String,
    #[serde(rename = "bilhete", default)]
    pub ticket: Option<Ticket>,
    #[serde(rename = "dataResgate", default)]
    pub redeemed_at: Option<String>,
}

/// Body for `POST /bilhetes/marcar-como-pago`.
#[derive(Clone, Debug, Serialize)]
pub struct MarkPaidRequest {
    #[serde(rename = "bilheteId")]
    pub ticket_id: TicketId,
}

/// Confirmation of a payout.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PaymentReceipt {
    #[serde(rename = "sucesso", default)]
    pub success: bool,
    #[serde(rename = "mensagem", default)]
    pub message: String,
    #[serde(rename = "bilhete", default)]
    pub ticket: Option<Ticket>,
}
