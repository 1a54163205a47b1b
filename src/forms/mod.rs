//! Form definitions backing the page routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod auth;
pub mod batches;
pub mod public;
pub mod tickets;

/// Generic message for validation failures without a localized text.
pub const INVALID_FORM: &str = "Dados inválidos";

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("{}", first_message(.0))]
    Validation(#[from] ValidationErrors),

    #[error("E-mail deve ter um formato válido")]
    InvalidEmail,

    #[error("Quantidade deve ser pelo menos 1")]
    QuantityTooSmall,

    #[error("Quantidade máxima é {0}")]
    QuantityTooLarge(u32),

    #[error("Prefixo deve conter apenas letras maiúsculas (A-Z), até {0} caracteres")]
    InvalidPrefix(usize),

    #[error("Código inválido")]
    InvalidCode,

    #[error("Código deve ter 11 caracteres")]
    NonStandardCode,

    #[error("Nome completo deve ter pelo menos 3 caracteres")]
    InvalidName,

    #[error("Telefone deve estar no formato (XX) XXXXX-XXXX")]
    InvalidPhoneNumber,

    #[error("Chave PIX deve ter entre 11 e 140 caracteres")]
    InvalidPixKey,

    #[error("Identificador de bilhete inválido")]
    InvalidTicketId,

    #[error("Por favor, selecione um arquivo CSV válido")]
    NotCsv,

    #[error("Cabeçalhos inválidos. Esperado: Número, Código, Status, Valor")]
    InvalidHeaders,

    #[error("Erro ao processar arquivo CSV: {0}")]
    Csv(String),
}

/// Picks the first localized message, walking fields in name order so the
/// result is stable.
pub fn first_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.keys().collect();
    fields.sort();

    fields
        .into_iter()
        .filter_map(|field| field_errors.get(field))
        .flat_map(|errors| errors.iter())
        .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| INVALID_FORM.to_string())
}
