use serde::Deserialize;
use validator::Validate;

use crate::domain::batch::NewBatch;
use crate::domain::types::{BatchSize, MAX_BATCH_SIZE, MAX_PREFIX_LEN, Prefix};
use crate::forms::FormError;

#[derive(Deserialize, Validate)]
/// Batch generation form. The quantity stays textual so that an empty or
/// malformed field yields a form message instead of a rejected request.
pub struct GenerateBatchForm {
    #[serde(default)]
    pub quantity: String,
    #[validate(length(min = 1, message = "Prefixo é obrigatório"))]
    #[serde(default)]
    pub prefix: String,
}

impl TryFrom<GenerateBatchForm> for NewBatch {
    type Error = FormError;

    fn try_from(form: GenerateBatchForm) -> Result<Self, Self::Error> {
        let quantity = match form.quantity.trim().parse::<i64>() {
            Ok(value) if value >= 1 => value,
            _ => return Err(FormError::QuantityTooSmall),
        };
        let quantity = u32::try_from(quantity)
            .ok()
            .and_then(|q| BatchSize::new(q).ok())
            .ok_or(FormError::QuantityTooLarge(MAX_BATCH_SIZE))?;

        let form = GenerateBatchForm {
            quantity: form.quantity,
            prefix: form.prefix.trim().to_string(),
        };
        form.validate()?;

        let prefix =
            Prefix::new(form.prefix).map_err(|_| FormError::InvalidPrefix(MAX_PREFIX_LEN))?;
        Ok(NewBatch::new(quantity, prefix))
    }
}
