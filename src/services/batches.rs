use crate::api::TicketApi;
use crate::domain::batch::{BatchReceipt, NewBatch};
use crate::forms::batches::GenerateBatchForm;
use crate::services::{ServiceError, ServiceResult};

/// Validates the generation form and asks the API for a new batch.
pub async fn generate_batch<A>(api: &A, form: GenerateBatchForm) -> ServiceResult<BatchReceipt>
where
    A: TicketApi + ?Sized,
{
    let batch = NewBatch::try_from(form)?;

    let receipt = api.generate_batch(&batch).await.map_err(|err| {
        log::error!("Failed to generate batch: {err}");
        ServiceError::from(err)
    })?;

    log::info!(
        "Generated {} tickets with prefix {}",
        receipt.quantity,
        receipt.prefix
    );
    Ok(receipt)
}

/// Flash message shown after a successful generation.
pub fn success_message(receipt: &BatchReceipt) -> String {
    format!(
        "Lote gerado com sucesso! {} bilhetes criados com prefixo \"{}\"",
        receipt.quantity, receipt.prefix
    )
}
