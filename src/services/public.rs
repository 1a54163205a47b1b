use crate::api::TicketApi;
use crate::domain::redemption::{
    RedemptionReceipt, RedemptionRequest, ValidationOutcome, ValidationRequest,
};
use crate::forms::public::{RedeemTicketForm, ValidateTicketForm};
use crate::services::{ServiceError, ServiceResult};

/// Checks a code on behalf of the public.
///
/// Form errors are returned as `Err`. Any API failure becomes an `erro`
/// outcome carrying the error text, so the page always has something to show.
pub async fn validate_ticket<A>(
    api: &A,
    form: ValidateTicketForm,
) -> ServiceResult<ValidationOutcome>
where
    A: TicketApi + ?Sized,
{
    let request = ValidationRequest::try_from(form)?;

    match api.validate_ticket(&request).await {
        Ok(outcome) => Ok(outcome),
        Err(err) => {
            log::warn!("Validation of {} failed: {err}", request.code);
            Ok(ValidationOutcome::error(err.to_string()))
        }
    }
}

/// Submits payout contact details for a winning code.
pub async fn redeem_ticket<A>(api: &A, form: RedeemTicketForm) -> ServiceResult<RedemptionReceipt>
where
    A: TicketApi + ?Sized,
{
    let request = RedemptionRequest::try_from(form)?;

    let receipt = api.redeem_ticket(&request).await.map_err(|err| {
        log::error!("Failed to redeem ticket {}: {err}", request.code);
        match err.status() {
            // Business rule rejections (already redeemed, unknown code) are
            // shown as typed by the API.
            Some(400..=499) => ServiceError::Form(err.to_string()),
            _ => ServiceError::Api(err),
        }
    })?;

    log::info!("Ticket {} redeemed", request.code);
    Ok(receipt)
}
