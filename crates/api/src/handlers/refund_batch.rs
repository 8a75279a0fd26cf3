//! Handler for staff refund batches.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use mensa_core::batch::{
    validate_batch_action, BatchOutcome, ACTION_GENERATE_PAYMENT, ACTION_MARK_REFUNDED,
};
use mensa_core::error::CoreError;
use mensa_db::models::cancellation::RefundBatchRequest;
use mensa_db::models::payment::PaymentRecord;
use mensa_db::repositories::RefundBatchRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for refund batches: the per-item outcome, plus the credit
/// entries created when the action was `generate_payment`.
#[derive(Debug, Serialize)]
pub struct RefundBatchResponse {
    pub payments: Vec<PaymentRecord>,
    #[serde(flatten)]
    pub outcome: BatchOutcome,
}

/// POST /api/v1/meal-cancellations/refund-batch
///
/// Best-effort bulk transition: every requested id produces exactly one
/// outcome entry and a single bad id never rejects the batch.
pub async fn process_refund_batch(
    State(state): State<AppState>,
    Json(input): Json<RefundBatchRequest>,
) -> AppResult<impl IntoResponse> {
    if input.ids.is_empty() {
        return Err(CoreError::Validation("ids must not be empty".to_string()).into());
    }
    validate_batch_action(&input.action)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let (payments, outcome) = match input.action.as_str() {
        ACTION_MARK_REFUNDED => {
            let outcome = RefundBatchRepo::mark_refunded(&state.pool, &input.ids).await?;
            (Vec::new(), outcome)
        }
        ACTION_GENERATE_PAYMENT => {
            RefundBatchRepo::generate_payments(&state.pool, &input.ids).await?
        }
        // validate_batch_action already rejected everything else.
        other => {
            return Err(AppError::InternalError(format!(
                "unreachable batch action '{other}'"
            )))
        }
    };

    tracing::info!(
        action = %input.action,
        requested = input.ids.len(),
        succeeded = outcome.succeeded.len(),
        skipped = outcome.skipped.len(),
        errors = outcome.errors.len(),
        payments = payments.len(),
        "Refund batch processed"
    );

    Ok(Json(DataResponse {
        data: RefundBatchResponse { payments, outcome },
    }))
}
