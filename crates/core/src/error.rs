use chrono::NaiveDate;

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Cancellation deadline exceeded for {meal_type} on {date}")]
    DeadlineExceeded { date: NaiveDate, meal_type: String },

    #[error("Cancellation {id} has already been refunded")]
    AlreadyRefunded { id: DbId },

    #[error("Internal error: {0}")]
    Internal(String),
}
