//! Payment-ledger credit models.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use mensa_core::types::{DbId, Timestamp};

/// A row from the `meal_refund_payments` table: one credit entry emitted
/// into the payments ledger for a child's batch of refunded cancellations.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentRecord {
    pub id: DbId,
    pub child_id: DbId,
    pub amount: Decimal,
    pub reason: String,
    pub created_at: Timestamp,
}

/// Reason string attached to refund credits.
pub const REFUND_REASON: &str = "meal cancellation refund";
