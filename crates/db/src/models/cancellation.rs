//! Meal cancellation models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use mensa_core::types::{DbId, Timestamp};

/// A row from the `meal_cancellations` table.
///
/// `meal_price` is the price snapshot taken at creation time; later catalog
/// changes never touch it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MealCancellation {
    pub id: DbId,
    pub child_id: DbId,
    pub date: NaiveDate,
    pub meal_type: String,
    pub meal_price: Decimal,
    pub refunded: bool,
    pub created_at: Timestamp,
}

/// DTO for inserting a new cancellation.
///
/// The price has already been resolved through the price port by the time
/// this reaches the repository.
#[derive(Debug, Clone)]
pub struct CreateCancellation {
    pub child_id: DbId,
    pub date: NaiveDate,
    pub meal_type: String,
    pub meal_price: Decimal,
}

/// Request body for the create-cancellation endpoint.
///
/// There is deliberately no timestamp field: the deadline decision always
/// uses the server clock.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCancellationRequest {
    pub child_id: DbId,
    pub date: NaiveDate,
    pub meal_type: String,
}

/// Request body for the refund-batch endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RefundBatchRequest {
    pub ids: Vec<DbId>,
    pub action: String,
}

/// Filter for ledger listings.
///
/// All fields are optional and combine with AND; `only_unrefunded` narrows
/// to financially outstanding rows.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CancellationFilter {
    pub child_id: Option<DbId>,
    pub group_id: Option<DbId>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub only_unrefunded: bool,
}

/// A cancellation row joined with the child's display name, as consumed by
/// the settlement aggregator.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CancellationWithChild {
    pub id: DbId,
    pub child_id: DbId,
    pub last_name: String,
    pub first_name: String,
    pub date: NaiveDate,
    pub meal_type: String,
    pub meal_price: Decimal,
    pub refunded: bool,
    pub created_at: Timestamp,
}

impl From<CancellationWithChild> for mensa_core::settlement::CancellationEntry {
    fn from(row: CancellationWithChild) -> Self {
        Self {
            id: row.id,
            child_id: row.child_id,
            child_name: format!("{}, {}", row.last_name, row.first_name),
            date: row.date,
            meal_type: row.meal_type,
            meal_price: row.meal_price,
            refunded: row.refunded,
            created_at: row.created_at,
        }
    }
}
