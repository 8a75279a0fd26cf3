//! Roster models.
//!
//! The roster itself is maintained elsewhere in the portal; these models
//! cover the read access the ledger and aggregator need (group filtering,
//! display names, price-group lookup) plus the fixture inserts tests use.

use serde::Serialize;
use sqlx::FromRow;

use mensa_core::types::{DbId, Timestamp};

/// A row from the `children` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Child {
    pub id: DbId,
    pub group_id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a child row.
#[derive(Debug, Clone)]
pub struct CreateChild {
    pub group_id: DbId,
    pub first_name: String,
    pub last_name: String,
}
