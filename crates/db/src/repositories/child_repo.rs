//! Repository for the `children` roster table.
//!
//! The roster is owned by the wider portal; this repo covers the lookups
//! the ledger needs (group membership for price resolution) and the insert
//! used to seed fixtures.

use sqlx::PgPool;

use mensa_core::types::DbId;

use crate::models::child::{Child, CreateChild};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, group_id, first_name, last_name, created_at, updated_at";

/// Provides read access to the roster.
pub struct ChildRepo;

impl ChildRepo {
    /// Insert a new child row, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateChild) -> Result<Child, sqlx::Error> {
        let query = format!(
            "INSERT INTO children (group_id, first_name, last_name) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Child>(&query)
            .bind(input.group_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .fetch_one(pool)
            .await
    }

    /// Find a child by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Child>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM children WHERE id = $1");
        sqlx::query_as::<_, Child>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
