//! Repository for the `meal_cancellations` table.
//!
//! The one-cancellation-per-slot invariant is enforced by the
//! `uq_meal_cancellations_slot` unique constraint, not by a
//! check-then-insert: when two guardians race on the same slot the loser's
//! INSERT fails with a unique violation, which the API layer surfaces as a
//! conflict.

use sqlx::PgPool;

use mensa_core::types::DbId;

use crate::models::cancellation::{
    CancellationFilter, CancellationWithChild, CreateCancellation, MealCancellation,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, child_id, date, meal_type, meal_price, refunded, created_at";

/// Column list for listings joined with the roster.
const JOINED_COLUMNS: &str = "c.id, c.child_id, ch.last_name, ch.first_name, \
    c.date, c.meal_type, c.meal_price, c.refunded, c.created_at";

/// Provides CRUD operations for meal cancellations.
pub struct CancellationRepo;

impl CancellationRepo {
    /// Insert a new cancellation, returning the created row.
    ///
    /// Fails with a unique violation on `uq_meal_cancellations_slot` if the
    /// slot is already cancelled.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCancellation,
    ) -> Result<MealCancellation, sqlx::Error> {
        let query = format!(
            "INSERT INTO meal_cancellations (child_id, date, meal_type, meal_price) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MealCancellation>(&query)
            .bind(input.child_id)
            .bind(input.date)
            .bind(&input.meal_type)
            .bind(input.meal_price)
            .fetch_one(pool)
            .await
    }

    /// Find a single cancellation by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MealCancellation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM meal_cancellations WHERE id = $1");
        sqlx::query_as::<_, MealCancellation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch all cancellations matching the given ids (order unspecified).
    pub async fn find_many(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<MealCancellation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM meal_cancellations WHERE id = ANY($1)");
        sqlx::query_as::<_, MealCancellation>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Delete a cancellation only if it has not been refunded yet.
    ///
    /// The refund check happens inside the DELETE itself, so an undo racing
    /// a concurrent batch refund cannot remove a row the batch just paid
    /// out. Returns `true` if a row was deleted.
    pub async fn delete_if_unrefunded(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM meal_cancellations WHERE id = $1 AND refunded = false",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List cancellations joined with the roster, applying the filter.
    ///
    /// Ordering is deterministic: child surname, first name, child id, then
    /// date and meal type.
    pub async fn list_filtered(
        pool: &PgPool,
        filter: &CancellationFilter,
    ) -> Result<Vec<CancellationWithChild>, sqlx::Error> {
        // Build the WHERE clause; every bound condition's parameter index
        // is its position in the clause. The bind-free refunded condition
        // goes last so it does not shift the indices.
        let mut conditions: Vec<String> = Vec::new();

        if filter.child_id.is_some() {
            conditions.push(format!("c.child_id = ${}", conditions.len() + 1));
        }
        if filter.group_id.is_some() {
            conditions.push(format!("ch.group_id = ${}", conditions.len() + 1));
        }
        if filter.from.is_some() {
            conditions.push(format!("c.date >= ${}", conditions.len() + 1));
        }
        if filter.to.is_some() {
            conditions.push(format!("c.date <= ${}", conditions.len() + 1));
        }
        if filter.only_unrefunded {
            conditions.push("c.refunded = false".to_string());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {JOINED_COLUMNS} \
             FROM meal_cancellations c \
             JOIN children ch ON ch.id = c.child_id \
             {where_clause} \
             ORDER BY ch.last_name ASC, ch.first_name ASC, ch.id ASC, \
                      c.date ASC, c.meal_type ASC"
        );

        let mut q = sqlx::query_as::<_, CancellationWithChild>(&query);

        if let Some(child_id) = filter.child_id {
            q = q.bind(child_id);
        }
        if let Some(group_id) = filter.group_id {
            q = q.bind(group_id);
        }
        if let Some(from) = filter.from {
            q = q.bind(from);
        }
        if let Some(to) = filter.to {
            q = q.bind(to);
        }

        q.fetch_all(pool).await
    }
}
