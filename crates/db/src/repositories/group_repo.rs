//! Repository for the `kita_groups` table.

use sqlx::PgPool;

use mensa_core::types::{DbId, Timestamp};

/// A row from the `kita_groups` table.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct KitaGroup {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

/// Provides access to kindergarten groups.
pub struct GroupRepo;

impl GroupRepo {
    /// Insert a new group, returning the created row.
    pub async fn create(pool: &PgPool, name: &str) -> Result<KitaGroup, sqlx::Error> {
        sqlx::query_as::<_, KitaGroup>(
            "INSERT INTO kita_groups (name) VALUES ($1) \
             RETURNING id, name, created_at",
        )
        .bind(name)
        .fetch_one(pool)
        .await
    }
}
