//! Repository for the `group_meal_prices` table and the Postgres
//! implementation of the price-resolution port.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use mensa_core::error::CoreError;
use mensa_core::pricing::MealPriceResolver;
use mensa_core::types::DbId;

/// Provides access to the group meal-price catalog.
pub struct MealPriceRepo;

impl MealPriceRepo {
    /// Set (insert or update) the price for a group's meal type.
    ///
    /// Price changes only affect cancellations created afterwards; existing
    /// rows keep their snapshot.
    pub async fn set_price(
        pool: &PgPool,
        group_id: DbId,
        meal_type: &str,
        price: Decimal,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO group_meal_prices (group_id, meal_type, price) \
             VALUES ($1, $2, $3) \
             ON CONFLICT ON CONSTRAINT uq_group_meal_prices_group_meal \
             DO UPDATE SET price = EXCLUDED.price",
        )
        .bind(group_id)
        .bind(meal_type)
        .bind(price)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Look up the current price for a group's meal type.
    pub async fn resolve(
        pool: &PgPool,
        group_id: DbId,
        meal_type: &str,
    ) -> Result<Option<Decimal>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT price FROM group_meal_prices \
             WHERE group_id = $1 AND meal_type = $2",
        )
        .bind(group_id)
        .bind(meal_type)
        .fetch_optional(pool)
        .await
    }
}

/// Postgres-backed [`MealPriceResolver`] injected into the API state.
#[derive(Clone)]
pub struct PgMealPrices {
    pool: PgPool,
}

impl PgMealPrices {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MealPriceResolver for PgMealPrices {
    async fn resolve_price(
        &self,
        group_id: DbId,
        meal_type: &str,
    ) -> Result<Option<Decimal>, CoreError> {
        MealPriceRepo::resolve(&self.pool, group_id, meal_type)
            .await
            .map_err(|err| {
                tracing::error!(group_id, meal_type, error = %err, "Price lookup failed");
                CoreError::Internal("price lookup failed".to_string())
            })
    }
}
