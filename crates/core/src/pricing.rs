//! Price-resolution port.
//!
//! The ledger snapshots a meal price onto every new cancellation. Where
//! that price comes from (the group's current meal-plan catalog) is a
//! collaborator concern, so it sits behind a trait: the Postgres
//! implementation lives in `mensa-db`, and tests inject an in-memory stub.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::types::DbId;

/// Resolves the current price of a meal type for a group.
///
/// Returns `Ok(None)` when no price is configured for the pair; the caller
/// decides whether that is a not-found error.
#[async_trait]
pub trait MealPriceResolver: Send + Sync {
    async fn resolve_price(
        &self,
        group_id: DbId,
        meal_type: &str,
    ) -> Result<Option<Decimal>, CoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory resolver keyed by `(group_id, meal_type)`.
    struct StubPrices(HashMap<(DbId, String), Decimal>);

    #[async_trait]
    impl MealPriceResolver for StubPrices {
        async fn resolve_price(
            &self,
            group_id: DbId,
            meal_type: &str,
        ) -> Result<Option<Decimal>, CoreError> {
            Ok(self.0.get(&(group_id, meal_type.to_string())).copied())
        }
    }

    #[tokio::test]
    async fn resolves_configured_price() {
        let mut prices = HashMap::new();
        prices.insert((1, crate::meal::MEAL_LUNCH.to_string()), Decimal::new(420, 2));
        let resolver = StubPrices(prices);

        let price = resolver
            .resolve_price(1, crate::meal::MEAL_LUNCH)
            .await
            .unwrap();
        assert_eq!(price, Some(Decimal::new(420, 2)));
    }

    #[tokio::test]
    async fn missing_pair_resolves_to_none() {
        let resolver = StubPrices(HashMap::new());
        let price = resolver
            .resolve_price(1, crate::meal::MEAL_SNACK)
            .await
            .unwrap();
        assert_eq!(price, None);
    }
}
