use std::sync::Arc;

use mensa_core::deadline::CancellationDeadline;
use mensa_core::pricing::MealPriceResolver;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: mensa_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Cancellation deadline policy, built from the configured cutoff hour.
    pub deadline: CancellationDeadline,
    /// Price-resolution port used when snapshotting prices onto new
    /// cancellations.
    pub price_resolver: Arc<dyn MealPriceResolver>,
}
