pub mod cancellation;
pub mod health;
pub mod settlement;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /meal-cancellations                       create (POST), list (GET)
/// /meal-cancellations/{id}                  remove (DELETE)
/// /meal-cancellations/refund-batch          staff refund batch (POST)
///
/// /settlements                              per-child + summary view (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/meal-cancellations", cancellation::router())
        .nest("/settlements", settlement::router())
}
