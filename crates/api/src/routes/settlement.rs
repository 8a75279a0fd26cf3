//! Route definitions for the settlement view.
//!
//! ```text
//! GET    /                         list_settlements
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::settlement;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(settlement::list_settlements))
}
