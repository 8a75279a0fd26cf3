//! Route definitions for the cancellation ledger.
//!
//! ```text
//! POST   /                         create_cancellation
//! GET    /                         list_cancellations
//! DELETE /{id}                     remove_cancellation
//! POST   /refund-batch             process_refund_batch
//! ```

use axum::routing::{delete, post};
use axum::Router;

use crate::handlers::cancellation;
use crate::handlers::refund_batch;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(cancellation::create_cancellation).get(cancellation::list_cancellations),
        )
        .route("/{id}", delete(cancellation::remove_cancellation))
        .route("/refund-batch", post(refund_batch::process_refund_batch))
}
