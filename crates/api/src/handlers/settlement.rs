//! Handler for the staff settlement view.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;

use mensa_core::settlement::build_settlements;
use mensa_db::models::cancellation::CancellationFilter;
use mensa_db::repositories::CancellationRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/settlements
///
/// Per-child settlements plus the roster-wide summary for the filtered
/// range. The rows come from a single query, so the report can never
/// observe a half-applied refund batch.
pub async fn list_settlements(
    State(state): State<AppState>,
    Query(filter): Query<CancellationFilter>,
) -> AppResult<impl IntoResponse> {
    let rows = CancellationRepo::list_filtered(&state.pool, &filter).await?;
    let report = build_settlements(rows.into_iter().map(Into::into).collect());
    Ok(Json(DataResponse { data: report }))
}
