//! Handlers for the cancellation ledger.
//!
//! Guardians create and undo cancellations here. The deadline policy is
//! re-checked server-side on every mutation, against the server clock; the
//! request bodies carry no timestamp at all, so a manipulated client clock
//! has nothing to manipulate.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Local;

use mensa_core::error::CoreError;
use mensa_core::meal::validate_meal_type;
use mensa_core::types::DbId;
use mensa_db::models::cancellation::{
    CancellationFilter, CreateCancellation, CreateCancellationRequest,
};
use mensa_db::repositories::{CancellationRepo, ChildRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/meal-cancellations
///
/// Cancel a child's meal for a day. Fails with 422 once the cutoff has
/// passed and with 409 when the slot is already cancelled.
pub async fn create_cancellation(
    State(state): State<AppState>,
    Json(input): Json<CreateCancellationRequest>,
) -> AppResult<impl IntoResponse> {
    validate_meal_type(&input.meal_type)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let now = Local::now().naive_local();
    if !state.deadline.is_cancellable(input.date, now) {
        return Err(CoreError::DeadlineExceeded {
            date: input.date,
            meal_type: input.meal_type,
        }
        .into());
    }

    let child = ChildRepo::find_by_id(&state.pool, input.child_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Child",
            id: input.child_id,
        })?;

    // Snapshot the group's current price onto the new row; later catalog
    // changes must not reach existing cancellations.
    let price = state
        .price_resolver
        .resolve_price(child.group_id, &input.meal_type)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "GroupMealPrice",
            id: child.group_id,
        })?;

    let created = CancellationRepo::create(
        &state.pool,
        &CreateCancellation {
            child_id: input.child_id,
            date: input.date,
            meal_type: input.meal_type,
            meal_price: price,
        },
    )
    .await?;

    tracing::info!(
        child_id = created.child_id,
        date = %created.date,
        meal_type = %created.meal_type,
        meal_price = %created.meal_price,
        "Meal cancelled"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// DELETE /api/v1/meal-cancellations/{id}
///
/// Undo a cancellation. Only allowed while the slot is still cancellable
/// and the row has not been refunded; removing frees the slot for a new
/// cancellation.
pub async fn remove_cancellation(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let row = CancellationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "MealCancellation",
            id,
        })?;

    if row.refunded {
        return Err(CoreError::AlreadyRefunded { id }.into());
    }

    let now = Local::now().naive_local();
    if !state.deadline.is_cancellable(row.date, now) {
        return Err(CoreError::DeadlineExceeded {
            date: row.date,
            meal_type: row.meal_type,
        }
        .into());
    }

    // The refund check is repeated inside the DELETE, so an undo that
    // races a refund batch fails instead of silently removing a paid row.
    let deleted = CancellationRepo::delete_if_unrefunded(&state.pool, id).await?;
    if !deleted {
        return match CancellationRepo::find_by_id(&state.pool, id).await? {
            Some(_) => Err(CoreError::AlreadyRefunded { id }.into()),
            None => Err(CoreError::NotFound {
                entity: "MealCancellation",
                id,
            }
            .into()),
        };
    }

    tracing::info!(
        cancellation_id = id,
        child_id = row.child_id,
        date = %row.date,
        "Meal cancellation undone"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/meal-cancellations
///
/// List ledger rows filtered by child, group, date range, and refund state,
/// in deterministic order (surname, then date).
pub async fn list_cancellations(
    State(state): State<AppState>,
    Query(filter): Query<CancellationFilter>,
) -> AppResult<impl IntoResponse> {
    let rows = CancellationRepo::list_filtered(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: rows }))
}
