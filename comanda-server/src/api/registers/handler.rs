//! Cash Register Handlers
//!
//! Sessions open with a counted float and close against a counted balance;
//! everything in between is the append-only movement ledger.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::register;
use crate::utils::validation::{MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult, time};
use shared::models::{
    CashMovement, CashMovementCreate, RegisterClose, RegisterOpen, RegisterSession,
};

const RESOURCE: &str = "register_session";
const MOVEMENT_RESOURCE: &str = "cash_movement";

fn default_limit() -> i32 {
    50
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
    /// YYYY-MM-DD, interpreted in the business timezone
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Session with its live ledger balance.
#[derive(Debug, Serialize)]
pub struct SessionBalance {
    #[serde(flatten)]
    pub session: RegisterSession,
    pub balance: f64,
}

/// Closing report: the sealed session and the counted-vs-computed gap.
#[derive(Debug, Serialize)]
pub struct SessionReport {
    #[serde(flatten)]
    pub session: RegisterSession,
    pub discrepancy: f64,
}

/// GET /api/registers - session history, newest first
///
/// With `start_date`/`end_date` the listing filters on the opening time,
/// both days inclusive; otherwise it pages with `limit`/`offset`.
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<RegisterSession>>> {
    let sessions = match (&query.start_date, &query.end_date) {
        (Some(start), Some(end)) => {
            let tz = state.config.timezone;
            let start_millis = time::day_start_millis(time::parse_date(start)?, tz);
            let end_millis = time::day_end_millis(time::parse_date(end)?, tz);
            if start_millis >= end_millis {
                return Err(AppError::validation(format!(
                    "start_date {start} is after end_date {end}"
                )));
            }
            register::find_by_date_range(&state.pool, &user.tenant_id, start_millis, end_millis)
                .await?
        }
        (None, None) => {
            let limit = query.limit.clamp(1, 500);
            let offset = query.offset.max(0);
            register::find_all(&state.pool, &user.tenant_id, limit, offset).await?
        }
        _ => {
            return Err(AppError::validation(
                "start_date and end_date must be provided together",
            ));
        }
    };
    Ok(Json(sessions))
}

/// POST /api/registers - open a session
pub async fn open(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<RegisterOpen>,
) -> AppResult<Json<RegisterSession>> {
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let session = register::open(&state.pool, &user.tenant_id, &user.user_id, payload).await?;
    let id = session.id.to_string();
    state
        .broadcast_sync(RESOURCE, "opened", &id, Some(&session))
        .await;

    Ok(Json(session))
}

/// GET /api/registers/current - the open session, 404 when none
pub async fn current(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<RegisterSession>> {
    let session = register::find_open(&state.pool, &user.tenant_id)
        .await?
        .ok_or_else(|| AppError::not_found("No register session is open"))?;
    Ok(Json(session))
}

/// GET /api/registers/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<RegisterSession>> {
    let session = register::find_by_id(&state.pool, &user.tenant_id, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Register session {id} not found")))?;
    Ok(Json(session))
}

/// POST /api/registers/:id/close - seal the session against a counted balance
pub async fn close(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<RegisterClose>,
) -> AppResult<Json<SessionReport>> {
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let (session, discrepancy) = register::close(&state.pool, &user.tenant_id, id, payload).await?;
    let id_str = id.to_string();
    state
        .broadcast_sync(RESOURCE, "closed", &id_str, Some(&session))
        .await;

    Ok(Json(SessionReport {
        session,
        discrepancy,
    }))
}

/// GET /api/registers/:id/movements - the ledger, oldest first
pub async fn list_movements(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<CashMovement>>> {
    // Distinguish an unknown session from an empty ledger
    register::find_by_id(&state.pool, &user.tenant_id, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Register session {id} not found")))?;

    let ledger = register::movements(&state.pool, &user.tenant_id, id).await?;
    Ok(Json(ledger))
}

/// POST /api/registers/:id/movements - append a cash movement
pub async fn record_movement(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<CashMovementCreate>,
) -> AppResult<Json<CashMovement>> {
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.method, "method", MAX_SHORT_TEXT_LEN)?;

    let movement =
        register::record_movement(&state.pool, &user.tenant_id, &user.user_id, id, payload).await?;
    let movement_id = movement.id.to_string();
    state
        .broadcast_sync(MOVEMENT_RESOURCE, "created", &movement_id, Some(&movement))
        .await;

    Ok(Json(movement))
}

/// GET /api/registers/:id/balance - live ledger balance
pub async fn balance(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<SessionBalance>> {
    let (session, balance) = register::balance(&state.pool, &user.tenant_id, id).await?;
    Ok(Json(SessionBalance { session, balance }))
}
