//! Dining Table API Handlers
//!
//! Table CRUD plus the service lifecycle: add items, request checkout,
//! settle. Item additions land here (table-scoped); status advances live
//! in the order_items module.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{dining_table, order_item};
use crate::lifecycle;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_cash, validate_optional_text,
    validate_quantity, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{
    DiningTable, DiningTableCreate, DiningTableUpdate, ItemStatus, OrderItem, OrderItemCreate,
};

const RESOURCE: &str = "dining_table";
const ITEM_RESOURCE: &str = "order_item";

/// Table with its current service attached, for the floor view.
#[derive(Debug, Serialize)]
pub struct TableDetail {
    #[serde(flatten)]
    pub table: DiningTable,
    pub items: Vec<OrderItem>,
    /// Least-fulfilled status among active items (kitchen urgency)
    pub urgent_status: Option<ItemStatus>,
}

/// GET /api/tables - all active tables for the tenant
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<DiningTable>>> {
    let tables = dining_table::find_all(&state.pool, &user.tenant_id).await?;
    Ok(Json(tables))
}

/// GET /api/tables/:id - one table with its current items
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<TableDetail>> {
    let table = dining_table::find_by_id(&state.pool, &user.tenant_id, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Table {id} not found")))?;
    let items = order_item::find_active_by_table(&state.pool, &user.tenant_id, id).await?;
    let urgent_status = lifecycle::most_urgent_status(&items);

    Ok(Json(TableDetail {
        table,
        items,
        urgent_status,
    }))
}

/// POST /api/tables - create a table
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<DiningTable>> {
    if payload.number <= 0 {
        return Err(AppError::validation(format!(
            "number must be positive, got {}",
            payload.number
        )));
    }
    if let Some(capacity) = payload.capacity
        && capacity <= 0
    {
        return Err(AppError::validation(format!(
            "capacity must be positive, got {capacity}"
        )));
    }

    let table = dining_table::create(&state.pool, &user.tenant_id, payload).await?;
    let id = table.id.to_string();
    state
        .broadcast_sync(RESOURCE, "created", &id, Some(&table))
        .await;

    Ok(Json(table))
}

/// PUT /api/tables/:id - update a table
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<DiningTable>> {
    validate_optional_text(&payload.server_name, "server_name", MAX_NAME_LEN)?;

    let table = dining_table::update(&state.pool, &user.tenant_id, id, payload).await?;
    let id_str = id.to_string();
    state
        .broadcast_sync(RESOURCE, "updated", &id_str, Some(&table))
        .await;

    Ok(Json(table))
}

/// DELETE /api/tables/:id - deactivate a table (soft delete)
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = dining_table::delete(&state.pool, &user.tenant_id, id).await?;

    if result {
        let id_str = id.to_string();
        state
            .broadcast_sync::<()>(RESOURCE, "deleted", &id_str, None)
            .await;
    }

    Ok(Json(result))
}

/// GET /api/tables/:id/items - items of the current service
pub async fn list_items(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<OrderItem>>> {
    // 404 for an unknown table rather than an empty list
    dining_table::find_by_id(&state.pool, &user.tenant_id, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Table {id} not found")))?;

    let items = order_item::find_active_by_table(&state.pool, &user.tenant_id, id).await?;
    Ok(Json(items))
}

/// POST /api/tables/:id/items - add a product line to the table's order
pub async fn add_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<OrderItemCreate>,
) -> AppResult<Json<OrderItem>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.category, "category", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;
    validate_quantity(payload.quantity, "quantity")?;
    validate_cash(payload.unit_price, "unit_price")?;

    let item = order_item::create(&state.pool, &user.tenant_id, id, payload).await?;

    let item_id = item.id.to_string();
    state
        .broadcast_sync(ITEM_RESOURCE, "created", &item_id, Some(&item))
        .await;

    // The table's status/total changed with it
    if let Some(table) = dining_table::find_by_id(&state.pool, &user.tenant_id, id).await? {
        let table_id = table.id.to_string();
        state
            .broadcast_sync(RESOURCE, "updated", &table_id, Some(&table))
            .await;
    }

    Ok(Json(item))
}

/// POST /api/tables/:id/checkout - mark the table awaiting payment
pub async fn checkout(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<DiningTable>> {
    let table = dining_table::request_checkout(&state.pool, &user.tenant_id, id).await?;
    let id_str = id.to_string();
    state
        .broadcast_sync(RESOURCE, "checkout_requested", &id_str, Some(&table))
        .await;

    Ok(Json(table))
}

/// POST /api/tables/:id/settle - payment recorded, table returns to free
pub async fn settle(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<DiningTable>> {
    let table = dining_table::settle(&state.pool, &user.tenant_id, id).await?;
    let id_str = id.to_string();
    state
        .broadcast_sync(RESOURCE, "settled", &id_str, Some(&table))
        .await;

    Ok(Json(table))
}
