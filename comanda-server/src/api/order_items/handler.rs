//! Order Item Handlers
//!
//! Item creation is table-scoped and lives in the tables module; here the
//! item is addressed directly for status advancement.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{dining_table, order_item};
use crate::utils::{AppError, AppResult};
use shared::models::{OrderItem, OrderItemAdvance};

const RESOURCE: &str = "order_item";
const TABLE_RESOURCE: &str = "dining_table";

/// GET /api/order-items/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderItem>> {
    let item = order_item::find_by_id(&state.pool, &user.tenant_id, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order item {id} not found")))?;
    Ok(Json(item))
}

/// POST /api/order-items/:id/status - advance or cancel an item
pub async fn advance(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<OrderItemAdvance>,
) -> AppResult<Json<OrderItem>> {
    let item = order_item::advance(&state.pool, &user.tenant_id, id, payload.status).await?;

    let item_id = item.id.to_string();
    state
        .broadcast_sync(RESOURCE, "updated", &item_id, Some(&item))
        .await;

    // Cancelling can flip the table back to free, so ship the table too
    if let Some(table) =
        dining_table::find_by_id(&state.pool, &user.tenant_id, item.table_id).await?
    {
        let table_id = table.id.to_string();
        state
            .broadcast_sync(TABLE_RESOURCE, "updated", &table_id, Some(&table))
            .await;
    }

    Ok(Json(item))
}
