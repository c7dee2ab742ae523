//! Order Item Repository
//!
//! Items are append-only: created as `PENDING`, mutated only by status
//! advances (compare-and-set on the current status), never deleted. After
//! every item mutation the owning table's denormalized total and derived
//! status are refreshed from the active set.

use super::{RepoError, RepoResult, dining_table};
use crate::{lifecycle, money};
use shared::models::{DiningTable, ItemStatus, OrderItem, OrderItemCreate, TableStatus};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, tenant_id, table_id, product_id, name, category, quantity, unit_price, note, status, settled_at, created_at, updated_at";

pub async fn find_by_id(
    pool: &SqlitePool,
    tenant_id: &str,
    id: i64,
) -> RepoResult<Option<OrderItem>> {
    let item = sqlx::query_as::<_, OrderItem>(&format!(
        "SELECT {COLUMNS} FROM order_item WHERE id = ? AND tenant_id = ?"
    ))
    .bind(id)
    .bind(tenant_id)
    .fetch_optional(pool)
    .await?;
    Ok(item)
}

/// Items of the table's current service (settled history excluded,
/// cancelled items included so the client can show them struck through).
pub async fn find_active_by_table(
    pool: &SqlitePool,
    tenant_id: &str,
    table_id: i64,
) -> RepoResult<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(&format!(
        "SELECT {COLUMNS} FROM order_item WHERE table_id = ? AND tenant_id = ? AND settled_at IS NULL ORDER BY created_at, id"
    ))
    .bind(table_id)
    .bind(tenant_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Add a product line to a table's open order.
///
/// The first item added to a free table occupies it (stamping `opened_at`);
/// a table already awaiting payment accepts no more items.
pub async fn create(
    pool: &SqlitePool,
    tenant_id: &str,
    table_id: i64,
    data: OrderItemCreate,
) -> RepoResult<OrderItem> {
    let table = dining_table::find_by_id(pool, tenant_id, table_id)
        .await?
        .filter(|t| t.is_active)
        .ok_or_else(|| RepoError::NotFound(format!("Table {table_id} not found")))?;

    if table.status == TableStatus::AwaitingPayment {
        return Err(RepoError::InvalidTransition(format!(
            "Table {} is awaiting payment and accepts no new items",
            table.number
        )));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    sqlx::query(
        "INSERT INTO order_item (id, tenant_id, table_id, product_id, name, category, quantity, unit_price, note, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(tenant_id)
    .bind(table_id)
    .bind(data.product_id)
    .bind(&data.name)
    .bind(&data.category)
    .bind(data.quantity)
    .bind(data.unit_price)
    .bind(shared::util::blank_to_none(data.note))
    .bind(ItemStatus::Pending)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    refresh_table_aggregate(pool, tenant_id, table_id).await?;

    find_by_id(pool, tenant_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order item".into()))
}

/// Advance an item along its fulfillment sequence (or cancel it).
///
/// The write is a compare-and-set on the current status; losing a race to a
/// concurrent advance is reported as an invalid transition, not retried.
pub async fn advance(
    pool: &SqlitePool,
    tenant_id: &str,
    id: i64,
    target: ItemStatus,
) -> RepoResult<OrderItem> {
    let item = find_by_id(pool, tenant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order item {id} not found")))?;

    lifecycle::ensure_transition(item.status, target)
        .map_err(|e| RepoError::InvalidTransition(e.to_string()))?;

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE order_item SET status = ?, updated_at = ? WHERE id = ? AND tenant_id = ? AND status = ? AND settled_at IS NULL",
    )
    .bind(target)
    .bind(now)
    .bind(id)
    .bind(tenant_id)
    .bind(item.status)
    .execute(pool)
    .await?
    .rows_affected();

    if rows == 0 {
        // A concurrent writer changed the row between read and write
        return match find_by_id(pool, tenant_id, id).await? {
            None => Err(RepoError::NotFound(format!("Order item {id} not found"))),
            Some(current) => Err(RepoError::InvalidTransition(format!(
                "Order item {id} is now {}, cannot move to {}",
                current.status.as_str(),
                target.as_str()
            ))),
        };
    }

    refresh_table_aggregate(pool, tenant_id, item.table_id).await?;

    find_by_id(pool, tenant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order item {id} not found")))
}

/// Recompute the owning table's denormalized total and derived status from
/// its active items.
///
/// Handles both directions: the first active item occupies a free table
/// (stamping `opened_at`), and cancelling the last active item frees an
/// occupied one (clearing it). A table awaiting payment keeps its marker
/// until settlement.
pub async fn refresh_table_aggregate(
    pool: &SqlitePool,
    tenant_id: &str,
    table_id: i64,
) -> RepoResult<DiningTable> {
    let table = dining_table::find_by_id(pool, tenant_id, table_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Table {table_id} not found")))?;

    let items = find_active_by_table(pool, tenant_id, table_id).await?;
    let total = money::to_f64(money::table_total(&items));
    let checkout_requested = table.status == TableStatus::AwaitingPayment;
    let status = lifecycle::derive_table_status(&items, checkout_requested);

    let now = shared::util::now_millis();
    match status {
        TableStatus::Free => {
            sqlx::query(
                "UPDATE dining_table SET status = ?, opened_at = NULL, server_name = NULL, total = 0, updated_at = ? WHERE id = ? AND tenant_id = ?",
            )
            .bind(TableStatus::Free)
            .bind(now)
            .bind(table_id)
            .bind(tenant_id)
            .execute(pool)
            .await?;
        }
        _ => {
            // First active item on a free table starts the service clock
            let opened_at = table.opened_at.unwrap_or(now);
            sqlx::query(
                "UPDATE dining_table SET status = ?, opened_at = ?, total = ?, updated_at = ? WHERE id = ? AND tenant_id = ?",
            )
            .bind(status)
            .bind(opened_at)
            .bind(total)
            .bind(now)
            .bind(table_id)
            .bind(tenant_id)
            .execute(pool)
            .await?;
        }
    }

    dining_table::find_by_id(pool, tenant_id, table_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Table {table_id} not found")))
}
