//! Dining Table Repository
//!
//! CRUD plus the checkout/settlement transitions. Status changes are
//! conditional updates keyed on the current status, so two concurrent
//! settlements cannot both succeed.

use super::{RepoError, RepoResult};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate, TableStatus};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, tenant_id, number, capacity, status, opened_at, server_name, total, is_active, created_at, updated_at";

pub async fn find_by_id(
    pool: &SqlitePool,
    tenant_id: &str,
    id: i64,
) -> RepoResult<Option<DiningTable>> {
    let table = sqlx::query_as::<_, DiningTable>(&format!(
        "SELECT {COLUMNS} FROM dining_table WHERE id = ? AND tenant_id = ?"
    ))
    .bind(id)
    .bind(tenant_id)
    .fetch_optional(pool)
    .await?;
    Ok(table)
}

pub async fn find_all(pool: &SqlitePool, tenant_id: &str) -> RepoResult<Vec<DiningTable>> {
    let tables = sqlx::query_as::<_, DiningTable>(&format!(
        "SELECT {COLUMNS} FROM dining_table WHERE tenant_id = ? AND is_active = 1 ORDER BY number"
    ))
    .bind(tenant_id)
    .fetch_all(pool)
    .await?;
    Ok(tables)
}

pub async fn create(
    pool: &SqlitePool,
    tenant_id: &str,
    data: DiningTableCreate,
) -> RepoResult<DiningTable> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let capacity = data.capacity.unwrap_or(4);

    let result = sqlx::query(
        "INSERT INTO dining_table (id, tenant_id, number, capacity, status, total, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, 0, 1, ?, ?)",
    )
    .bind(id)
    .bind(tenant_id)
    .bind(data.number)
    .bind(capacity)
    .bind(TableStatus::Free)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await;

    if let Err(e) = result {
        return Err(match RepoError::from(e) {
            RepoError::Duplicate(_) => {
                RepoError::Duplicate(format!("Table number {} already exists", data.number))
            }
            other => other,
        });
    }

    find_by_id(pool, tenant_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create table".into()))
}

pub async fn update(
    pool: &SqlitePool,
    tenant_id: &str,
    id: i64,
    data: DiningTableUpdate,
) -> RepoResult<DiningTable> {
    let now = shared::util::now_millis();

    let result = sqlx::query(
        "UPDATE dining_table SET number = COALESCE(?, number), capacity = COALESCE(?, capacity), server_name = COALESCE(?, server_name), is_active = COALESCE(?, is_active), updated_at = ? WHERE id = ? AND tenant_id = ?",
    )
    .bind(data.number)
    .bind(data.capacity)
    .bind(data.server_name)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .bind(tenant_id)
    .execute(pool)
    .await;

    let rows = match result {
        Ok(r) => r.rows_affected(),
        Err(e) => {
            return Err(match RepoError::from(e) {
                RepoError::Duplicate(_) => {
                    RepoError::Duplicate("Table number already exists".into())
                }
                other => other,
            });
        }
    };

    if rows == 0 {
        return Err(RepoError::NotFound(format!("Table {id} not found")));
    }
    find_by_id(pool, tenant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Table {id} not found")))
}

/// Soft-delete. Only free tables can be deactivated; a table mid-service
/// has to be settled first.
pub async fn delete(pool: &SqlitePool, tenant_id: &str, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE dining_table SET is_active = 0, updated_at = ? WHERE id = ? AND tenant_id = ? AND status = ? AND is_active = 1",
    )
    .bind(now)
    .bind(id)
    .bind(tenant_id)
    .bind(TableStatus::Free)
    .execute(pool)
    .await?
    .rows_affected();

    if rows == 0 {
        return match find_by_id(pool, tenant_id, id).await? {
            None => Err(RepoError::NotFound(format!("Table {id} not found"))),
            Some(t) if !t.is_active => Ok(false),
            Some(t) => Err(RepoError::Validation(format!(
                "Table {} is {}, only free tables can be removed",
                t.number,
                t.status.as_str()
            ))),
        };
    }
    Ok(true)
}

/// `OCCUPIED → AWAITING_PAYMENT` when checkout is requested.
pub async fn request_checkout(
    pool: &SqlitePool,
    tenant_id: &str,
    id: i64,
) -> RepoResult<DiningTable> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE dining_table SET status = ?, updated_at = ? WHERE id = ? AND tenant_id = ? AND status = ?",
    )
    .bind(TableStatus::AwaitingPayment)
    .bind(now)
    .bind(id)
    .bind(tenant_id)
    .bind(TableStatus::Occupied)
    .execute(pool)
    .await?
    .rows_affected();

    if rows == 0 {
        return match find_by_id(pool, tenant_id, id).await? {
            None => Err(RepoError::NotFound(format!("Table {id} not found"))),
            Some(t) => Err(RepoError::InvalidTransition(format!(
                "Table {} is {}, checkout requires an occupied table",
                t.number,
                t.status.as_str()
            ))),
        };
    }
    find_by_id(pool, tenant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Table {id} not found")))
}

/// `AWAITING_PAYMENT → FREE` once payment is recorded.
///
/// The table's items are stamped `settled_at` in the same transaction, so
/// they leave the active set atomically with the status flip. A concurrent
/// second settlement sees zero rows affected and fails.
pub async fn settle(pool: &SqlitePool, tenant_id: &str, id: i64) -> RepoResult<DiningTable> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "UPDATE dining_table SET status = ?, opened_at = NULL, server_name = NULL, total = 0, updated_at = ? WHERE id = ? AND tenant_id = ? AND status = ?",
    )
    .bind(TableStatus::Free)
    .bind(now)
    .bind(id)
    .bind(tenant_id)
    .bind(TableStatus::AwaitingPayment)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if rows == 0 {
        tx.rollback().await?;
        return match find_by_id(pool, tenant_id, id).await? {
            None => Err(RepoError::NotFound(format!("Table {id} not found"))),
            Some(t) => Err(RepoError::InvalidTransition(format!(
                "Table {} is {}, settlement requires a checkout request first",
                t.number,
                t.status.as_str()
            ))),
        };
    }

    sqlx::query(
        "UPDATE order_item SET settled_at = ?, updated_at = ? WHERE table_id = ? AND tenant_id = ? AND settled_at IS NULL",
    )
    .bind(now)
    .bind(now)
    .bind(id)
    .bind(tenant_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    find_by_id(pool, tenant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Table {id} not found")))
}
