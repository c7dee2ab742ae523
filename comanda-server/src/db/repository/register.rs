//! Cash Register Repository
//!
//! Session open/close plus the append-only movement ledger. The
//! single-open-session-per-tenant invariant is enforced twice: an
//! application pre-check for a friendly error, and the partial unique index
//! on `register_session (tenant_id) WHERE status = 'OPEN'` for the race
//! two pre-checks can both pass.

use super::{RepoError, RepoResult};
use crate::money;
use shared::models::{
    CashMovement, CashMovementCreate, RegisterClose, RegisterOpen, RegisterSession, SessionStatus,
};
use sqlx::SqlitePool;

const SESSION_COLUMNS: &str = "id, tenant_id, opened_by, opening_balance, closing_balance, system_balance, status, opened_at, closed_at, note";
const MOVEMENT_COLUMNS: &str =
    "id, session_id, direction, amount, reason, note, method, recorded_by, created_at";

fn validate_amount(amount: f64, field: &str, strictly_positive: bool) -> RepoResult<()> {
    if !amount.is_finite() {
        return Err(RepoError::InvalidAmount(format!(
            "{field} must be a finite number"
        )));
    }
    if amount < 0.0 {
        return Err(RepoError::InvalidAmount(format!(
            "{field} cannot be negative: {amount}"
        )));
    }
    if strictly_positive && amount == 0.0 {
        return Err(RepoError::InvalidAmount(format!(
            "{field} must be strictly positive"
        )));
    }
    Ok(())
}

pub async fn find_by_id(
    pool: &SqlitePool,
    tenant_id: &str,
    id: i64,
) -> RepoResult<Option<RegisterSession>> {
    let session = sqlx::query_as::<_, RegisterSession>(&format!(
        "SELECT {SESSION_COLUMNS} FROM register_session WHERE id = ? AND tenant_id = ?"
    ))
    .bind(id)
    .bind(tenant_id)
    .fetch_optional(pool)
    .await?;
    Ok(session)
}

/// The tenant's currently open session, if any.
pub async fn find_open(pool: &SqlitePool, tenant_id: &str) -> RepoResult<Option<RegisterSession>> {
    let session = sqlx::query_as::<_, RegisterSession>(&format!(
        "SELECT {SESSION_COLUMNS} FROM register_session WHERE tenant_id = ? AND status = ? LIMIT 1"
    ))
    .bind(tenant_id)
    .bind(SessionStatus::Open)
    .fetch_optional(pool)
    .await?;
    Ok(session)
}

pub async fn find_all(
    pool: &SqlitePool,
    tenant_id: &str,
    limit: i32,
    offset: i32,
) -> RepoResult<Vec<RegisterSession>> {
    let sessions = sqlx::query_as::<_, RegisterSession>(&format!(
        "SELECT {SESSION_COLUMNS} FROM register_session WHERE tenant_id = ? ORDER BY opened_at DESC LIMIT ? OFFSET ?"
    ))
    .bind(tenant_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(sessions)
}

pub async fn find_by_date_range(
    pool: &SqlitePool,
    tenant_id: &str,
    start_millis: i64,
    end_millis: i64,
) -> RepoResult<Vec<RegisterSession>> {
    let sessions = sqlx::query_as::<_, RegisterSession>(&format!(
        "SELECT {SESSION_COLUMNS} FROM register_session WHERE tenant_id = ? AND opened_at >= ? AND opened_at < ? ORDER BY opened_at DESC"
    ))
    .bind(tenant_id)
    .bind(start_millis)
    .bind(end_millis)
    .fetch_all(pool)
    .await?;
    Ok(sessions)
}

/// Open a register session with a counted starting balance.
pub async fn open(
    pool: &SqlitePool,
    tenant_id: &str,
    opened_by: &str,
    data: RegisterOpen,
) -> RepoResult<RegisterSession> {
    validate_amount(data.opening_balance, "opening_balance", false)?;

    // Pre-check for a friendly error; the unique index is the real guard
    if find_open(pool, tenant_id).await?.is_some() {
        return Err(RepoError::AlreadyOpen(
            "A register session is already open for this tenant".into(),
        ));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    let result = sqlx::query(
        "INSERT INTO register_session (id, tenant_id, opened_by, opening_balance, status, opened_at, note) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(tenant_id)
    .bind(opened_by)
    .bind(data.opening_balance)
    .bind(SessionStatus::Open)
    .bind(now)
    .bind(shared::util::blank_to_none(data.note))
    .execute(pool)
    .await;

    if let Err(e) = result {
        return Err(match RepoError::from(e) {
            // Lost the race against a concurrent open
            RepoError::Duplicate(_) => RepoError::AlreadyOpen(
                "A register session is already open for this tenant".into(),
            ),
            other => other,
        });
    }

    find_by_id(pool, tenant_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to open register session".into()))
}

/// Append a movement to an open session's ledger.
///
/// The insert is guarded by the session status in the same statement, so a
/// movement can never land on a session that closed in between.
pub async fn record_movement(
    pool: &SqlitePool,
    tenant_id: &str,
    recorded_by: &str,
    session_id: i64,
    data: CashMovementCreate,
) -> RepoResult<CashMovement> {
    validate_amount(data.amount, "amount", true)?;
    if data.reason.trim().is_empty() {
        return Err(RepoError::MissingReason(
            "A movement requires a reason".into(),
        ));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    let rows = sqlx::query(
        "INSERT INTO cash_movement (id, session_id, direction, amount, reason, note, method, recorded_by, created_at) \
         SELECT ?, id, ?, ?, ?, ?, ?, ?, ? FROM register_session WHERE id = ? AND tenant_id = ? AND status = ?",
    )
    .bind(id)
    .bind(data.direction)
    .bind(data.amount)
    .bind(data.reason.trim())
    .bind(shared::util::blank_to_none(data.note))
    .bind(shared::util::blank_to_none(data.method))
    .bind(recorded_by)
    .bind(now)
    .bind(session_id)
    .bind(tenant_id)
    .bind(SessionStatus::Open)
    .execute(pool)
    .await?
    .rows_affected();

    if rows == 0 {
        return match find_by_id(pool, tenant_id, session_id).await? {
            None => Err(RepoError::NotFound(format!(
                "Register session {session_id} not found"
            ))),
            Some(_) => Err(RepoError::SessionClosed(format!(
                "Register session {session_id} is closed, the ledger is immutable"
            ))),
        };
    }

    let movement = sqlx::query_as::<_, CashMovement>(&format!(
        "SELECT {MOVEMENT_COLUMNS} FROM cash_movement WHERE id = ?"
    ))
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(movement)
}

/// The session's full ledger, in insertion order.
pub async fn movements(
    pool: &SqlitePool,
    tenant_id: &str,
    session_id: i64,
) -> RepoResult<Vec<CashMovement>> {
    let rows = sqlx::query_as::<_, CashMovement>(
        "SELECT m.id, m.session_id, m.direction, m.amount, m.reason, m.note, m.method, m.recorded_by, m.created_at \
         FROM cash_movement m JOIN register_session s ON s.id = m.session_id \
         WHERE m.session_id = ? AND s.tenant_id = ? ORDER BY m.created_at, m.id",
    )
    .bind(session_id)
    .bind(tenant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Session plus its ledger balance, recomputed from the movement list.
pub async fn balance(
    pool: &SqlitePool,
    tenant_id: &str,
    session_id: i64,
) -> RepoResult<(RegisterSession, f64)> {
    let session = find_by_id(pool, tenant_id, session_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Register session {session_id} not found")))?;

    let ledger = movements(pool, tenant_id, session_id).await?;
    let computed = money::to_f64(money::session_balance(session.opening_balance, &ledger));
    Ok((session, computed))
}

/// Close the session with a physically counted balance.
///
/// Captures the ledger balance as `system_balance` for reconciliation and
/// returns the discrepancy (`counted − computed`). A mismatch is surfaced,
/// never blocking.
///
/// The status flip runs first, inside one transaction with the ledger read:
/// holding the write lock while the row is already `CLOSED` means no
/// guarded movement insert can land between the snapshot and the close.
pub async fn close(
    pool: &SqlitePool,
    tenant_id: &str,
    session_id: i64,
    data: RegisterClose,
) -> RepoResult<(RegisterSession, f64)> {
    validate_amount(data.counted_balance, "counted_balance", false)?;

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "UPDATE register_session SET status = ?, closing_balance = ?, closed_at = ?, note = COALESCE(?, note) WHERE id = ? AND tenant_id = ? AND status = ?",
    )
    .bind(SessionStatus::Closed)
    .bind(data.counted_balance)
    .bind(now)
    .bind(shared::util::blank_to_none(data.note))
    .bind(session_id)
    .bind(tenant_id)
    .bind(SessionStatus::Open)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if rows == 0 {
        tx.rollback().await?;
        return match find_by_id(pool, tenant_id, session_id).await? {
            None => Err(RepoError::NotFound(format!(
                "Register session {session_id} not found"
            ))),
            Some(_) => Err(RepoError::AlreadyClosed(format!(
                "Register session {session_id} is already closed"
            ))),
        };
    }

    let opening_balance: f64 =
        sqlx::query_scalar("SELECT opening_balance FROM register_session WHERE id = ?")
            .bind(session_id)
            .fetch_one(&mut *tx)
            .await?;
    let ledger = sqlx::query_as::<_, CashMovement>(&format!(
        "SELECT {MOVEMENT_COLUMNS} FROM cash_movement WHERE session_id = ? ORDER BY created_at, id"
    ))
    .bind(session_id)
    .fetch_all(&mut *tx)
    .await?;
    let computed = money::to_f64(money::session_balance(opening_balance, &ledger));

    sqlx::query("UPDATE register_session SET system_balance = ? WHERE id = ?")
        .bind(computed)
        .bind(session_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    let session = find_by_id(pool, tenant_id, session_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Register session {session_id} not found")))?;
    let diff = money::discrepancy(data.counted_balance, computed);
    Ok((session, diff))
}
