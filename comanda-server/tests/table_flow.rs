//! Table service flow: occupy, fulfill, checkout, settle.

use comanda_server::db::DbService;
use comanda_server::db::repository::{RepoError, dining_table, order_item};
use shared::models::{
    DiningTableCreate, DiningTableUpdate, ItemStatus, OrderItemCreate, TableStatus,
};
use sqlx::SqlitePool;

const TENANT: &str = "tenant-a";

async fn setup() -> (tempfile::TempDir, SqlitePool) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("test.db");
    let db = DbService::new(db_path.to_str().expect("utf8 path"))
        .await
        .expect("db setup");
    (dir, db.pool)
}

fn item(name: &str, quantity: i32, unit_price: f64) -> OrderItemCreate {
    OrderItemCreate {
        product_id: 1,
        name: name.to_string(),
        category: None,
        quantity,
        unit_price,
        note: None,
    }
}

#[tokio::test]
async fn new_table_starts_free_and_empty() {
    let (_dir, pool) = setup().await;

    let table = dining_table::create(
        &pool,
        TENANT,
        DiningTableCreate {
            number: 1,
            capacity: Some(2),
        },
    )
    .await
    .unwrap();

    assert_eq!(table.status, TableStatus::Free);
    assert_eq!(table.total, 0.0);
    assert!(table.opened_at.is_none());
    assert!(table.server_name.is_none());
    assert!(table.is_active);
}

#[tokio::test]
async fn duplicate_table_number_is_rejected() {
    let (_dir, pool) = setup().await;

    let create = DiningTableCreate {
        number: 7,
        capacity: None,
    };
    dining_table::create(&pool, TENANT, create.clone())
        .await
        .unwrap();

    let err = dining_table::create(&pool, TENANT, create.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));

    // Same number is fine for a different tenant
    dining_table::create(&pool, "tenant-b", create).await.unwrap();
}

#[tokio::test]
async fn first_item_occupies_the_table() {
    let (_dir, pool) = setup().await;
    let table = dining_table::create(
        &pool,
        TENANT,
        DiningTableCreate {
            number: 1,
            capacity: None,
        },
    )
    .await
    .unwrap();

    order_item::create(&pool, TENANT, table.id, item("Feijoada", 2, 10.0))
        .await
        .unwrap();
    order_item::create(&pool, TENANT, table.id, item("Suco", 1, 10.0))
        .await
        .unwrap();

    let table = dining_table::find_by_id(&pool, TENANT, table.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(table.status, TableStatus::Occupied);
    assert_eq!(table.total, 30.0);
    assert!(table.opened_at.is_some());
}

#[tokio::test]
async fn item_advances_one_step_at_a_time() {
    let (_dir, pool) = setup().await;
    let table = dining_table::create(
        &pool,
        TENANT,
        DiningTableCreate {
            number: 1,
            capacity: None,
        },
    )
    .await
    .unwrap();
    let created = order_item::create(&pool, TENANT, table.id, item("Feijoada", 1, 25.0))
        .await
        .unwrap();
    assert_eq!(created.status, ItemStatus::Pending);

    // Skipping is illegal
    let err = order_item::advance(&pool, TENANT, created.id, ItemStatus::Ready)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidTransition(_)));

    for target in [ItemStatus::Preparing, ItemStatus::Ready, ItemStatus::Delivered] {
        let advanced = order_item::advance(&pool, TENANT, created.id, target)
            .await
            .unwrap();
        assert_eq!(advanced.status, target);
    }

    // Delivered is terminal
    let err = order_item::advance(&pool, TENANT, created.id, ItemStatus::Cancelled)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidTransition(_)));
}

#[tokio::test]
async fn cancelled_items_leave_the_total() {
    let (_dir, pool) = setup().await;
    let table = dining_table::create(
        &pool,
        TENANT,
        DiningTableCreate {
            number: 1,
            capacity: None,
        },
    )
    .await
    .unwrap();

    let keep = order_item::create(&pool, TENANT, table.id, item("Feijoada", 1, 25.0))
        .await
        .unwrap();
    let cancel = order_item::create(&pool, TENANT, table.id, item("Suco", 2, 5.0))
        .await
        .unwrap();

    order_item::advance(&pool, TENANT, cancel.id, ItemStatus::Cancelled)
        .await
        .unwrap();

    let table = dining_table::find_by_id(&pool, TENANT, table.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(table.total, 25.0);
    assert_eq!(table.status, TableStatus::Occupied);

    // The cancelled item stays visible in the service listing
    let items = order_item::find_active_by_table(&pool, TENANT, table.id)
        .await
        .unwrap();
    assert_eq!(items.len(), 2);

    // Cancelling the last live item frees the table entirely
    order_item::advance(&pool, TENANT, keep.id, ItemStatus::Cancelled)
        .await
        .unwrap();
    let table = dining_table::find_by_id(&pool, TENANT, table.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(table.status, TableStatus::Free);
    assert_eq!(table.total, 0.0);
    assert!(table.opened_at.is_none());
}

#[tokio::test]
async fn checkout_then_settle_clears_the_table() {
    let (_dir, pool) = setup().await;
    let table = dining_table::create(
        &pool,
        TENANT,
        DiningTableCreate {
            number: 1,
            capacity: None,
        },
    )
    .await
    .unwrap();

    order_item::create(&pool, TENANT, table.id, item("Feijoada", 2, 10.0))
        .await
        .unwrap();

    let table_after = dining_table::request_checkout(&pool, TENANT, table.id)
        .await
        .unwrap();
    assert_eq!(table_after.status, TableStatus::AwaitingPayment);
    assert_eq!(table_after.total, 20.0);

    // No new items once the bill was requested
    let err = order_item::create(&pool, TENANT, table.id, item("Cafezinho", 1, 3.0))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidTransition(_)));

    let settled = dining_table::settle(&pool, TENANT, table.id).await.unwrap();
    assert_eq!(settled.status, TableStatus::Free);
    assert_eq!(settled.total, 0.0);
    assert!(settled.opened_at.is_none());

    // The settled items are out of the active service but kept as history
    let active = order_item::find_active_by_table(&pool, TENANT, table.id)
        .await
        .unwrap();
    assert!(active.is_empty());
}

#[tokio::test]
async fn checkout_requires_an_occupied_table() {
    let (_dir, pool) = setup().await;
    let table = dining_table::create(
        &pool,
        TENANT,
        DiningTableCreate {
            number: 1,
            capacity: None,
        },
    )
    .await
    .unwrap();

    let err = dining_table::request_checkout(&pool, TENANT, table.id)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidTransition(_)));

    // Settlement without a prior checkout request is equally illegal
    order_item::create(&pool, TENANT, table.id, item("Feijoada", 1, 10.0))
        .await
        .unwrap();
    let err = dining_table::settle(&pool, TENANT, table.id).await.unwrap_err();
    assert!(matches!(err, RepoError::InvalidTransition(_)));
}

#[tokio::test]
async fn settlement_happens_once() {
    let (_dir, pool) = setup().await;
    let table = dining_table::create(
        &pool,
        TENANT,
        DiningTableCreate {
            number: 1,
            capacity: None,
        },
    )
    .await
    .unwrap();
    order_item::create(&pool, TENANT, table.id, item("Feijoada", 1, 10.0))
        .await
        .unwrap();
    dining_table::request_checkout(&pool, TENANT, table.id)
        .await
        .unwrap();

    dining_table::settle(&pool, TENANT, table.id).await.unwrap();
    let err = dining_table::settle(&pool, TENANT, table.id).await.unwrap_err();
    assert!(matches!(err, RepoError::InvalidTransition(_)));
}

#[tokio::test]
async fn only_free_tables_can_be_removed() {
    let (_dir, pool) = setup().await;
    let table = dining_table::create(
        &pool,
        TENANT,
        DiningTableCreate {
            number: 1,
            capacity: None,
        },
    )
    .await
    .unwrap();
    order_item::create(&pool, TENANT, table.id, item("Feijoada", 1, 10.0))
        .await
        .unwrap();

    let err = dining_table::delete(&pool, TENANT, table.id).await.unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    // Free it and the removal goes through
    let items = order_item::find_active_by_table(&pool, TENANT, table.id)
        .await
        .unwrap();
    order_item::advance(&pool, TENANT, items[0].id, ItemStatus::Cancelled)
        .await
        .unwrap();

    assert!(dining_table::delete(&pool, TENANT, table.id).await.unwrap());
    let listed = dining_table::find_all(&pool, TENANT).await.unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn update_assigns_a_server() {
    let (_dir, pool) = setup().await;
    let table = dining_table::create(
        &pool,
        TENANT,
        DiningTableCreate {
            number: 1,
            capacity: Some(4),
        },
    )
    .await
    .unwrap();

    let updated = dining_table::update(
        &pool,
        TENANT,
        table.id,
        DiningTableUpdate {
            number: None,
            capacity: Some(6),
            server_name: Some("Ana".into()),
            is_active: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.capacity, 6);
    assert_eq!(updated.server_name.as_deref(), Some("Ana"));
    assert_eq!(updated.number, 1);
}

#[tokio::test]
async fn tenants_do_not_see_each_other() {
    let (_dir, pool) = setup().await;
    let table = dining_table::create(
        &pool,
        TENANT,
        DiningTableCreate {
            number: 1,
            capacity: None,
        },
    )
    .await
    .unwrap();

    assert!(
        dining_table::find_by_id(&pool, "tenant-b", table.id)
            .await
            .unwrap()
            .is_none()
    );
    let err = order_item::create(&pool, "tenant-b", table.id, item("Feijoada", 1, 10.0))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}
