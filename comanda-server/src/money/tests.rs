use super::*;
use shared::models::{ItemStatus, MovementDirection};

fn item(quantity: i32, unit_price: f64, status: ItemStatus) -> OrderItem {
    OrderItem {
        id: 1,
        tenant_id: "t1".to_string(),
        table_id: 10,
        product_id: 100,
        name: "Prato".to_string(),
        category: None,
        quantity,
        unit_price,
        note: None,
        status,
        settled_at: None,
        created_at: 0,
        updated_at: 0,
    }
}

fn movement(direction: MovementDirection, amount: f64) -> CashMovement {
    CashMovement {
        id: 1,
        session_id: 1,
        direction,
        amount,
        reason: "venda".to_string(),
        note: None,
        method: None,
        recorded_by: "u1".to_string(),
        created_at: 0,
    }
}

#[test]
fn decimal_fixes_float_accumulation() {
    // Classic floating point problem: 0.1 + 0.2 != 0.3
    let sum_f64 = 0.1_f64 + 0.2_f64;
    assert_ne!(sum_f64, 0.3);
    assert_eq!(to_f64(to_decimal(0.1) + to_decimal(0.2)), 0.3);

    // Sum 0.01 one thousand times
    let mut total = Decimal::ZERO;
    for _ in 0..1000 {
        total += to_decimal(0.01);
    }
    assert_eq!(to_f64(total), 10.0);
}

#[test]
fn table_total_excludes_cancelled() {
    let items = vec![
        item(2, 10.0, ItemStatus::Delivered),
        item(1, 5.0, ItemStatus::Cancelled),
    ];
    assert_eq!(to_f64(table_total(&items)), 20.0);
}

#[test]
fn table_total_excludes_settled_history() {
    let mut old = item(3, 7.5, ItemStatus::Delivered);
    old.settled_at = Some(123);
    let items = vec![old, item(1, 30.0, ItemStatus::Pending)];
    assert_eq!(to_f64(table_total(&items)), 30.0);
}

#[test]
fn table_total_empty_is_zero() {
    assert_eq!(table_total(&[]), Decimal::ZERO);
}

#[test]
fn session_balance_matches_ledger() {
    let movements = vec![
        movement(MovementDirection::In, 50.0),
        movement(MovementDirection::Out, 20.0),
    ];
    assert_eq!(to_f64(session_balance(100.0, &movements)), 130.0);
    assert_eq!(to_f64(session_balance(0.0, &[])), 0.0);
}

#[test]
fn session_balance_is_order_independent() {
    let movements = vec![
        movement(MovementDirection::In, 12.30),
        movement(MovementDirection::Out, 4.05),
        movement(MovementDirection::In, 0.01),
        movement(MovementDirection::Out, 7.77),
    ];
    let expected = session_balance(55.5, &movements);

    // All rotations of the list yield the same balance
    let mut rotated = movements.clone();
    for _ in 0..movements.len() {
        rotated.rotate_left(1);
        assert_eq!(session_balance(55.5, &rotated), expected);
    }
}

#[test]
fn discrepancy_is_counted_minus_computed() {
    assert_eq!(discrepancy(130.0, 130.0), 0.0);
    assert_eq!(discrepancy(128.5, 130.0), -1.5);
    assert_eq!(discrepancy(130.0, 129.99), 0.01);
}
