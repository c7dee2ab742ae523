//! Entity Models
//!
//! One module per entity. Each module carries the entity struct, its status
//! enum (with the transition rules that belong to it) and the API payloads.

pub mod dining_table;
pub mod order_item;
pub mod register;

pub use dining_table::{DiningTable, DiningTableCreate, DiningTableUpdate, TableStatus};
pub use order_item::{ItemStatus, OrderItem, OrderItemAdvance, OrderItemCreate};
pub use register::{
    CashMovement, CashMovementCreate, MovementDirection, RegisterClose, RegisterOpen,
    RegisterSession, SessionStatus,
};
