//! Order Models

use jiff::Timestamp;

use crate::{
    domain::{catalog::models::VariantUuid, orders::status::OrderStatus},
    identity::UserUuid,
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Immutable record of a checked-out cart.
#[derive(Debug, Clone)]
pub struct Order {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    /// Human-facing unique reference, e.g. `ORD-20260801-1A2B3C4D`.
    pub number: String,
    pub status: OrderStatus,
    /// Always equals the sum of the item subtotals.
    pub total: u64,
    pub items: Vec<OrderItem>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItem>;

/// Order line with the unit price snapshotted at checkout time. Later
/// catalog price changes do not affect it.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub uuid: OrderItemUuid,
    pub variant_uuid: VariantUuid,
    pub quantity: u32,
    pub unit_price: u64,
    pub subtotal: u64,
    pub created_at: Timestamp,
}

/// New Order Item Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub uuid: OrderItemUuid,
    pub variant_uuid: VariantUuid,
    pub quantity: u32,
    pub unit_price: u64,
}

/// Status Change UUID
pub type StatusChangeUuid = TypedUuid<StatusChange>;

/// One entry in an order's append-only status ledger.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub uuid: StatusChangeUuid,
    /// `None` for the entry written at order creation.
    pub from_status: Option<OrderStatus>,
    pub to_status: OrderStatus,
    pub actor_uuid: Option<UserUuid>,
    pub reason: Option<String>,
    pub created_at: Timestamp,
}

/// An order together with its status ledger.
#[derive(Debug, Clone)]
pub struct OrderDetails {
    pub order: Order,
    /// Oldest first; the first entry is always `None -> pending`.
    pub history: Vec<StatusChange>,
}
