//! Order response models, shared by the orders and checkout handlers.

use std::string::ToString;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::{
    domain::orders::models::{Order, OrderDetails, OrderItem, StatusChange},
    identity::UserUuid,
};

/// Order Response
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct OrderResponse {
    /// The unique identifier of the order
    pub uuid: Uuid,

    /// Human-facing order reference
    pub number: String,

    /// Current lifecycle status
    pub status: String,

    /// Display label for the status
    pub status_label: String,

    /// Badge color for the status on read-only surfaces
    pub status_color: String,

    /// Sum of the item subtotals
    pub total: u64,

    /// The order's lines, priced at checkout time
    pub items: Vec<OrderItemResponse>,

    /// The date and time the order was created
    pub created_at: String,

    /// The date and time the order was last updated
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let display = order.status.display();

        Self {
            uuid: order.uuid.into_uuid(),
            number: order.number,
            status: order.status.to_string(),
            status_label: display.label.to_string(),
            status_color: display.color.to_string(),
            total: order.total,
            items: order.items.into_iter().map(Into::into).collect(),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Order Item Response
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct OrderItemResponse {
    /// The unique identifier of the order item
    pub uuid: Uuid,

    /// The variant this line refers to
    pub variant_uuid: Uuid,

    /// Units ordered
    pub quantity: u32,

    /// Unit price snapshotted at checkout time
    pub unit_price: u64,

    /// `quantity * unit_price`
    pub subtotal: u64,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            uuid: item.uuid.into_uuid(),
            variant_uuid: item.variant_uuid.into_uuid(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            subtotal: item.subtotal,
        }
    }
}

/// Status Change Response
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct StatusChangeResponse {
    /// Status before the transition; absent on the creation entry
    pub from_status: Option<String>,

    /// Status after the transition
    pub to_status: String,

    /// Who triggered the transition, when known
    pub actor_uuid: Option<Uuid>,

    /// Free-form reason attached to the transition
    pub reason: Option<String>,

    /// The date and time of the transition
    pub created_at: String,
}

impl From<StatusChange> for StatusChangeResponse {
    fn from(change: StatusChange) -> Self {
        Self {
            from_status: change.from_status.as_ref().map(ToString::to_string),
            to_status: change.to_status.to_string(),
            actor_uuid: change.actor_uuid.map(UserUuid::into_uuid),
            reason: change.reason,
            created_at: change.created_at.to_string(),
        }
    }
}

/// Order Details Response
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct OrderDetailsResponse {
    /// The order and its items
    pub order: OrderResponse,

    /// Status ledger, oldest entry first
    pub history: Vec<StatusChangeResponse>,
}

impl From<OrderDetails> for OrderDetailsResponse {
    fn from(details: OrderDetails) -> Self {
        Self {
            order: details.order.into(),
            history: details.history.into_iter().map(Into::into).collect(),
        }
    }
}
