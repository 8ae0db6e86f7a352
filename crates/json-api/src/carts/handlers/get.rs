//! Get Cart Handler

use std::sync::Arc;

use salvo::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::carts::models::CartLine;

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Cart Response
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CartResponse {
    /// The items in the cart, in insertion order
    pub items: Vec<CartLineResponse>,
}

/// Cart Line Response
///
/// Prices and availability reflect the catalog at read time; checkout
/// re-validates them independently.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CartLineResponse {
    /// The unique identifier of the cart item
    pub uuid: Uuid,

    /// The variant in this line
    pub variant_uuid: Uuid,

    /// How many units the user wants
    pub quantity: u32,

    /// The variant's current catalog price
    pub unit_price: u64,

    /// `quantity * unit_price`
    pub line_total: u64,

    /// Whether the variant is currently purchasable
    pub active: bool,

    /// Units currently in stock
    pub available: u64,

    /// The date and time the line was added
    pub created_at: String,

    /// The date and time the line was last updated
    pub updated_at: String,
}

impl From<CartLine> for CartLineResponse {
    fn from(line: CartLine) -> Self {
        Self {
            uuid: line.uuid.into_uuid(),
            variant_uuid: line.variant_uuid.into_uuid(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_total: line.line_total,
            active: line.active,
            available: line.available,
            created_at: line.created_at.to_string(),
            updated_at: line.updated_at.to_string(),
        }
    }
}

/// Get Cart Handler
///
/// Returns the caller's cart.
#[salvo::handler]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let lines = state
        .app
        .carts
        .list_cart(actor.user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(CartResponse {
        items: lines.into_iter().map(Into::into).collect(),
    }))
}
