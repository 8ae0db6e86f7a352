//! Cart Models

use jiff::Timestamp;

use crate::{domain::catalog::models::VariantUuid, uuids::TypedUuid};

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItem>;

/// One cart row: a variant and how many of it the user wants.
///
/// Carts themselves are implicit; a user's cart is the set of their items.
#[derive(Debug, Clone)]
pub struct CartItem {
    pub uuid: CartItemUuid,
    pub variant_uuid: VariantUuid,
    pub quantity: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Cart Item Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub variant_uuid: VariantUuid,
    pub quantity: u32,
}

/// Cart item enriched with a live catalog/inventory lookup for display.
///
/// The price and availability here are advisory; checkout re-validates
/// against the catalog independently.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub uuid: CartItemUuid,
    pub variant_uuid: VariantUuid,
    pub quantity: u32,
    pub unit_price: u64,
    pub line_total: u64,
    pub active: bool,
    pub available: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
