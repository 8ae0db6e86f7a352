//! Variant Models

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Variant UUID
pub type VariantUuid = TypedUuid<Variant>;

/// Purchasable product variant, as seen by the checkout pipeline.
#[derive(Debug, Clone)]
pub struct Variant {
    pub uuid: VariantUuid,
    pub price: u64,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// New Variant Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewVariant {
    pub uuid: VariantUuid,
    pub price: u64,
    pub active: bool,
    /// Initial stock for the variant's inventory record.
    pub stock: u32,
}
