//! Inventory Models

use jiff::Timestamp;

use crate::domain::catalog::models::VariantUuid;

/// Available stock for one variant.
#[derive(Debug, Clone)]
pub struct StockLevel {
    pub variant_uuid: VariantUuid,
    pub available: u64,
    pub updated_at: Timestamp,
}
