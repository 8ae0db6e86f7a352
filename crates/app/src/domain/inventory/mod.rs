//! Inventory ledger

pub mod errors;
pub mod models;
pub(crate) mod repository;
pub mod service;

pub use errors::InventoryServiceError;
pub use service::*;
