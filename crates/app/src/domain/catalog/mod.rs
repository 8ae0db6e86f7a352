//! Catalog collaborator
//!
//! The product catalog proper lives outside this crate; checkout and cart
//! validation only need variant identity, price, and the active flag.

pub mod errors;
pub mod models;
pub(crate) mod repository;
pub mod service;

pub use errors::CatalogServiceError;
pub use service::*;
