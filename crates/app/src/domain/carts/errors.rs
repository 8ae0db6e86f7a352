//! Carts service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("quantity must be a positive integer")]
    InvalidQuantity,

    #[error("variant is inactive or does not exist")]
    VariantUnavailable,

    #[error("item not in cart")]
    ItemNotFound,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::ItemNotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            // cart_items.variant_uuid references the catalog
            Some(ErrorKind::ForeignKeyViolation) => Self::VariantUnavailable,
            // quantity > 0 is enforced by the schema as well
            Some(ErrorKind::CheckViolation) => Self::InvalidQuantity,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
