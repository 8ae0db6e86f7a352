//! Orders and checkout service errors.

use sqlx::{Error, error::DatabaseError};
use thiserror::Error;

use crate::domain::{catalog::models::VariantUuid, orders::status::OrderStatus};

/// SQLSTATE codes that mean "lost a race, safe to retry".
const LOCK_NOT_AVAILABLE: &str = "55P03";
const SERIALIZATION_FAILURE: &str = "40001";

fn is_contention(error: &Error) -> bool {
    error
        .as_database_error()
        .and_then(DatabaseError::code)
        .is_some_and(|code| code == LOCK_NOT_AVAILABLE || code == SERIALIZATION_FAILURE)
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("variant {0} is inactive or does not exist")]
    VariantUnavailable(VariantUuid),

    #[error("insufficient stock for variant {0}")]
    InsufficientStock(VariantUuid),

    #[error("checkout lost a race; retry")]
    Conflict,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CheckoutError {
    fn from(error: Error) -> Self {
        if is_contention(&error) {
            return Self::Conflict;
        }

        Self::Sql(error)
    }
}

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order not found")]
    NotFound,

    #[error("cannot transition order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("actor may not perform this transition")]
    Forbidden,

    #[error("transition lost a race; retry")]
    Conflict,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        if is_contention(&error) {
            return Self::Conflict;
        }

        Self::Sql(error)
    }
}
