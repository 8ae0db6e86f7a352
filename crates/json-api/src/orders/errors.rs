//! Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::InvalidTransition { from, to } => {
            StatusError::conflict().brief(format!("Cannot transition order from {from} to {to}"))
        }
        OrdersServiceError::Forbidden => {
            StatusError::forbidden().brief("Actor may not perform this transition")
        }
        OrdersServiceError::Conflict => {
            StatusError::conflict().brief("Transition lost a race; retry")
        }
        OrdersServiceError::Sql(source) => {
            error!("order operation failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
