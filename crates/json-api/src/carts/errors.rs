//! Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::InvalidQuantity => {
            StatusError::bad_request().brief("Quantity must be a positive integer")
        }
        CartsServiceError::VariantUnavailable => {
            StatusError::bad_request().brief("Variant is inactive or does not exist")
        }
        CartsServiceError::ItemNotFound => StatusError::not_found().brief("Item not in cart"),
        CartsServiceError::Sql(source) => {
            error!("cart operation failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
