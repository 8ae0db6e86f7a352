//! Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::orders::CheckoutError;

pub(crate) fn into_status_error(error: CheckoutError) -> StatusError {
    match error {
        CheckoutError::EmptyCart => StatusError::bad_request().brief("Cart is empty"),
        CheckoutError::VariantUnavailable(variant) => StatusError::bad_request()
            .brief(format!("Variant {variant} is inactive or does not exist")),
        CheckoutError::InsufficientStock(variant) => {
            StatusError::conflict().brief(format!("Insufficient stock for variant {variant}"))
        }
        CheckoutError::Conflict => StatusError::conflict().brief("Checkout lost a race; retry"),
        CheckoutError::Sql(source) => {
            error!("checkout failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
