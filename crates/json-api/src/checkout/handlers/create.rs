//! Checkout Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, prelude::*};

use crate::{
    checkout::errors::into_status_error, extensions::*, orders::models::OrderResponse, state::State,
};

/// Checkout Handler
///
/// Atomically converts the caller's cart into a pending order. No body;
/// the cart's contents and the catalog's current prices decide the order.
#[salvo::handler]
pub(crate) async fn handler(
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let order = state
        .app
        .checkout
        .checkout(actor.user)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}
