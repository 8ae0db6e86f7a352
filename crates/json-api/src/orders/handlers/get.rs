//! Get Order Handler

use std::sync::Arc;

use salvo::prelude::*;
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderDetailsResponse},
    state::State,
};

/// Get Order Handler
///
/// Returns one of the caller's orders with its items and status history.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<OrderDetailsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let order = req
        .param::<Uuid>("order")
        .ok_or_else(|| StatusError::bad_request().brief("Invalid order UUID"))?;

    let details = state
        .app
        .orders
        .get_order(actor.user, order.into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(details.into()))
}
