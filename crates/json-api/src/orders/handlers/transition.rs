//! Order Status Transition Handler

use std::sync::Arc;

use salvo::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::OrderStatus;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// Transition Order Request
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TransitionOrderRequest {
    /// Target status, e.g. `paid` or `cancelled`
    pub status: String,

    /// Free-form reason recorded in the status history
    pub reason: Option<String>,
}

/// Order Status Transition Handler
///
/// Moves an order to a new status. Admins may perform any legal
/// transition; the owning user may only cancel a pending order.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let order = req
        .param::<Uuid>("order")
        .ok_or_else(|| StatusError::bad_request().brief("Invalid order UUID"))?;

    let request = req
        .parse_json::<TransitionOrderRequest>()
        .await
        .or_400("Invalid transition payload")?;

    let target = request
        .status
        .parse::<OrderStatus>()
        .or_400("Unknown order status")?;

    let updated = state
        .app
        .orders
        .transition(actor, order.into(), target, request.reason)
        .await
        .map_err(into_status_error)?;

    tracing::info!(order = %updated.number, status = %target, "order transitioned");

    Ok(Json(updated.into()))
}
