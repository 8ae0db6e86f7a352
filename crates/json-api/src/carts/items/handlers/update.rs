//! Update Cart Item Handler

use std::sync::Arc;

use salvo::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Update Cart Item Request
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct UpdateCartItemRequest {
    /// The exact quantity to set; zero removes the item
    pub quantity: u32,
}

/// Update Cart Item Handler
///
/// Sets a cart line's quantity exactly.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let variant = req
        .param::<Uuid>("variant")
        .ok_or_else(|| StatusError::bad_request().brief("Invalid variant UUID"))?;

    let request = req
        .parse_json::<UpdateCartItemRequest>()
        .await
        .or_400("Invalid cart item payload")?;

    state
        .app
        .carts
        .update_item(actor.user, variant.into(), request.quantity)
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}
