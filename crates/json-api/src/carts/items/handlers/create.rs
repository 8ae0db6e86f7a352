//! Create Cart Item Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::carts::models::{CartItem, NewCartItem};

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Create Cart Item Request
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CreateCartItemRequest {
    pub variant_uuid: Uuid,
    pub quantity: u32,
}

impl From<CreateCartItemRequest> for NewCartItem {
    fn from(request: CreateCartItemRequest) -> Self {
        NewCartItem {
            variant_uuid: request.variant_uuid.into(),
            quantity: request.quantity,
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CartItemResponse {
    /// The unique identifier of the cart item
    pub uuid: Uuid,

    /// The variant in the cart item
    pub variant_uuid: Uuid,

    /// Quantity after the add; re-adding a variant adds to it
    pub quantity: u32,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            uuid: item.uuid.into_uuid(),
            variant_uuid: item.variant_uuid.into_uuid(),
            quantity: item.quantity,
        }
    }
}

/// Create Cart Item Handler
///
/// Adds a variant to the caller's cart.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartItemResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let request = req
        .parse_json::<CreateCartItemRequest>()
        .await
        .or_400("Invalid cart item payload")?;

    let variant = request.variant_uuid;

    let item = state
        .app
        .carts
        .add_item(actor.user, request.into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/cart/items/{variant}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(item.into()))
}
