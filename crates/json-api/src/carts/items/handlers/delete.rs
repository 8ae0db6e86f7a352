//! Delete Cart Item Handler

use std::sync::Arc;

use salvo::prelude::*;
use uuid::Uuid;

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Delete Cart Item Handler
///
/// Removes a variant from the caller's cart. Idempotent; removing an
/// absent variant is a no-op.
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

    state
        .app
        .carts
        .remove_item(actor.user, variant.into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}
