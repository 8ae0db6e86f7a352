//! Clear Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Clear Cart Handler
///
/// Removes every item from the caller's cart.
#[salvo::handler]
pub(crate) async fn handler(depot: &mut Depot) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    state
        .app
        .carts
        .clear(actor.user)
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}
