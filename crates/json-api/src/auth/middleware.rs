//! Identity middleware.
//!
//! Token verification happens in the upstream auth layer; by the time a
//! request reaches this service, the gateway has attached the verified
//! identity as headers. Requests without a usable identity are rejected.

use salvo::prelude::*;
use uuid::Uuid;

use storefront_app::identity::{Actor, Role, UserUuid};

use crate::extensions::*;

pub(crate) const USER_HEADER: &str = "x-user-uuid";
pub(crate) const ROLE_HEADER: &str = "x-user-role";

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(actor) = extract_actor(req) else {
        res.render(StatusError::unauthorized().brief("Missing or invalid identity headers"));

        return;
    };

    depot.insert_actor(actor);

    ctrl.call_next(req, depot, res).await;
}

fn extract_actor(req: &Request) -> Option<Actor> {
    let user = req
        .headers()
        .get(USER_HEADER)?
        .to_str()
        .ok()?
        .parse::<Uuid>()
        .ok()?;

    // Absent role header means a plain customer; an unparseable one is rejected.
    let role = match req.headers().get(ROLE_HEADER) {
        Some(value) => value.to_str().ok()?.parse::<Role>().ok()?,
        None => Role::Customer,
    };

    Some(Actor {
        user: UserUuid::from_uuid(user),
        role,
    })
}
