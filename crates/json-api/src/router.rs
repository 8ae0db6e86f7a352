//! App Router

use salvo::Router;

use crate::{auth, carts, checkout, orders};

pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("cart")
                .get(carts::handlers::get::handler)
                .delete(carts::handlers::clear::handler)
                .push(
                    Router::with_path("items")
                        .post(carts::items::handlers::create::handler)
                        .push(
                            Router::with_path("{variant}")
                                .put(carts::items::handlers::update::handler)
                                .delete(carts::items::handlers::delete::handler),
                        ),
                ),
        )
        .push(Router::with_path("checkout").post(checkout::handlers::create::handler))
        .push(
            Router::with_path("orders")
                .get(orders::handlers::index::handler)
                .push(
                    Router::with_path("{order}")
                        .get(orders::handlers::get::handler)
                        .push(
                            Router::with_path("status").post(orders::handlers::transition::handler),
                        ),
                ),
        )
}
