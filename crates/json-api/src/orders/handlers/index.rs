//! Order Index Handler

use std::sync::Arc;

use salvo::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// Orders Response
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct OrdersResponse {
    /// The caller's orders, newest first
    pub orders: Vec<OrderResponse>,
}

/// Order Index Handler
///
/// Returns the caller's orders.
#[salvo::handler]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let orders = state
        .app
        .orders
        .list_orders(actor.user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(OrdersResponse {
        orders: orders.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::orders::{MockOrdersService, OrderStatus, models::OrderUuid};

    use crate::test_helpers::{TEST_USER_UUID, WithIdentity as _, make_order, orders_service};

    use super::*;

    fn make_service(repo: MockOrdersService) -> Service {
        orders_service(repo, Router::with_path("orders").get(handler))
    }

    #[tokio::test]
    async fn test_index_returns_empty_list() -> TestResult {
        let mut repo = MockOrdersService::new();

        repo.expect_list_orders()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(|_| Ok(vec![]));

        let response: OrdersResponse = TestClient::get("http://example.com/orders")
            .as_customer()
            .send(&make_service(repo))
            .await
            .take_json()
            .await?;

        assert!(response.orders.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_index_returns_orders() -> TestResult {
        let first = OrderUuid::new();
        let second = OrderUuid::new();

        let mut repo = MockOrdersService::new();

        repo.expect_list_orders().once().return_once(move |_| {
            Ok(vec![
                make_order(first, OrderStatus::Pending),
                make_order(second, OrderStatus::Paid),
            ])
        });

        let response: OrdersResponse = TestClient::get("http://example.com/orders")
            .as_customer()
            .send(&make_service(repo))
            .await
            .take_json()
            .await?;

        assert_eq!(response.orders.len(), 2, "expected two orders");
        assert_eq!(
            response.orders.first().map(|o| o.uuid),
            Some(first.into_uuid())
        );
        assert_eq!(
            response.orders.first().map(|o| o.status.as_str()),
            Some("pending")
        );
        assert_eq!(
            response.orders.get(1).map(|o| o.status_label.as_str()),
            Some("Paid")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_index_without_identity_returns_401() -> TestResult {
        let repo = MockOrdersService::new();

        let res = TestClient::get("http://example.com/orders")
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
