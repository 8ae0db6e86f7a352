//! Orders service: reads and the status state machine.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        inventory::repository::PgInventoryRepository,
        orders::{
            errors::OrdersServiceError,
            models::{Order, OrderDetails, OrderUuid},
            repository::PgOrdersRepository,
            status::OrderStatus,
        },
    },
    identity::{Actor, UserUuid},
};

/// History reason recorded when the owning user cancels without giving one.
const CANCELLED_BY_USER_REASON: &str = "Order cancelled by user";

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders: PgOrdersRepository,
    inventory: PgInventoryRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            inventory: PgInventoryRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut orders = self.orders.list_orders(&mut tx, user).await?;

        for order in &mut orders {
            order.items = self.orders.get_order_items(&mut tx, order.uuid).await?;
        }

        tx.commit().await?;

        Ok(orders)
    }

    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderDetails, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut found = self.orders.get_order(&mut tx, user, order).await?;

        found.items = self.orders.get_order_items(&mut tx, order).await?;

        let history = self.orders.get_history(&mut tx, order).await?;

        tx.commit().await?;

        Ok(OrderDetails {
            order: found,
            history,
        })
    }

    async fn transition(
        &self,
        actor: Actor,
        order: OrderUuid,
        target: OrderStatus,
        reason: Option<String>,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_bounded().await?;

        // The row lock serialises concurrent transitions; a loser re-reads
        // the winner's status here and fails the checks below.
        let current = self.orders.get_order_for_update(&mut tx, order).await?;

        let owner_cancel = target == OrderStatus::Cancelled
            && current.status == OrderStatus::Pending
            && current.user_uuid == actor.user;

        if !actor.is_admin() && !owner_cancel {
            return Err(OrdersServiceError::Forbidden);
        }

        if !current.status.can_transition_to(target) {
            return Err(OrdersServiceError::InvalidTransition {
                from: current.status,
                to: target,
            });
        }

        let items = self.orders.get_order_items(&mut tx, order).await?;
        let mut updated = self.orders.update_status(&mut tx, order, target).await?;

        let reason = reason.or_else(|| owner_cancel.then(|| CANCELLED_BY_USER_REASON.to_string()));

        self.orders
            .append_history(
                &mut tx,
                order,
                Some(current.status),
                target,
                Some(actor.user),
                reason.as_deref(),
            )
            .await?;

        // Cancellation and refund hand the checkout's committed stock back.
        // The transition graph only lets an order get here once.
        if target.releases_inventory() {
            for item in &items {
                self.inventory
                    .release(&mut tx, item.variant_uuid, item.quantity)
                    .await?;
            }
        }

        tx.commit().await?;

        updated.items = items;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// The user's orders, newest first, with their items.
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError>;

    /// One order with its items and full status history.
    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderDetails, OrdersServiceError>;

    /// Move an order to `target`, appending a history entry and releasing
    /// inventory when the order leaves the pipeline. Admins may perform any
    /// legal transition; the owning user may only cancel a pending order.
    async fn transition(
        &self,
        actor: Actor,
        order: OrderUuid,
        target: OrderStatus,
        reason: Option<String>,
    ) -> Result<Order, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{inventory::InventoryService, orders::checkout::CheckoutService},
        test::TestContext,
    };

    use super::*;

    #[tokio::test]
    async fn list_orders_is_scoped_to_the_user() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let other = UserUuid::new();
        let variant = ctx.create_variant(10_00, 5).await;

        ctx.fill_cart(user, &[(variant, 1)]).await;
        ctx.checkout.checkout(user).await?;

        assert_eq!(ctx.orders.list_orders(user).await?.len(), 1);
        assert!(ctx.orders.list_orders(other).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn get_order_returns_items_and_history() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let variant = ctx.create_variant(10_00, 5).await;

        ctx.fill_cart(user, &[(variant, 2)]).await;

        let order = ctx.checkout.checkout(user).await?;
        let details = ctx.orders.get_order(user, order.uuid).await?;

        assert_eq!(details.order.uuid, order.uuid);
        assert_eq!(details.order.items.len(), 1);
        assert_eq!(details.history.len(), 1);

        let initial = details.history.first().expect("history has one entry");

        assert_eq!(initial.from_status, None);
        assert_eq!(initial.to_status, OrderStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn get_order_other_user_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let variant = ctx.create_variant(10_00, 5).await;

        ctx.fill_cart(user, &[(variant, 1)]).await;

        let order = ctx.checkout.checkout(user).await?;
        let result = ctx.orders.get_order(UserUuid::new(), order.uuid).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn refund_appends_history_and_releases_stock() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let admin = Actor::admin(UserUuid::new());
        let variant = ctx.create_variant(10_00, 5).await;

        ctx.fill_cart(user, &[(variant, 2)]).await;

        let order = ctx.checkout.checkout(user).await?;

        assert_eq!(ctx.inventory.available(variant).await?, 3);

        ctx.orders
            .transition(admin, order.uuid, OrderStatus::Paid, None)
            .await?;
        ctx.orders
            .transition(admin, order.uuid, OrderStatus::Refunded, None)
            .await?;

        assert_eq!(ctx.inventory.available(variant).await?, 5);

        let details = ctx.orders.get_order(user, order.uuid).await?;
        let last = details.history.last().expect("history has entries");

        assert_eq!(details.order.status, OrderStatus::Refunded);
        assert_eq!(last.from_status, Some(OrderStatus::Paid));
        assert_eq!(last.to_status, OrderStatus::Refunded);

        Ok(())
    }

    #[tokio::test]
    async fn transition_out_of_terminal_state_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let admin = Actor::admin(UserUuid::new());
        let variant = ctx.create_variant(10_00, 5).await;

        ctx.fill_cart(user, &[(variant, 1)]).await;

        let order = ctx.checkout.checkout(user).await?;

        for target in [
            OrderStatus::Paid,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ] {
            ctx.orders
                .transition(admin, order.uuid, target, None)
                .await?;
        }

        let result = ctx
            .orders
            .transition(admin, order.uuid, OrderStatus::Paid, None)
            .await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::InvalidTransition {
                    from: OrderStatus::Delivered,
                    to: OrderStatus::Paid,
                })
            ),
            "expected InvalidTransition, got {result:?}"
        );

        let details = ctx.orders.get_order(user, order.uuid).await?;

        assert_eq!(details.order.status, OrderStatus::Delivered);

        Ok(())
    }

    #[tokio::test]
    async fn history_forms_a_walk_over_the_transition_graph() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let admin = Actor::admin(UserUuid::new());
        let variant = ctx.create_variant(10_00, 5).await;

        ctx.fill_cart(user, &[(variant, 1)]).await;

        let order = ctx.checkout.checkout(user).await?;

        for target in [
            OrderStatus::Paid,
            OrderStatus::Shipped,
            OrderStatus::Refunded,
        ] {
            ctx.orders
                .transition(admin, order.uuid, target, None)
                .await?;
        }

        let details = ctx.orders.get_order(user, order.uuid).await?;
        let history = details.history;

        assert_eq!(
            history.first().map(|h| (h.from_status, h.to_status)),
            Some((None, OrderStatus::Pending))
        );

        for window in history.windows(2) {
            let [previous, next] = window else {
                unreachable!("windows(2) yields pairs");
            };

            assert_eq!(next.from_status, Some(previous.to_status));
            assert!(
                previous.to_status.can_transition_to(next.to_status),
                "{} -> {} violates the transition table",
                previous.to_status,
                next.to_status
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn owner_may_cancel_a_pending_order() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let variant = ctx.create_variant(10_00, 5).await;

        ctx.fill_cart(user, &[(variant, 2)]).await;

        let order = ctx.checkout.checkout(user).await?;

        let updated = ctx
            .orders
            .transition(
                Actor::customer(user),
                order.uuid,
                OrderStatus::Cancelled,
                None,
            )
            .await?;

        assert_eq!(updated.status, OrderStatus::Cancelled);
        assert_eq!(ctx.inventory.available(variant).await?, 5);

        let details = ctx.orders.get_order(user, order.uuid).await?;
        let last = details.history.last().expect("history has entries");

        assert_eq!(last.reason.as_deref(), Some("Order cancelled by user"));

        Ok(())
    }

    #[tokio::test]
    async fn owner_may_not_cancel_a_paid_order() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let admin = Actor::admin(UserUuid::new());
        let variant = ctx.create_variant(10_00, 5).await;

        ctx.fill_cart(user, &[(variant, 1)]).await;

        let order = ctx.checkout.checkout(user).await?;

        ctx.orders
            .transition(admin, order.uuid, OrderStatus::Paid, None)
            .await?;

        let result = ctx
            .orders
            .transition(
                Actor::customer(user),
                order.uuid,
                OrderStatus::Cancelled,
                None,
            )
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::Forbidden)),
            "expected Forbidden, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn owner_may_not_mark_their_order_paid() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let variant = ctx.create_variant(10_00, 5).await;

        ctx.fill_cart(user, &[(variant, 1)]).await;

        let order = ctx.checkout.checkout(user).await?;

        let result = ctx
            .orders
            .transition(Actor::customer(user), order.uuid, OrderStatus::Paid, None)
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::Forbidden)),
            "expected Forbidden, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn transition_unknown_order_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .orders
            .transition(
                Actor::admin(UserUuid::new()),
                OrderUuid::new(),
                OrderStatus::Paid,
                None,
            )
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn conflicting_concurrent_transitions_cannot_both_win() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let admin = Actor::admin(UserUuid::new());
        let variant = ctx.create_variant(10_00, 5).await;

        ctx.fill_cart(user, &[(variant, 1)]).await;

        let order = ctx.checkout.checkout(user).await?;

        ctx.orders
            .transition(admin, order.uuid, OrderStatus::Paid, None)
            .await?;

        let ship = {
            let orders = ctx.orders.clone();

            tokio::spawn(async move {
                orders
                    .transition(admin, order.uuid, OrderStatus::Shipped, None)
                    .await
            })
        };

        let cancel = {
            let orders = ctx.orders.clone();

            tokio::spawn(async move {
                orders
                    .transition(admin, order.uuid, OrderStatus::Cancelled, None)
                    .await
            })
        };

        let outcomes = [ship.await?, cancel.await?];
        let winners = outcomes.iter().filter(|o| o.is_ok()).count();

        assert_eq!(winners, 1, "exactly one transition may win: {outcomes:?}");

        Ok(())
    }
}
