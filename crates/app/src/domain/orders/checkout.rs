//! Checkout: converts a cart into an order.
//!
//! The whole attempt runs in one transaction, so the core contract holds
//! by construction: inventory is never decremented without a persisted
//! order, and no order is persisted without its inventory decrement. Any
//! failure rolls back every reservation made by the attempt and leaves
//! the cart untouched.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        carts::repository::PgCartItemsRepository,
        catalog::repository::PgVariantsRepository,
        inventory::repository::PgInventoryRepository,
        orders::{
            errors::CheckoutError,
            models::{NewOrderItem, Order, OrderItemUuid, OrderUuid},
            repository::PgOrdersRepository,
            status::OrderStatus,
        },
    },
    identity::UserUuid,
};

/// History reason recorded on the initial `none -> pending` entry.
const ORDER_CREATED_REASON: &str = "Order created";

#[derive(Debug, Clone)]
pub struct PgCheckoutService {
    db: Db,
    cart_items: PgCartItemsRepository,
    variants: PgVariantsRepository,
    inventory: PgInventoryRepository,
    orders: PgOrdersRepository,
}

impl PgCheckoutService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            cart_items: PgCartItemsRepository::new(),
            variants: PgVariantsRepository::new(),
            inventory: PgInventoryRepository::new(),
            orders: PgOrdersRepository::new(),
        }
    }
}

#[async_trait]
impl CheckoutService for PgCheckoutService {
    async fn checkout(&self, user: UserUuid) -> Result<Order, CheckoutError> {
        let mut tx = self.db.begin_bounded().await?;

        let cart = self.cart_items.items(&mut tx, user).await?;

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        // Re-validate every line against the catalog and snapshot unit
        // prices now; the cart-display lookup plays no part here.
        let mut priced = Vec::with_capacity(cart.len());

        for item in &cart {
            let variant = self
                .variants
                .find_variant(&mut tx, item.variant_uuid)
                .await?
                .filter(|v| v.active)
                .ok_or(CheckoutError::VariantUnavailable(item.variant_uuid))?;

            priced.push((item, variant.price));
        }

        // Reserve in ascending variant order so concurrent checkouts that
        // share variants acquire row locks in the same order.
        let mut reservations: Vec<_> = cart.iter().map(|i| (i.variant_uuid, i.quantity)).collect();

        reservations.sort_by_key(|&(variant, _)| variant);

        for (variant, quantity) in reservations {
            let reserved = self.inventory.reserve(&mut tx, variant, quantity).await?;

            if reserved == 0 {
                // Dropping the transaction rolls back the reservations
                // already made by this attempt.
                return Err(CheckoutError::InsufficientStock(variant));
            }
        }

        let order_uuid = OrderUuid::new();
        let total = priced
            .iter()
            .map(|&(item, price)| u64::from(item.quantity) * price)
            .sum();

        let mut order = self
            .orders
            .create_order(
                &mut tx,
                order_uuid,
                user,
                &order_number(order_uuid),
                OrderStatus::Pending,
                total,
            )
            .await?;

        for &(item, price) in &priced {
            let created = self
                .orders
                .create_order_item(
                    &mut tx,
                    order_uuid,
                    NewOrderItem {
                        uuid: OrderItemUuid::new(),
                        variant_uuid: item.variant_uuid,
                        quantity: item.quantity,
                        unit_price: price,
                    },
                )
                .await?;

            order.items.push(created);
        }

        self.orders
            .append_history(
                &mut tx,
                order_uuid,
                None,
                OrderStatus::Pending,
                Some(user),
                Some(ORDER_CREATED_REASON),
            )
            .await?;

        self.cart_items.clear(&mut tx, user).await?;

        tx.commit().await?;

        tracing::info!(order = %order.number, %user, total, "checkout completed");

        Ok(order)
    }
}

/// Human-facing order reference: date plus an uppercased uuid prefix.
fn order_number(order: OrderUuid) -> String {
    let date = Timestamp::now().strftime("%Y%m%d");
    let tail: String = order
        .into_uuid()
        .simple()
        .to_string()
        .chars()
        .take(8)
        .collect();

    format!("ORD-{date}-{}", tail.to_uppercase())
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Atomically convert the user's cart into a pending order:
    /// re-validate each line, commit inventory, snapshot prices, write the
    /// order with its initial history entry, and empty the cart.
    async fn checkout(&self, user: UserUuid) -> Result<Order, CheckoutError>;
}
