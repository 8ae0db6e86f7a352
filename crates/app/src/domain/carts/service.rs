//! Carts service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        carts::{
            errors::CartsServiceError,
            models::{CartItem, CartLine, NewCartItem},
            repository::PgCartItemsRepository,
        },
        catalog::{models::VariantUuid, repository::PgVariantsRepository},
    },
    identity::UserUuid,
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    items: PgCartItemsRepository,
    variants: PgVariantsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            items: PgCartItemsRepository::new(),
            variants: PgVariantsRepository::new(),
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn list_cart(&self, user: UserUuid) -> Result<Vec<CartLine>, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let lines = self.items.list_lines(&mut tx, user).await?;

        tx.commit().await?;

        Ok(lines)
    }

    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartItem, CartsServiceError> {
        if item.quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin().await?;

        let variant = self
            .variants
            .find_variant(&mut tx, item.variant_uuid)
            .await?;

        if !variant.is_some_and(|v| v.active) {
            return Err(CartsServiceError::VariantUnavailable);
        }

        let item = self
            .items
            .upsert_item(&mut tx, user, item.variant_uuid, item.quantity)
            .await?;

        tx.commit().await?;

        Ok(item)
    }

    async fn update_item(
        &self,
        user: UserUuid,
        variant: VariantUuid,
        quantity: u32,
    ) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = if quantity == 0 {
            self.items.delete_item(&mut tx, user, variant).await?
        } else {
            self.items
                .set_quantity(&mut tx, user, variant, quantity)
                .await?
        };

        if rows_affected == 0 {
            return Err(CartsServiceError::ItemNotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn remove_item(
        &self,
        user: UserUuid,
        variant: VariantUuid,
    ) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.items.delete_item(&mut tx, user, variant).await?;

        tx.commit().await?;

        Ok(())
    }

    async fn clear(&self, user: UserUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.items.clear(&mut tx, user).await?;

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// The user's cart in insertion order, enriched with live catalog data
    /// for display. Checkout does not rely on this lookup.
    async fn list_cart(&self, user: UserUuid) -> Result<Vec<CartLine>, CartsServiceError>;

    /// Add a variant to the cart. Re-adding a variant already in the cart
    /// adds to its quantity.
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartItem, CartsServiceError>;

    /// Set an item's quantity exactly; zero removes the item.
    async fn update_item(
        &self,
        user: UserUuid,
        variant: VariantUuid,
        quantity: u32,
    ) -> Result<(), CartsServiceError>;

    /// Remove an item. A no-op when the variant is not in the cart.
    async fn remove_item(
        &self,
        user: UserUuid,
        variant: VariantUuid,
    ) -> Result<(), CartsServiceError>;

    /// Remove every item from the user's cart.
    async fn clear(&self, user: UserUuid) -> Result<(), CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{domain::catalog::CatalogService, test::TestContext};

    use super::*;

    #[tokio::test]
    async fn add_item_returns_created_row() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let variant = ctx.create_variant(10_00, 5).await;

        let item = ctx
            .carts
            .add_item(
                user,
                NewCartItem {
                    variant_uuid: variant,
                    quantity: 2,
                },
            )
            .await?;

        assert_eq!(item.variant_uuid, variant);
        assert_eq!(item.quantity, 2);

        Ok(())
    }

    #[tokio::test]
    async fn re_adding_variant_increments_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let variant = ctx.create_variant(10_00, 5).await;

        let new = NewCartItem {
            variant_uuid: variant,
            quantity: 2,
        };

        let first = ctx.carts.add_item(user, new.clone()).await?;
        let second = ctx.carts.add_item(user, new).await?;

        assert_eq!(first.uuid, second.uuid, "no duplicate row is created");
        assert_eq!(second.quantity, 4);

        Ok(())
    }

    #[tokio::test]
    async fn add_item_zero_quantity_returns_invalid_quantity() {
        let ctx = TestContext::new().await;
        let variant = ctx.create_variant(10_00, 5).await;

        let result = ctx
            .carts
            .add_item(
                UserUuid::new(),
                NewCartItem {
                    variant_uuid: variant,
                    quantity: 0,
                },
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );
    }

    #[tokio::test]
    async fn add_item_unknown_variant_returns_unavailable() {
        let ctx = TestContext::new().await;

        let result = ctx
            .carts
            .add_item(
                UserUuid::new(),
                NewCartItem {
                    variant_uuid: VariantUuid::new(),
                    quantity: 1,
                },
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::VariantUnavailable)),
            "expected VariantUnavailable, got {result:?}"
        );
    }

    #[tokio::test]
    async fn add_item_inactive_variant_returns_unavailable() -> TestResult {
        let ctx = TestContext::new().await;
        let variant = ctx.create_variant(10_00, 5).await;

        ctx.catalog.set_variant_active(variant, false).await?;

        let result = ctx
            .carts
            .add_item(
                UserUuid::new(),
                NewCartItem {
                    variant_uuid: variant,
                    quantity: 1,
                },
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::VariantUnavailable)),
            "expected VariantUnavailable, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_item_sets_quantity_exactly() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let variant = ctx.create_variant(10_00, 5).await;

        ctx.carts
            .add_item(
                user,
                NewCartItem {
                    variant_uuid: variant,
                    quantity: 2,
                },
            )
            .await?;

        ctx.carts.update_item(user, variant, 7).await?;

        let lines = ctx.carts.list_cart(user).await?;

        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().map(|l| l.quantity), Some(7));

        Ok(())
    }

    #[tokio::test]
    async fn update_item_zero_quantity_removes_item() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let variant = ctx.create_variant(10_00, 5).await;

        ctx.carts
            .add_item(
                user,
                NewCartItem {
                    variant_uuid: variant,
                    quantity: 2,
                },
            )
            .await?;

        ctx.carts.update_item(user, variant, 0).await?;

        assert!(ctx.carts.list_cart(user).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn update_item_absent_variant_returns_item_not_found() {
        let ctx = TestContext::new().await;
        let variant = ctx.create_variant(10_00, 5).await;

        let result = ctx.carts.update_item(UserUuid::new(), variant, 3).await;

        assert!(
            matches!(result, Err(CartsServiceError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn remove_item_absent_variant_is_a_no_op() -> TestResult {
        let ctx = TestContext::new().await;
        let variant = ctx.create_variant(10_00, 5).await;

        ctx.carts.remove_item(UserUuid::new(), variant).await?;

        Ok(())
    }

    #[tokio::test]
    async fn clear_empties_the_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        for _ in 0..2 {
            let variant = ctx.create_variant(10_00, 5).await;

            ctx.carts
                .add_item(
                    user,
                    NewCartItem {
                        variant_uuid: variant,
                        quantity: 1,
                    },
                )
                .await?;
        }

        ctx.carts.clear(user).await?;

        assert!(ctx.carts.list_cart(user).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn list_cart_keeps_insertion_order_and_live_prices() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let first = ctx.create_variant(10_00, 5).await;
        let second = ctx.create_variant(20_00, 1).await;

        for variant in [first, second] {
            ctx.carts
                .add_item(
                    user,
                    NewCartItem {
                        variant_uuid: variant,
                        quantity: 2,
                    },
                )
                .await?;
        }

        // Display follows the catalog's current price, not the add-time one.
        ctx.catalog.update_price(first, 12_00).await?;

        let lines = ctx.carts.list_cart(user).await?;
        let variants: Vec<_> = lines.iter().map(|l| l.variant_uuid).collect();

        assert_eq!(variants, vec![first, second]);
        assert_eq!(lines.first().map(|l| l.unit_price), Some(12_00));
        assert_eq!(lines.first().map(|l| l.line_total), Some(24_00));
        assert_eq!(lines.get(1).map(|l| l.available), Some(1));

        Ok(())
    }
}
