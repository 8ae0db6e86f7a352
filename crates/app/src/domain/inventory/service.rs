//! Inventory ledger service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        catalog::models::VariantUuid,
        inventory::{errors::InventoryServiceError, repository::PgInventoryRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgInventoryService {
    db: Db,
    repository: PgInventoryRepository,
}

impl PgInventoryService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgInventoryRepository::new(),
        }
    }
}

#[async_trait]
impl InventoryService for PgInventoryService {
    async fn reserve_and_commit(
        &self,
        variant: VariantUuid,
        quantity: u32,
    ) -> Result<(), InventoryServiceError> {
        let mut tx = self.db.begin_bounded().await?;

        let reserved = self.repository.reserve(&mut tx, variant, quantity).await?;

        if reserved == 0 {
            // Nothing was written; distinguish a missing record from a short one.
            return match self.repository.available(&mut tx, variant).await? {
                None => Err(InventoryServiceError::NotFound),
                Some(_) => Err(InventoryServiceError::InsufficientStock(variant)),
            };
        }

        tx.commit().await?;

        Ok(())
    }

    async fn release(
        &self,
        variant: VariantUuid,
        quantity: u32,
    ) -> Result<(), InventoryServiceError> {
        let mut tx = self.db.begin_bounded().await?;

        self.repository.release(&mut tx, variant, quantity).await?;

        tx.commit().await?;

        Ok(())
    }

    async fn available(&self, variant: VariantUuid) -> Result<u64, InventoryServiceError> {
        let mut tx = self.db.begin().await?;

        let stock = self.repository.get_stock(&mut tx, variant).await?;

        tx.commit().await?;

        stock
            .map(|s| s.available)
            .ok_or(InventoryServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
pub trait InventoryService: Send + Sync {
    /// Atomically check that `quantity` units are available and commit the
    /// decrement. Concurrent callers on the same variant are serialised by
    /// the ledger; at most `available` units can ever be reserved.
    async fn reserve_and_commit(
        &self,
        variant: VariantUuid,
        quantity: u32,
    ) -> Result<(), InventoryServiceError>;

    /// Return previously committed units to the ledger. The caller is
    /// responsible for invoking this at most once per reservation.
    async fn release(&self, variant: VariantUuid, quantity: u32)
    -> Result<(), InventoryServiceError>;

    /// Current available quantity for a variant.
    async fn available(&self, variant: VariantUuid) -> Result<u64, InventoryServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn reserve_decrements_available() -> TestResult {
        let ctx = TestContext::new().await;
        let variant = ctx.create_variant(10_00, 5).await;

        ctx.inventory.reserve_and_commit(variant, 2).await?;

        assert_eq!(ctx.inventory.available(variant).await?, 3);

        Ok(())
    }

    #[tokio::test]
    async fn reserve_more_than_available_fails_and_changes_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let variant = ctx.create_variant(10_00, 2).await;

        let result = ctx.inventory.reserve_and_commit(variant, 3).await;

        assert!(
            matches!(result, Err(InventoryServiceError::InsufficientStock(v)) if v == variant),
            "expected InsufficientStock, got {result:?}"
        );
        assert_eq!(ctx.inventory.available(variant).await?, 2);

        Ok(())
    }

    #[tokio::test]
    async fn reserve_unknown_variant_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .inventory
            .reserve_and_commit(VariantUuid::new(), 1)
            .await;

        assert!(
            matches!(result, Err(InventoryServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn release_restores_reserved_stock() -> TestResult {
        let ctx = TestContext::new().await;
        let variant = ctx.create_variant(10_00, 5).await;

        ctx.inventory.reserve_and_commit(variant, 5).await?;
        ctx.inventory.release(variant, 5).await?;

        assert_eq!(ctx.inventory.available(variant).await?, 5);

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_reserves_never_overcommit() -> TestResult {
        let ctx = TestContext::new().await;
        let variant = ctx.create_variant(10_00, 5).await;

        let mut tasks = Vec::new();

        for _ in 0..12 {
            let inventory = ctx.inventory.clone();

            tasks.push(tokio::spawn(async move {
                inventory.reserve_and_commit(variant, 1).await
            }));
        }

        let mut successes = 0;

        for task in tasks {
            if task.await?.is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 5, "exactly the initial stock may be reserved");
        assert_eq!(ctx.inventory.available(variant).await?, 0);

        Ok(())
    }
}
