//! Catalog service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        catalog::{
            errors::CatalogServiceError,
            models::{NewVariant, Variant, VariantUuid},
            repository::PgVariantsRepository,
        },
        inventory::repository::PgInventoryRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    variants: PgVariantsRepository,
    inventory: PgInventoryRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            variants: PgVariantsRepository::new(),
            inventory: PgInventoryRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    async fn get_variant(&self, variant: VariantUuid) -> Result<Variant, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let variant = self.variants.get_variant(&mut tx, variant).await?;

        tx.commit().await?;

        Ok(variant)
    }

    async fn create_variant(&self, variant: NewVariant) -> Result<Variant, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self
            .variants
            .create_variant(&mut tx, variant.uuid, variant.price, variant.active)
            .await?;

        self.inventory
            .create_record(&mut tx, variant.uuid, variant.stock)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_price(
        &self,
        variant: VariantUuid,
        price: u64,
    ) -> Result<Variant, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self.variants.update_price(&mut tx, variant, price).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn set_variant_active(
        &self,
        variant: VariantUuid,
        active: bool,
    ) -> Result<(), CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.variants.set_active(&mut tx, variant, active).await?;

        if rows_affected == 0 {
            return Err(CatalogServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Retrieve a single variant's price and availability flag.
    async fn get_variant(&self, variant: VariantUuid) -> Result<Variant, CatalogServiceError>;

    /// Creates a variant along with its inventory record.
    async fn create_variant(&self, variant: NewVariant) -> Result<Variant, CatalogServiceError>;

    /// Sets a variant's price.
    async fn update_price(
        &self,
        variant: VariantUuid,
        price: u64,
    ) -> Result<Variant, CatalogServiceError>;

    /// Marks a variant as purchasable or not.
    async fn set_variant_active(
        &self,
        variant: VariantUuid,
        active: bool,
    ) -> Result<(), CatalogServiceError>;
}
