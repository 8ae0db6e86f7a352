//! Inventory Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    database::try_get_amount,
    domain::{catalog::models::VariantUuid, inventory::models::StockLevel},
};

const INSERT_INVENTORY_SQL: &str = include_str!("sql/insert_inventory.sql");
const RESERVE_STOCK_SQL: &str = include_str!("sql/reserve_stock.sql");
const RELEASE_STOCK_SQL: &str = include_str!("sql/release_stock.sql");
const GET_STOCK_SQL: &str = include_str!("sql/get_stock.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgInventoryRepository;

impl PgInventoryRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_record(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
        available: u32,
    ) -> Result<(), sqlx::Error> {
        query(INSERT_INVENTORY_SQL)
            .bind(variant.into_uuid())
            .bind(i64::from(available))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Atomic check-and-decrement. Returns the number of rows updated:
    /// zero means the variant had no record or not enough stock, and
    /// nothing changed.
    pub(crate) async fn reserve(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
        quantity: u32,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(RESERVE_STOCK_SQL)
            .bind(variant.into_uuid())
            .bind(i64::from(quantity))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Add stock back. Upserts so a released variant never ends up
    /// without a record.
    pub(crate) async fn release(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
        quantity: u32,
    ) -> Result<(), sqlx::Error> {
        query(RELEASE_STOCK_SQL)
            .bind(variant.into_uuid())
            .bind(i64::from(quantity))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn get_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
    ) -> Result<Option<StockLevel>, sqlx::Error> {
        query_as::<Postgres, StockLevel>(GET_STOCK_SQL)
            .bind(variant.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn available(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
    ) -> Result<Option<i64>, sqlx::Error> {
        query_scalar::<Postgres, i64>("SELECT available FROM inventory WHERE variant_uuid = $1")
            .bind(variant.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for StockLevel {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            variant_uuid: VariantUuid::from_uuid(row.try_get("variant_uuid")?),
            available: try_get_amount(row, "available")?,
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
