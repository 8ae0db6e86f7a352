//! Variants Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::try_get_amount,
    domain::catalog::models::{Variant, VariantUuid},
};

const GET_VARIANT_SQL: &str = include_str!("sql/get_variant.sql");
const CREATE_VARIANT_SQL: &str = include_str!("sql/create_variant.sql");
const UPDATE_VARIANT_PRICE_SQL: &str = include_str!("sql/update_variant_price.sql");
const SET_VARIANT_ACTIVE_SQL: &str = include_str!("sql/set_variant_active.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgVariantsRepository;

impl PgVariantsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
    ) -> Result<Variant, sqlx::Error> {
        query_as::<Postgres, Variant>(GET_VARIANT_SQL)
            .bind(variant.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Like [`Self::get_variant`], but absence is not an error.
    pub(crate) async fn find_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
    ) -> Result<Option<Variant>, sqlx::Error> {
        query_as::<Postgres, Variant>(GET_VARIANT_SQL)
            .bind(variant.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
        price: u64,
        active: bool,
    ) -> Result<Variant, sqlx::Error> {
        let price_i64 = i64::try_from(price).map_err(|e| sqlx::Error::ColumnDecode {
            index: "price".to_string(),
            source: Box::new(e),
        })?;

        query_as::<Postgres, Variant>(CREATE_VARIANT_SQL)
            .bind(variant.into_uuid())
            .bind(price_i64)
            .bind(active)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_price(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
        price: u64,
    ) -> Result<Variant, sqlx::Error> {
        let price_i64 = i64::try_from(price).map_err(|e| sqlx::Error::ColumnDecode {
            index: "price".to_string(),
            source: Box::new(e),
        })?;

        query_as::<Postgres, Variant>(UPDATE_VARIANT_PRICE_SQL)
            .bind(variant.into_uuid())
            .bind(price_i64)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_active(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
        active: bool,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_VARIANT_ACTIVE_SQL)
            .bind(variant.into_uuid())
            .bind(active)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for Variant {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let price = try_get_amount(row, "price")?;

        Ok(Self {
            uuid: VariantUuid::from_uuid(row.try_get("uuid")?),
            price,
            active: row.try_get("active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
