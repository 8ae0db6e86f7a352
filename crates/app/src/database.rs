//! Database connection management

use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow, query};

/// Upper bound on how long a transaction waits for a row lock before the
/// request fails with a retryable conflict instead of queueing indefinitely.
pub const LOCK_TIMEOUT_SQL: &str = "SET LOCAL lock_timeout = '5s'";

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction fails.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Begin a transaction with a bounded lock wait.
    ///
    /// Checkout and status transitions contend on inventory and order rows;
    /// the timeout turns indefinite lock queueing into a retryable failure.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction or setting the timeout fails.
    pub async fn begin_bounded(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        query(LOCK_TIMEOUT_SQL).execute(&mut *tx).await?;

        Ok(tx)
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Decode a non-negative money amount column stored as `BIGINT`.
pub(crate) fn try_get_amount(row: &PgRow, column: &str) -> sqlx::Result<u64> {
    let amount: i64 = row.try_get(column)?;

    u64::try_from(amount).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// Decode a positive quantity column stored as `INTEGER`.
pub(crate) fn try_get_quantity(row: &PgRow, column: &str) -> sqlx::Result<u32> {
    let quantity: i32 = row.try_get(column)?;

    u32::try_from(quantity).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}
