//! Orders Repository
//!
//! Orders, their price-snapshotted items, and the append-only status
//! history ledger. History rows are only ever inserted.

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::{try_get_amount, try_get_quantity},
    domain::{
        catalog::models::VariantUuid,
        orders::{
            models::{
                NewOrderItem, Order, OrderItem, OrderItemUuid, OrderUuid, StatusChange,
                StatusChangeUuid,
            },
            status::OrderStatus,
        },
    },
    identity::UserUuid,
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_ITEM_SQL: &str = include_str!("sql/create_order_item.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const GET_ORDER_FOR_UPDATE_SQL: &str = include_str!("sql/get_order_for_update.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("sql/get_order_items.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("sql/update_order_status.sql");
const APPEND_STATUS_HISTORY_SQL: &str = include_str!("sql/append_status_history.sql");
const GET_STATUS_HISTORY_SQL: &str = include_str!("sql/get_status_history.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        user: UserUuid,
        number: &str,
        status: OrderStatus,
        total: u64,
    ) -> Result<Order, sqlx::Error> {
        let total_i64 = try_into_amount(total)?;

        query_as::<Postgres, Order>(CREATE_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(user.into_uuid())
            .bind(number)
            .bind(status.as_str())
            .bind(total_i64)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_order_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        item: NewOrderItem,
    ) -> Result<OrderItem, sqlx::Error> {
        let quantity_i32 = i32::try_from(item.quantity).map_err(|e| sqlx::Error::ColumnDecode {
            index: "quantity".to_string(),
            source: Box::new(e),
        })?;
        let unit_price_i64 = try_into_amount(item.unit_price)?;
        let subtotal_i64 = try_into_amount(item.unit_price * u64::from(item.quantity))?;

        query_as::<Postgres, OrderItem>(CREATE_ORDER_ITEM_SQL)
            .bind(item.uuid.into_uuid())
            .bind(order.into_uuid())
            .bind(item.variant_uuid.into_uuid())
            .bind(quantity_i32)
            .bind(unit_price_i64)
            .bind(subtotal_i64)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(LIST_ORDERS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Load an order row and lock it for the rest of the transaction.
    /// The lock is the serialisation point for status transitions.
    pub(crate) async fn get_order_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_FOR_UPDATE_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        query_as::<Postgres, OrderItem>(GET_ORDER_ITEMS_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(UPDATE_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn append_history(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        from_status: Option<OrderStatus>,
        to_status: OrderStatus,
        actor: Option<UserUuid>,
        reason: Option<&str>,
    ) -> Result<StatusChange, sqlx::Error> {
        query_as::<Postgres, StatusChange>(APPEND_STATUS_HISTORY_SQL)
            .bind(StatusChangeUuid::new().into_uuid())
            .bind(order.into_uuid())
            .bind(from_status.map(OrderStatus::as_str))
            .bind(to_status.as_str())
            .bind(actor.map(UserUuid::into_uuid))
            .bind(reason)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_history(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<StatusChange>, sqlx::Error> {
        query_as::<Postgres, StatusChange>(GET_STATUS_HISTORY_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

fn try_into_amount(amount: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(amount).map_err(|e| sqlx::Error::ColumnDecode {
        index: "amount".to_string(),
        source: Box::new(e),
    })
}

fn try_get_status(row: &PgRow, column: &str) -> sqlx::Result<OrderStatus> {
    let status: &str = row.try_get(column)?;

    status.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            number: row.try_get("number")?,
            status: try_get_status(row, "status")?,
            total: try_get_amount(row, "total")?,
            items: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            variant_uuid: VariantUuid::from_uuid(row.try_get("variant_uuid")?),
            quantity: try_get_quantity(row, "quantity")?,
            unit_price: try_get_amount(row, "unit_price")?,
            subtotal: try_get_amount(row, "subtotal")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for StatusChange {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let from_status = row
            .try_get::<Option<&str>, _>("from_status")?
            .map(str::parse)
            .transpose()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "from_status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: StatusChangeUuid::from_uuid(row.try_get("uuid")?),
            from_status,
            to_status: try_get_status(row, "to_status")?,
            actor_uuid: row
                .try_get::<Option<uuid::Uuid>, _>("actor_uuid")?
                .map(UserUuid::from_uuid),
            reason: row.try_get("reason")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
