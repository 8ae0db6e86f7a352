//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*, test::RequestBuilder};
use uuid::Uuid;

use storefront_app::{
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            models::{CartItem, CartItemUuid, CartLine},
        },
        catalog::models::VariantUuid,
        orders::{
            MockCheckoutService, MockOrdersService, OrderStatus,
            models::{Order, OrderItem, OrderItemUuid, OrderUuid, StatusChange, StatusChangeUuid},
        },
    },
    identity::UserUuid,
};

use crate::{
    auth::middleware::{ROLE_HEADER, USER_HEADER},
    state::State,
};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

/// Attach the identity headers the gateway would forward in production.
pub(crate) trait WithIdentity {
    fn as_customer(self) -> Self;

    fn as_admin(self) -> Self;
}

impl WithIdentity for RequestBuilder {
    fn as_customer(self) -> Self {
        self.add_header(USER_HEADER, TEST_USER_UUID.to_string(), true)
    }

    fn as_admin(self) -> Self {
        self.as_customer().add_header(ROLE_HEADER, "admin", true)
    }
}

fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_list_cart().never();
    carts.expect_add_item().never();
    carts.expect_update_item().never();
    carts.expect_remove_item().never();
    carts.expect_clear().never();

    carts
}

fn strict_checkout_mock() -> MockCheckoutService {
    let mut checkout = MockCheckoutService::new();

    checkout.expect_checkout().never();

    checkout
}

fn strict_orders_mock() -> MockOrdersService {
    let mut orders = MockOrdersService::new();

    orders.expect_list_orders().never();
    orders.expect_get_order().never();
    orders.expect_transition().never();

    orders
}

fn make_service(app: AppContext, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(State::from_app_context(app)))
            .hoop(crate::auth::middleware::handler)
            .push(route),
    )
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    make_service(
        AppContext {
            carts: Arc::new(carts),
            checkout: Arc::new(strict_checkout_mock()),
            orders: Arc::new(strict_orders_mock()),
        },
        route,
    )
}

pub(crate) fn checkout_service(checkout: MockCheckoutService, route: Router) -> Service {
    make_service(
        AppContext {
            carts: Arc::new(strict_carts_mock()),
            checkout: Arc::new(checkout),
            orders: Arc::new(strict_orders_mock()),
        },
        route,
    )
}

pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
    make_service(
        AppContext {
            carts: Arc::new(strict_carts_mock()),
            checkout: Arc::new(strict_checkout_mock()),
            orders: Arc::new(orders),
        },
        route,
    )
}

pub(crate) fn make_cart_item(quantity: u32) -> CartItem {
    CartItem {
        uuid: CartItemUuid::new(),
        variant_uuid: VariantUuid::new(),
        quantity,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_cart_line(unit_price: u64, quantity: u32) -> CartLine {
    CartLine {
        uuid: CartItemUuid::new(),
        variant_uuid: VariantUuid::new(),
        quantity,
        unit_price,
        line_total: unit_price * u64::from(quantity),
        active: true,
        available: 5,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_order(uuid: OrderUuid, status: OrderStatus) -> Order {
    Order {
        uuid,
        user_uuid: TEST_USER_UUID,
        number: "ORD-20260101-0A1B2C3D".to_string(),
        status,
        total: 0,
        items: Vec::new(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn make_order_item(variant: VariantUuid, quantity: u32, unit_price: u64) -> OrderItem {
    OrderItem {
        uuid: OrderItemUuid::new(),
        variant_uuid: variant,
        quantity,
        unit_price,
        subtotal: unit_price * u64::from(quantity),
        created_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_status_change(
    from_status: Option<OrderStatus>,
    to_status: OrderStatus,
) -> StatusChange {
    StatusChange {
        uuid: StatusChangeUuid::new(),
        from_status,
        to_status,
        actor_uuid: Some(TEST_USER_UUID),
        reason: None,
        created_at: Timestamp::UNIX_EPOCH,
    }
}
