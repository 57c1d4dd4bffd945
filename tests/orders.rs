extern crate chrono;
extern crate storefront_lib as lib;
extern crate tokio_core;

use chrono::prelude::*;
use tokio_core::reactor::Core;

use lib::client::orders::mock::MockOrdersClient;
use lib::client::orders::{LabelAudience, LabelResource};
use lib::errors::display_message;
use lib::models::*;
use lib::services::{OrderService, OrderServiceImpl};

fn order(number: &str, status: OrderStatus) -> Order {
    let created_at = Utc.ymd(2019, 5, 10).and_hms(9, 30, 0);
    Order {
        id: OrderId::new(),
        order_number: OrderNumber::from(number),
        customer: UserId(777),
        status,
        items: vec![],
        subtotal: ProductPrice(100_000.0),
        discount: ProductPrice(0.0),
        shipping_cost: ProductPrice(15_000.0),
        total: ProductPrice(126_000.0),
        currency: Currency::Idr,
        payment_method: Some("midtrans".to_string()),
        created_at,
        updated_at: created_at,
    }
}

fn setup() -> (Core, MockOrdersClient, OrderServiceImpl<MockOrdersClient>) {
    let core = Core::new().unwrap();
    let client = MockOrdersClient::default();
    let service = OrderServiceImpl::new(client.clone());
    (core, client, service)
}

#[test]
fn cancelling_pending_order_returns_refreshed_detail() {
    let (mut core, client, service) = setup();
    client.seed_order(order("ORD-1", OrderStatus::Pending));

    let refreshed = core.run(service.cancel_order(OrderNumber::from("ORD-1"))).unwrap();

    assert_eq!(refreshed.status, OrderStatus::Cancelled);
    assert_eq!(client.cancel_calls(), vec![OrderNumber::from("ORD-1")]);
}

#[test]
fn cancelling_shipped_order_fails_without_cancel_round_trip() {
    let (mut core, client, service) = setup();
    client.seed_order(order("ORD-2", OrderStatus::Shipped));

    let result = core.run(service.cancel_order(OrderNumber::from("ORD-2")));

    assert!(result.is_err());
    assert!(client.cancel_calls().is_empty());
}

#[test]
fn failed_order_is_still_cancellable() {
    let (mut core, client, service) = setup();
    client.seed_order(order("ORD-3", OrderStatus::Failed));

    let refreshed = core.run(service.cancel_order(OrderNumber::from("ORD-3"))).unwrap();

    assert_eq!(refreshed.status, OrderStatus::Cancelled);
    assert_eq!(client.cancel_calls().len(), 1);
}

#[test]
fn cancellation_failure_surfaces_the_api_message() {
    let (mut core, client, service) = setup();
    client.seed_order(order("ORD-4", OrderStatus::Pending));
    client.fail_cancel_with_message("Order is already being processed");

    let err = core.run(service.cancel_order(OrderNumber::from("ORD-4"))).unwrap_err();

    assert_eq!(display_message(&err, "Unable to cancel order"), "Order is already being processed");
    assert_eq!(client.cancel_calls().len(), 1);
}

#[test]
fn errors_without_payload_fall_back_to_the_default_message() {
    let (mut core, _client, service) = setup();

    let err = core.run(service.get_order(OrderNumber::from("ORD-404"))).unwrap_err();

    assert_eq!(display_message(&err, "Unable to load order"), "Unable to load order");
}

#[test]
fn listing_paginates_server_side() {
    let (mut core, client, service) = setup();
    client.seed_order(order("ORD-1", OrderStatus::Paid));
    client.seed_order(order("ORD-2", OrderStatus::Paid));
    client.seed_order(order("ORD-3", OrderStatus::Pending));

    let params = OrderSearchParams::default().with_limit(2).with_page(2);
    let page = core.run(service.list_orders(params)).unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.meta.total, 3);
    assert_eq!(page.meta.total_pages, 2);
    assert_eq!(page.meta.page, 2);
}

#[test]
fn listing_filters_by_status() {
    let (mut core, client, service) = setup();
    client.seed_order(order("ORD-1", OrderStatus::Paid));
    client.seed_order(order("ORD-2", OrderStatus::Pending));

    let params = OrderSearchParams::default().with_status(Some(OrderStatus::Paid));
    let page = core.run(service.list_orders(params)).unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].order_number, OrderNumber::from("ORD-1"));
}

#[test]
fn shipping_label_contract_is_shared_between_audiences() {
    let (mut core, client, service) = setup();
    client.seed_order(order("ORD-5", OrderStatus::Shipped));
    client.set_label(LabelResource::Url("https://cdn.example/label.pdf".to_string()));

    let customer_label = core
        .run(service.shipping_label(OrderNumber::from("ORD-5"), LabelAudience::Customer))
        .unwrap();
    let admin_label = core
        .run(service.shipping_label(OrderNumber::from("ORD-5"), LabelAudience::Admin))
        .unwrap();

    assert_eq!(customer_label, LabelResource::Url("https://cdn.example/label.pdf".to_string()));
    assert_eq!(customer_label, admin_label);
}
