extern crate storefront_lib as lib;
extern crate tokio_core;

use std::sync::Arc;

use tokio_core::reactor::Core;

use lib::client::cart::mock::MockCartClient;
use lib::models::*;
use lib::repos::{GuestCartStore, MemoryKeyValueStore};
use lib::services::{CartService, CartServiceImpl};

fn variant(id: &str) -> VariantId {
    VariantId(id.to_string())
}

fn setup() -> (Core, MockCartClient, GuestCartStore, CartServiceImpl<MockCartClient>) {
    let core = Core::new().unwrap();
    let client = MockCartClient::default();
    let guest_cart = GuestCartStore::new(Arc::new(MemoryKeyValueStore::new()));
    let service = CartServiceImpl::new(client.clone(), guest_cart.clone(), Customer::User(UserId(777)));
    (core, client, guest_cart, service)
}

#[test]
fn merge_skips_variants_already_in_server_cart() {
    let (mut core, client, guest_cart, service) = setup();

    client.seed_item(variant("v-1"), Quantity(2));
    guest_cart.add(variant("v-1"), Quantity(3)).unwrap();
    guest_cart.add(variant("v-2"), Quantity(1)).unwrap();

    let summary = core.run(service.merge_guest_cart()).unwrap();

    assert_eq!(summary.skipped, vec![variant("v-1")]);
    assert_eq!(summary.merged, vec![variant("v-2")]);
    assert!(summary.failed.is_empty());

    // No add call was issued for the duplicate and the server quantity is
    // untouched.
    let add_calls = client.add_calls();
    assert_eq!(add_calls.len(), 1);
    assert_eq!(add_calls[0].variant_id, variant("v-2"));

    let items = client.items();
    let server_line = items.iter().find(|item| item.variant_id == variant("v-1")).unwrap();
    assert_eq!(server_line.quantity, Quantity(2));
}

#[test]
fn merge_clears_guest_cart_even_on_partial_failure() {
    let (mut core, client, guest_cart, service) = setup();

    guest_cart.add(variant("v-1"), Quantity(1)).unwrap();
    guest_cart.add(variant("v-2"), Quantity(4)).unwrap();
    client.fail_adds_for(variant("v-1"));

    let summary = core.run(service.merge_guest_cart()).unwrap();

    assert_eq!(summary.failed, vec![variant("v-1")]);
    assert_eq!(summary.merged, vec![variant("v-2")]);

    // The failed line is gone for good - at-most-once migration.
    assert!(guest_cart.get().is_empty());
}

#[test]
fn empty_guest_cart_merges_without_any_network_call() {
    let (mut core, client, _guest_cart, service) = setup();

    let summary = core.run(service.merge_guest_cart()).unwrap();

    assert!(summary.is_empty());
    assert_eq!(client.get_cart_calls(), 0);
    assert!(client.add_calls().is_empty());
}

#[test]
fn merge_processes_guest_lines_in_stored_order() {
    let (mut core, client, guest_cart, service) = setup();

    guest_cart.add(variant("v-1"), Quantity(1)).unwrap();
    guest_cart.add(variant("v-2"), Quantity(1)).unwrap();
    guest_cart.add(variant("v-3"), Quantity(1)).unwrap();

    core.run(service.merge_guest_cart()).unwrap();

    let ordered: Vec<VariantId> = client.add_calls().into_iter().map(|payload| payload.variant_id).collect();
    assert_eq!(ordered, vec![variant("v-1"), variant("v-2"), variant("v-3")]);
}

#[test]
fn merge_runs_at_most_once_per_login() {
    let (mut core, client, guest_cart, service) = setup();

    guest_cart.add(variant("v-1"), Quantity(1)).unwrap();

    core.run(service.merge_guest_cart()).unwrap();
    let summary = core.run(service.merge_guest_cart()).unwrap();

    // The second pass sees an empty guest cart and does nothing.
    assert!(summary.is_empty());
    assert_eq!(client.add_calls().len(), 1);
}

#[test]
fn anonymous_add_goes_to_guest_store_only() {
    let mut core = Core::new().unwrap();
    let client = MockCartClient::default();
    let guest_cart = GuestCartStore::new(Arc::new(MemoryKeyValueStore::new()));
    let service = CartServiceImpl::new(client.clone(), guest_cart.clone(), Customer::Anonymous);

    core.run(service.add_item(AddCartItemPayload {
        variant_id: variant("v-1"),
        quantity: Quantity(2),
    })).unwrap();

    assert!(client.add_calls().is_empty());
    let items = guest_cart.get();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, Quantity(2));
}

#[test]
fn authenticated_add_validates_quantity() {
    let (mut core, client, _guest_cart, service) = setup();

    let result = core.run(service.add_item(AddCartItemPayload {
        variant_id: variant("v-1"),
        quantity: Quantity(0),
    }));

    assert!(result.is_err());
    assert!(client.add_calls().is_empty());
}
