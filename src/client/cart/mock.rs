use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::prelude::*;
use futures::future;
use futures::prelude::*;

use super::error::*;
use super::CartClient;
use models::*;

#[derive(Default)]
struct State {
    items: Vec<CartItem>,
    add_calls: Vec<AddCartItemPayload>,
    get_cart_calls: usize,
    fail_variants: HashSet<VariantId>,
}

/// In-memory stand-in for the cart API. Records add calls and can be told
/// to fail adds for selected variants.
#[derive(Clone, Default)]
pub struct MockCartClient {
    state: Arc<Mutex<State>>,
}

impl MockCartClient {
    pub fn seed_item(&self, variant_id: VariantId, quantity: Quantity) {
        let mut state = self.state.lock().unwrap();
        let item = fixture_item(&variant_id, quantity);
        state.items.push(item);
    }

    pub fn fail_adds_for(&self, variant_id: VariantId) {
        self.state.lock().unwrap().fail_variants.insert(variant_id);
    }

    pub fn add_calls(&self) -> Vec<AddCartItemPayload> {
        self.state.lock().unwrap().add_calls.clone()
    }

    pub fn get_cart_calls(&self) -> usize {
        self.state.lock().unwrap().get_cart_calls
    }

    pub fn items(&self) -> Vec<CartItem> {
        self.state.lock().unwrap().items.clone()
    }

    fn snapshot(state: &State) -> Cart {
        let subtotal = state.items.iter().map(|item| item.subtotal.0).sum();
        Cart {
            id: CartId("cart-1".to_string()),
            user_id: UserId(1),
            items: state.items.clone(),
            summary: CartSummary {
                total_items: state.items.iter().map(|item| item.quantity.0).sum(),
                subtotal: ProductPrice(subtotal),
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

fn fixture_item(variant_id: &VariantId, quantity: Quantity) -> CartItem {
    let unit_price = ProductPrice(10_000.0);
    CartItem {
        id: CartItemId(format!("ci-{}", variant_id)),
        product_id: ProductId(format!("p-{}", variant_id)),
        variant_id: variant_id.clone(),
        product_name: format!("Product {}", variant_id),
        variant_name: format!("Variant {}", variant_id),
        quantity,
        unit_price,
        subtotal: ProductPrice(unit_price.0 * f64::from(quantity.0)),
        is_available: true,
    }
}

impl CartClient for MockCartClient {
    fn get_cart(&self) -> Box<Future<Item = Cart, Error = Error> + Send> {
        let mut state = self.state.lock().unwrap();
        state.get_cart_calls += 1;
        Box::new(future::ok(Self::snapshot(&state)))
    }

    fn add_item(&self, payload: AddCartItemPayload) -> Box<Future<Item = Cart, Error = Error> + Send> {
        let mut state = self.state.lock().unwrap();
        state.add_calls.push(payload.clone());

        if state.fail_variants.contains(&payload.variant_id) {
            return Box::new(future::err(ErrorKind::Internal.into()));
        }

        match state.items.iter_mut().find(|item| item.variant_id == payload.variant_id) {
            Some(item) => item.quantity = Quantity(item.quantity.0 + payload.quantity.0),
            None => {
                let item = fixture_item(&payload.variant_id, payload.quantity);
                state.items.push(item);
            }
        }

        Box::new(future::ok(Self::snapshot(&state)))
    }

    fn set_quantity(&self, item_id: CartItemId, payload: SetQuantityPayload) -> Box<Future<Item = Cart, Error = Error> + Send> {
        let mut state = self.state.lock().unwrap();

        match state.items.iter_mut().find(|item| item.id == item_id) {
            Some(item) => item.quantity = payload.quantity,
            None => return Box::new(future::err(ErrorKind::NotFound.into())),
        }

        Box::new(future::ok(Self::snapshot(&state)))
    }

    fn remove_item(&self, item_id: CartItemId) -> Box<Future<Item = Cart, Error = Error> + Send> {
        let mut state = self.state.lock().unwrap();
        state.items.retain(|item| item.id != item_id);
        Box::new(future::ok(Self::snapshot(&state)))
    }

    fn clear_cart(&self) -> Box<Future<Item = (), Error = Error> + Send> {
        let mut state = self.state.lock().unwrap();
        state.items.clear();
        Box::new(future::ok(()))
    }
}
