//! Guest cart persistence for unauthenticated visitors.
//!
//! One shared mutable list per browser profile, read-modify-written on
//! every operation. All operations are synchronous and touch nothing but
//! the injected key-value store - no network, no session required.

use std::sync::Arc;

use chrono::prelude::*;
use serde_json;

use super::key_value::{Error, KeyValueStore};
use models::{GuestCartItem, Quantity, VariantId};

/// Fixed storage key the guest cart lives under.
pub const GUEST_CART_STORAGE_KEY: &str = "guest_cart";

#[derive(Clone)]
pub struct GuestCartStore {
    store: Arc<KeyValueStore>,
}

impl GuestCartStore {
    pub fn new(store: Arc<KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persisted items, or the empty list when nothing is stored or the
    /// stored value does not parse.
    pub fn get(&self) -> Vec<GuestCartItem> {
        let raw = match self.store.get(GUEST_CART_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return vec![],
            Err(e) => {
                warn!("Failed to read guest cart storage: {}", e);
                return vec![];
            }
        };

        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                warn!("Discarding unparsable guest cart contents: {}", e);
                vec![]
            }
        }
    }

    /// Adds `quantity` of a variant. An existing line for the same variant
    /// absorbs the quantity and refreshes its timestamp - never a second
    /// line per variant.
    pub fn add(&self, variant_id: VariantId, quantity: Quantity) -> Result<(), Error> {
        let mut items = self.get();
        let now = Utc::now();

        match items.iter_mut().find(|item| item.variant_id == variant_id) {
            Some(item) => {
                item.quantity = Quantity(item.quantity.0 + quantity.0);
                item.added_at = now;
            }
            None => items.push(GuestCartItem {
                variant_id,
                quantity,
                added_at: now,
            }),
        }

        self.persist(&items)
    }

    /// Overwrites a line's quantity; zero removes the line. No-op for an
    /// absent variant.
    pub fn update(&self, variant_id: VariantId, quantity: Quantity) -> Result<(), Error> {
        if quantity.0 == 0 {
            return self.remove(variant_id);
        }

        let mut items = self.get();
        match items.iter_mut().find(|item| item.variant_id == variant_id) {
            Some(item) => item.quantity = quantity,
            None => return Ok(()),
        }

        self.persist(&items)
    }

    /// Removes a line if present; no-op otherwise.
    pub fn remove(&self, variant_id: VariantId) -> Result<(), Error> {
        let mut items = self.get();
        let len_before = items.len();
        items.retain(|item| item.variant_id != variant_id);

        if items.len() == len_before {
            return Ok(());
        }

        self.persist(&items)
    }

    pub fn clear(&self) -> Result<(), Error> {
        self.store.remove(GUEST_CART_STORAGE_KEY)
    }

    fn persist(&self, items: &[GuestCartItem]) -> Result<(), Error> {
        let raw = serde_json::to_string(items).map_err(|e| Error::Corrupt(format!("{}", e)))?;
        self.store.set(GUEST_CART_STORAGE_KEY, raw)
    }
}
