use std::collections::HashSet;

use chrono::prelude::*;
use validator::{Validate, ValidationError};

use super::common::*;

/// Cart line kept in browser-profile-local storage for an unauthenticated
/// visitor. At most one entry per variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestCartItem {
    pub variant_id: VariantId,
    pub quantity: Quantity,
    pub added_at: DateTime<Utc>,
}

/// Server cart line with denormalized product/variant snapshots.
/// `is_available` goes false when the variant was deactivated or deleted
/// after the line was added.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub product_name: String,
    pub variant_name: String,
    pub quantity: Quantity,
    pub unit_price: ProductPrice,
    pub subtotal: ProductPrice,
    pub is_available: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub total_items: i32,
    pub subtotal: ProductPrice,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub items: Vec<CartItem>,
    pub summary: CartSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn variant_ids(&self) -> HashSet<VariantId> {
        self.items.iter().map(|item| item.variant_id.clone()).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemPayload {
    pub variant_id: VariantId,
    #[validate(custom = "validate_quantity")]
    pub quantity: Quantity,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetQuantityPayload {
    #[validate(custom = "validate_quantity")]
    pub quantity: Quantity,
}

fn validate_quantity(quantity: &Quantity) -> Result<(), ValidationError> {
    if quantity.0 < 1 {
        return Err(ValidationError::new("quantity"));
    }
    Ok(())
}

/// Outcome of a guest cart merge, by variant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MergeSummary {
    pub merged: Vec<VariantId>,
    pub skipped: Vec<VariantId>,
    pub failed: Vec<VariantId>,
}

impl MergeSummary {
    pub fn is_empty(&self) -> bool {
        self.merged.is_empty() && self.skipped.is_empty() && self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[test]
    fn add_payload_rejects_zero_quantity() {
        let payload = AddCartItemPayload {
            variant_id: VariantId("v-1".to_string()),
            quantity: Quantity(0),
        };
        assert!(payload.validate().is_err());

        let payload = AddCartItemPayload {
            variant_id: VariantId("v-1".to_string()),
            quantity: Quantity(1),
        };
        assert!(payload.validate().is_ok());
    }
}
