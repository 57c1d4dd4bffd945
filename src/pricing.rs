//! Checkout pricing. Pure functions only - no I/O, no side effects.

use chrono::prelude::*;

use models::{Currency, ProductPrice, Quantity, ShippingType};

/// VAT applied to IDR totals. Other currencies are taxed at the gateway.
pub const IDR_TAX_RATE: f64 = 0.11;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    /// Discount fraction in `[0, 1)`.
    pub discount: f64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl Promotion {
    /// A promotion counts as active until its end date; `start_date` is not
    /// consulted, so a not-yet-started promotion already discounts.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.end_date > now
    }
}

pub fn final_unit_price(base_price: ProductPrice, promotion: Option<&Promotion>, now: DateTime<Utc>) -> ProductPrice {
    match promotion {
        Some(promotion) if promotion.is_active(now) => ProductPrice(base_price.0 * (1.0 - promotion.discount)),
        _ => base_price,
    }
}

pub fn line_subtotal(unit_price: ProductPrice, quantity: Quantity) -> ProductPrice {
    ProductPrice(unit_price.0 * f64::from(quantity.0))
}

/// Tax on a subtotal. IDR amounts round to the nearest whole unit - there
/// is no fractional IDR.
pub fn tax(subtotal: ProductPrice, currency: Currency) -> ProductPrice {
    match currency {
        Currency::Idr => ProductPrice((subtotal.0 * IDR_TAX_RATE).round()),
        _ => ProductPrice(0.0),
    }
}

/// Order-level total. Tax applies to the post-discount, pre-shipping
/// subtotal.
pub fn order_total(
    subtotal: ProductPrice,
    shipping_cost: ProductPrice,
    discount: ProductPrice,
    currency: Currency,
) -> ProductPrice {
    let taxable = ProductPrice(subtotal.0 - discount.0);
    ProductPrice(taxable.0 + shipping_cost.0 + tax(taxable, currency).0)
}

pub fn currency_for_shipping(shipping_type: ShippingType, country: Option<&str>) -> Currency {
    if shipping_type == ShippingType::Domestic || country == Some("ID") {
        Currency::Idr
    } else {
        Currency::Usd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.ymd(y, m, d).and_hms(0, 0, 0)
    }

    #[test]
    fn idr_tax_rounds_to_whole_units() {
        assert_eq!(tax(ProductPrice(1_000_000.0), Currency::Idr), ProductPrice(110_000.0));
        assert_eq!(tax(ProductPrice(50.0), Currency::Usd), ProductPrice(0.0));
        assert_eq!(tax(ProductPrice(95.0), Currency::Idr), ProductPrice(10.0));
    }

    #[test]
    fn order_total_taxes_post_discount_subtotal() {
        let total = order_total(
            ProductPrice(100_000.0),
            ProductPrice(15_000.0),
            ProductPrice(10_000.0),
            Currency::Idr,
        );
        // 90 000 + 15 000 + round(90 000 * 0.11) = 105 000 + 9 900
        assert_eq!(total, ProductPrice(114_900.0));
    }

    #[test]
    fn usd_total_carries_no_tax() {
        let total = order_total(ProductPrice(100.0), ProductPrice(20.0), ProductPrice(0.0), Currency::Usd);
        assert_eq!(total, ProductPrice(120.0));
    }

    #[test]
    fn promotion_discounts_until_end_date() {
        let promotion = Promotion {
            discount: 0.25,
            start_date: at(2019, 6, 1),
            end_date: at(2019, 6, 30),
        };

        let discounted = final_unit_price(ProductPrice(200.0), Some(&promotion), at(2019, 6, 15));
        assert_eq!(discounted, ProductPrice(150.0));

        let expired = final_unit_price(ProductPrice(200.0), Some(&promotion), at(2019, 7, 1));
        assert_eq!(expired, ProductPrice(200.0));

        assert_eq!(final_unit_price(ProductPrice(200.0), None, at(2019, 6, 15)), ProductPrice(200.0));
    }

    #[test]
    fn promotion_before_start_date_already_counts_as_active() {
        let promotion = Promotion {
            discount: 0.1,
            start_date: at(2019, 6, 10),
            end_date: at(2019, 6, 30),
        };

        let price = final_unit_price(ProductPrice(100.0), Some(&promotion), at(2019, 6, 1));
        assert_eq!(price, ProductPrice(90.0));
    }

    #[test]
    fn line_subtotal_scales_by_quantity() {
        assert_eq!(line_subtotal(ProductPrice(150.0), Quantity(3)), ProductPrice(450.0));
    }

    #[test]
    fn shipping_currency_selection() {
        assert_eq!(currency_for_shipping(ShippingType::Domestic, None), Currency::Idr);
        assert_eq!(
            currency_for_shipping(ShippingType::International, Some("ID")),
            Currency::Idr
        );
        assert_eq!(
            currency_for_shipping(ShippingType::International, Some("SG")),
            Currency::Usd
        );
        assert_eq!(currency_for_shipping(ShippingType::International, None), Currency::Usd);
    }
}
