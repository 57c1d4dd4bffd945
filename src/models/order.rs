use std::fmt;
use std::str::FromStr;

use chrono::prelude::*;
use chrono::Duration;
use failure;
use failure::Fail;
use uuid::Uuid;

use super::common::*;
use errors::Error;

/// Hours an unpaid order stays payable after creation. Past this instant
/// the client treats the order as payment-expired; the authoritative state
/// is still server-held.
pub const PAYMENT_DEADLINE_HOURS: i64 = 24;

#[derive(Clone, Copy, Debug, Display, Eq, From, PartialEq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub Uuid);

impl OrderId {
    pub fn new() -> Self {
        OrderId(Uuid::new_v4())
    }
}

/// Human-shareable order identifier, distinct from the internal id.
#[derive(Clone, Debug, Default, Display, Eq, From, Hash, Into, PartialEq, Serialize, Deserialize)]
pub struct OrderNumber(pub String);

impl<'a> From<&'a str> for OrderNumber {
    fn from(v: &'a str) -> Self {
        OrderNumber(v.to_string())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// Set on order creation, awaiting payment.
    Pending,
    /// Payment confirmed.
    Paid,
    /// Order is being processed by store management.
    Processing,
    /// Wares are on their way to the customer.
    Shipped,
    Delivered,
    Completed,
    Cancelled,
    Failed,
}

impl OrderStatus {
    pub fn code(&self) -> &'static str {
        use self::OrderStatus::*;

        match *self {
            Pending => "PENDING",
            Paid => "PAID",
            Processing => "PROCESSING",
            Shipped => "SHIPPED",
            Delivered => "DELIVERED",
            Completed => "COMPLETED",
            Cancelled => "CANCELLED",
            Failed => "FAILED",
        }
    }

    pub fn from_code(code: &str) -> Result<Self, failure::Error> {
        use self::OrderStatus::*;

        match code {
            "PENDING" => Ok(Pending),
            "PAID" => Ok(Paid),
            "PROCESSING" => Ok(Processing),
            "SHIPPED" => Ok(Shipped),
            "DELIVERED" => Ok(Delivered),
            "COMPLETED" => Ok(Completed),
            "CANCELLED" => Ok(Cancelled),
            "FAILED" => Ok(Failed),
            other => Err(Error::Parse.context(format!("Unknown order status {}", other)).into()),
        }
    }

    /// Cancellation is only offered before the order entered fulfilment.
    pub fn can_cancel(&self) -> bool {
        use self::OrderStatus::*;

        match *self {
            Pending | Failed => true,
            _ => false,
        }
    }

    /// Terminal states - no further status-affecting client operation applies.
    pub fn is_final(&self) -> bool {
        use self::OrderStatus::*;

        match *self {
            Completed | Cancelled => true,
            _ => false,
        }
    }

    /// A shipping label exists once the order left the warehouse.
    pub fn has_label(&self) -> bool {
        use self::OrderStatus::*;

        match *self {
            Shipped | Delivered | Completed => true,
            _ => false,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for OrderStatus {
    type Err = failure::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::from_code(s)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub product_name: String,
    pub variant_name: String,
    pub quantity: Quantity,
    pub unit_price: ProductPrice,
    pub subtotal: ProductPrice,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub order_number: OrderNumber,
    pub customer: UserId,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub subtotal: ProductPrice,
    pub discount: ProductPrice,
    pub shipping_cost: ProductPrice,
    pub total: ProductPrice,
    pub currency: Currency,
    pub payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn payment_deadline(&self) -> DateTime<Utc> {
        self.created_at + Duration::hours(PAYMENT_DEADLINE_HOURS)
    }

    /// Only a pending order can expire; everything else already left the
    /// payment window one way or another.
    pub fn is_payment_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == OrderStatus::Pending && now > self.payment_deadline()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u32,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrdersPage {
    pub items: Vec<Order>,
    pub meta: PageMeta,
}

/// Search parameters for the paginated order listing. Every filter setter
/// resets `page` to 1 so a narrowed result set never keeps a stale page.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderSearchParams {
    pub page: u32,
    pub limit: u32,
    pub status: Option<OrderStatus>,
    pub search: Option<String>,
}

impl Default for OrderSearchParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            status: None,
            search: None,
        }
    }
}

impl OrderSearchParams {
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self.page = 1;
        self
    }

    pub fn with_status(mut self, status: Option<OrderStatus>) -> Self {
        self.status = status;
        self.page = 1;
        self
    }

    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search;
        self.page = 1;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_eligibility() {
        assert!(OrderStatus::Pending.can_cancel());
        assert!(OrderStatus::Failed.can_cancel());
        assert!(!OrderStatus::Shipped.can_cancel());
        assert!(!OrderStatus::Completed.can_cancel());
    }

    #[test]
    fn finality_and_label_availability() {
        assert!(OrderStatus::Completed.is_final());
        assert!(OrderStatus::Cancelled.is_final());
        assert!(!OrderStatus::Pending.is_final());

        assert!(OrderStatus::Shipped.has_label());
        assert!(OrderStatus::Delivered.has_label());
        assert!(OrderStatus::Completed.has_label());
        assert!(!OrderStatus::Paid.has_label());
    }

    #[test]
    fn status_codes_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Paid,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
            OrderStatus::Failed,
        ].iter()
        {
            assert_eq!(OrderStatus::from_code(status.code()).unwrap(), *status);
        }
        assert!(OrderStatus::from_code("UNKNOWN").is_err());
    }

    #[test]
    fn filter_change_resets_page() {
        let params = OrderSearchParams::default().with_page(3);
        assert_eq!(params.page, 3);

        let params = params.with_status(Some(OrderStatus::Paid));
        assert_eq!(params.page, 1);
        assert_eq!(params.status, Some(OrderStatus::Paid));

        let params = params.with_page(5).with_search(Some("sneakers".to_string()));
        assert_eq!(params.page, 1);
    }

    #[test]
    fn payment_deadline_is_a_day_after_creation() {
        let created_at = Utc.ymd(2019, 3, 1).and_hms(12, 0, 0);
        let order = fixture_order(OrderStatus::Pending, created_at);

        assert_eq!(order.payment_deadline(), Utc.ymd(2019, 3, 2).and_hms(12, 0, 0));
        assert!(!order.is_payment_expired(Utc.ymd(2019, 3, 2).and_hms(11, 59, 59)));
        assert!(order.is_payment_expired(Utc.ymd(2019, 3, 2).and_hms(12, 0, 1)));

        let paid = fixture_order(OrderStatus::Paid, created_at);
        assert!(!paid.is_payment_expired(Utc.ymd(2019, 3, 5).and_hms(0, 0, 0)));
    }

    fn fixture_order(status: OrderStatus, created_at: DateTime<Utc>) -> Order {
        Order {
            id: OrderId::new(),
            order_number: OrderNumber::from("ORD-0001"),
            customer: UserId(1),
            status,
            items: vec![],
            subtotal: ProductPrice(100_000.0),
            discount: ProductPrice(0.0),
            shipping_cost: ProductPrice(15_000.0),
            total: ProductPrice(115_000.0),
            currency: Currency::Idr,
            payment_method: None,
            created_at,
            updated_at: created_at,
        }
    }
}
