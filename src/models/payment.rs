use chrono::prelude::*;

use super::order::OrderNumber;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Failed,
}

impl PaymentStatus {
    pub fn is_terminal(&self) -> bool {
        match *self {
            PaymentStatus::Paid | PaymentStatus::Failed => true,
            PaymentStatus::Unpaid => false,
        }
    }
}

/// Snapshot returned by the payment status endpoint. The client never owns
/// payment state beyond the current poll cycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusData {
    pub order_number: OrderNumber,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}

/// Request body for starting a checkout session with the payment gateway.
/// The endpoint predates the camelCase convention of the rest of the API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreatePayment {
    pub order_number: OrderNumber,
    pub payment_method: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub payment_url: String,
    pub token: String,
    #[serde(rename = "orderNumber")]
    pub order_number: OrderNumber,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_paid_and_failed_are_terminal() {
        assert!(PaymentStatus::Paid.is_terminal());
        assert!(PaymentStatus::Failed.is_terminal());
        assert!(!PaymentStatus::Unpaid.is_terminal());
    }

    #[test]
    fn status_data_uses_the_wire_casing() {
        let raw = r#"{"orderNumber":"ORD-1","paymentStatus":"UNPAID"}"#;
        let data: PaymentStatusData = ::serde_json::from_str(raw).unwrap();
        assert_eq!(data.order_number, OrderNumber::from("ORD-1"));
        assert_eq!(data.payment_status, PaymentStatus::Unpaid);
        assert_eq!(data.payment_method, None);
        assert_eq!(data.paid_at, None);
    }
}
