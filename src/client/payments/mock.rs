use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::prelude::*;
use futures::future;
use futures::prelude::*;

use super::error::*;
use super::PaymentsClient;
use models::*;

#[derive(Default)]
struct State {
    /// Scripted responses for successive status checks. An exhausted
    /// script keeps answering `Unpaid`.
    script: VecDeque<Result<PaymentStatus, ErrorKind>>,
    status_calls: usize,
    create_calls: Vec<CreatePayment>,
}

/// In-memory stand-in for the payments API driven by a response script.
#[derive(Clone, Default)]
pub struct MockPaymentsClient {
    state: Arc<Mutex<State>>,
}

impl MockPaymentsClient {
    pub fn script_statuses(&self, statuses: &[PaymentStatus]) {
        let mut state = self.state.lock().unwrap();
        for status in statuses {
            state.script.push_back(Ok(*status));
        }
    }

    pub fn script_error(&self) {
        self.state.lock().unwrap().script.push_back(Err(ErrorKind::Internal));
    }

    pub fn status_calls(&self) -> usize {
        self.state.lock().unwrap().status_calls
    }

    pub fn create_calls(&self) -> Vec<CreatePayment> {
        self.state.lock().unwrap().create_calls.clone()
    }
}

impl PaymentsClient for MockPaymentsClient {
    fn payment_status(&self, order_number: OrderNumber) -> Box<Future<Item = PaymentStatusData, Error = Error> + Send> {
        let mut state = self.state.lock().unwrap();
        state.status_calls += 1;

        let scripted = state.script.pop_front().unwrap_or(Ok(PaymentStatus::Unpaid));

        let fut = scripted
            .map(|payment_status| PaymentStatusData {
                order_number,
                payment_status,
                payment_method: Some("midtrans".to_string()),
                paid_at: match payment_status {
                    PaymentStatus::Paid => Some(Utc::now()),
                    _ => None,
                },
            })
            .map_err(Error::from)
            .into_future();

        Box::new(fut)
    }

    fn create_payment(&self, input: CreatePayment) -> Box<Future<Item = CheckoutSession, Error = Error> + Send> {
        let mut state = self.state.lock().unwrap();
        state.create_calls.push(input.clone());

        Box::new(future::ok(CheckoutSession {
            payment_url: format!("https://pay.example/checkout/{}", input.order_number),
            token: "tok-1".to_string(),
            order_number: input.order_number,
        }))
    }
}
