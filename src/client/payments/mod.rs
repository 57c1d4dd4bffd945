mod error;
pub mod mock;

pub use self::error::*;

use failure::Fail;
use futures::prelude::*;
use hyper::header::Headers;
use hyper::Method;
use serde_json;

use super::auth_headers;
use http::client::HttpClient;
use models::{CheckoutSession, CreatePayment, OrderNumber, PaymentStatusData};

pub trait PaymentsClient: Send + Sync + 'static {
    /// Current payment status of an order
    fn payment_status(&self, order_number: OrderNumber) -> Box<Future<Item = PaymentStatusData, Error = Error> + Send>;
    /// Start a checkout session at the payment gateway
    fn create_payment(&self, input: CreatePayment) -> Box<Future<Item = CheckoutSession, Error = Error> + Send>;
}

#[derive(Clone)]
pub struct PaymentsClientImpl<C: HttpClient + Clone> {
    client: C,
    url: String,
    token: Option<String>,
}

impl<C: HttpClient + Clone + Send> PaymentsClientImpl<C> {
    pub fn new(client: C, url: String, token: Option<String>) -> Self {
        Self { client, url, token }
    }

    fn headers(&self) -> Option<Headers> {
        auth_headers(self.token.as_ref().map(|token| token.as_str()))
    }
}

impl<C: HttpClient + Clone> PaymentsClient for PaymentsClientImpl<C> {
    fn payment_status(&self, order_number: OrderNumber) -> Box<Future<Item = PaymentStatusData, Error = Error> + Send> {
        let url = format!("{}/payments/{}/status", self.url, order_number);

        Box::new(
            self.client
                .request_json::<PaymentStatusData>(Method::Get, url, None, self.headers())
                .map_err(|e| {
                    let kind = ErrorKind::from_http(&e);
                    e.context(kind).into()
                }),
        )
    }

    fn create_payment(&self, input: CreatePayment) -> Box<Future<Item = CheckoutSession, Error = Error> + Send> {
        let client = self.client.clone();
        let url = format!("{}/payments", self.url);
        let headers = self.headers();

        let fut = serde_json::to_string(&input)
            .map_err(|e| e.context(ErrorKind::Internal).into())
            .into_future()
            .and_then(move |body| {
                client
                    .request_json::<CheckoutSession>(Method::Post, url, Some(body), headers)
                    .map_err(|e| {
                        let kind = ErrorKind::from_http(&e);
                        e.context(kind).into()
                    })
            });

        Box::new(fut)
    }
}
