use failure::Error as FailureError;
use failure::Fail;
use futures::future;
use futures::future::Either;
use futures::prelude::*;

use super::types::ServiceFuture;
use client::orders::{LabelAudience, LabelResource, OrdersClient};
use errors::Error;
use models::{Order, OrderNumber, OrderSearchParams, OrdersPage};

/// Facade over the orders API with a consistent error surface for UI
/// consumption.
pub trait OrderService {
    /// Paginated listing. Filter changes reset the page via
    /// `OrderSearchParams` setters before the call.
    fn list_orders(&self, params: OrderSearchParams) -> ServiceFuture<OrdersPage>;
    /// Single order by its public number
    fn get_order(&self, order_number: OrderNumber) -> ServiceFuture<Order>;
    /// Cancel an order and return the refreshed detail.
    ///
    /// Guarded client-side: anything outside PENDING/FAILED fails without
    /// a cancel round trip. Errors propagate to the caller after logging
    /// so chained steps can detect the failure.
    fn cancel_order(&self, order_number: OrderNumber) -> ServiceFuture<Order>;
    /// Shipping label for customer or admin consumption
    fn shipping_label(&self, order_number: OrderNumber, audience: LabelAudience) -> ServiceFuture<LabelResource>;
}

pub struct OrderServiceImpl<C: OrdersClient + Clone> {
    client: C,
}

impl<C: OrdersClient + Clone> OrderServiceImpl<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

impl<C: OrdersClient + Clone> OrderService for OrderServiceImpl<C> {
    fn list_orders(&self, params: OrderSearchParams) -> ServiceFuture<OrdersPage> {
        debug!("Listing orders with {:?}", params);

        Box::new(
            self.client
                .list_orders(params)
                .map_err(|e| FailureError::from(e.context(Error::HttpClient))),
        )
    }

    fn get_order(&self, order_number: OrderNumber) -> ServiceFuture<Order> {
        debug!("Getting order {}", order_number);

        Box::new(
            self.client
                .get_order(order_number)
                .map_err(|e| FailureError::from(e.context(Error::HttpClient))),
        )
    }

    fn cancel_order(&self, order_number: OrderNumber) -> ServiceFuture<Order> {
        debug!("Cancelling order {}", order_number);

        let client = self.client.clone();
        let fut = self
            .client
            .get_order(order_number.clone())
            .map_err(|e| FailureError::from(e.context(Error::HttpClient)))
            .and_then(move |order| {
                if !order.status.can_cancel() {
                    return Either::A(future::err(Error::NotCancellable(order.status).into()));
                }

                let refresh_client = client.clone();
                Either::B(
                    client
                        .cancel_order(order_number.clone())
                        .and_then(move |_| refresh_client.get_order(order_number))
                        .map_err(|e| FailureError::from(e.context(Error::HttpClient))),
                )
            })
            .map_err(|e| {
                error!("Order cancellation failed: {}", e);
                e
            });

        Box::new(fut)
    }

    fn shipping_label(&self, order_number: OrderNumber, audience: LabelAudience) -> ServiceFuture<LabelResource> {
        debug!("Fetching {:?} shipping label for order {}", audience, order_number);

        Box::new(
            self.client
                .shipping_label(order_number, audience)
                .map_err(|e| FailureError::from(e.context(Error::HttpClient))),
        )
    }
}
