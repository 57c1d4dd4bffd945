use std::sync::{Arc, Mutex};

use failure::Fail;
use futures::future;
use futures::prelude::*;
use hyper::StatusCode;

use super::error::*;
use super::types::*;
use super::OrdersClient;
use http::client::{ApiError, ApiErrorPayload, Error as HttpError};
use models::*;

#[derive(Default)]
struct State {
    orders: Vec<Order>,
    cancel_calls: Vec<OrderNumber>,
    label: Option<LabelResource>,
    cancel_failure_message: Option<String>,
}

/// In-memory stand-in for the orders API with paginated listing.
#[derive(Clone, Default)]
pub struct MockOrdersClient {
    state: Arc<Mutex<State>>,
}

impl MockOrdersClient {
    pub fn seed_order(&self, order: Order) {
        self.state.lock().unwrap().orders.push(order);
    }

    pub fn set_label(&self, label: LabelResource) {
        self.state.lock().unwrap().label = Some(label);
    }

    /// Makes `cancel_order` fail with a structured API error carrying the
    /// given message.
    pub fn fail_cancel_with_message(&self, message: &str) {
        self.state.lock().unwrap().cancel_failure_message = Some(message.to_string());
    }

    pub fn cancel_calls(&self) -> Vec<OrderNumber> {
        self.state.lock().unwrap().cancel_calls.clone()
    }
}

impl OrdersClient for MockOrdersClient {
    fn list_orders(&self, params: OrderSearchParams) -> Box<Future<Item = OrdersPage, Error = Error> + Send> {
        let state = self.state.lock().unwrap();

        let filtered: Vec<Order> = state
            .orders
            .iter()
            .filter(|order| params.status.map(|status| order.status == status).unwrap_or(true))
            .filter(|order| {
                params
                    .search
                    .as_ref()
                    .map(|needle| order.order_number.0.contains(needle.as_str()))
                    .unwrap_or(true)
            })
            .cloned()
            .collect();

        let total = filtered.len() as u32;
        let limit = params.limit.max(1);
        let total_pages = (total + limit - 1) / limit;
        let offset = ((params.page.max(1) - 1) * limit) as usize;
        let items = filtered.into_iter().skip(offset).take(limit as usize).collect();

        Box::new(future::ok(OrdersPage {
            items,
            meta: PageMeta {
                total,
                page: params.page,
                limit,
                total_pages,
            },
        }))
    }

    fn get_order(&self, order_number: OrderNumber) -> Box<Future<Item = Order, Error = Error> + Send> {
        let state = self.state.lock().unwrap();
        let found = state.orders.iter().find(|order| order.order_number == order_number).cloned();

        Box::new(found.ok_or(ErrorKind::NotFound.into()).into_future())
    }

    fn cancel_order(&self, order_number: OrderNumber) -> Box<Future<Item = (), Error = Error> + Send> {
        let mut state = self.state.lock().unwrap();
        state.cancel_calls.push(order_number.clone());

        if let Some(ref message) = state.cancel_failure_message {
            let http_error = HttpError::Api(ApiError {
                status: StatusCode::UnprocessableEntity,
                payload: Some(ApiErrorPayload {
                    status: "error".to_string(),
                    code: Some("ORDER_NOT_CANCELLABLE".to_string()),
                    message: message.clone(),
                    errors: None,
                }),
            });
            return Box::new(future::err(http_error.context(ErrorKind::Internal).into()));
        }

        match state.orders.iter_mut().find(|order| order.order_number == order_number) {
            Some(order) => {
                order.status = OrderStatus::Cancelled;
                Box::new(future::ok(()))
            }
            None => Box::new(future::err(ErrorKind::NotFound.into())),
        }
    }

    fn shipping_label(
        &self,
        _order_number: OrderNumber,
        _audience: LabelAudience,
    ) -> Box<Future<Item = LabelResource, Error = Error> + Send> {
        let state = self.state.lock().unwrap();

        Box::new(state.label.clone().ok_or(ErrorKind::NotFound.into()).into_future())
    }
}
