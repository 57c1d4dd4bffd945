mod error;
pub mod mock;
mod types;

pub use self::error::*;
pub use self::types::*;

use failure::Fail;
use futures::prelude::*;
use hyper::header::Headers;
use hyper::Method;
use serde_json;

use super::auth_headers;
use http::client::HttpClient;
use models::{Order, OrderNumber, OrderSearchParams, OrdersPage};

pub trait OrdersClient: Send + Sync + 'static {
    /// Paginated order listing with optional status/search filters
    fn list_orders(&self, params: OrderSearchParams) -> Box<Future<Item = OrdersPage, Error = Error> + Send>;
    /// Single order by its public number
    fn get_order(&self, order_number: OrderNumber) -> Box<Future<Item = Order, Error = Error> + Send>;
    /// Request cancellation of an order
    fn cancel_order(&self, order_number: OrderNumber) -> Box<Future<Item = (), Error = Error> + Send>;
    /// Shipping label, as bytes or a redirect url
    fn shipping_label(
        &self,
        order_number: OrderNumber,
        audience: LabelAudience,
    ) -> Box<Future<Item = LabelResource, Error = Error> + Send>;
}

#[derive(Clone)]
pub struct OrdersClientImpl<C: HttpClient + Clone> {
    client: C,
    url: String,
    token: Option<String>,
}

impl<C: HttpClient + Clone + Send> OrdersClientImpl<C> {
    pub fn new(client: C, url: String, token: Option<String>) -> Self {
        Self { client, url, token }
    }

    fn headers(&self) -> Option<Headers> {
        auth_headers(self.token.as_ref().map(|token| token.as_str()))
    }
}

impl<C: HttpClient + Clone> OrdersClient for OrdersClientImpl<C> {
    fn list_orders(&self, params: OrderSearchParams) -> Box<Future<Item = OrdersPage, Error = Error> + Send> {
        let url = format!("{}/orders?{}", self.url, list_query(&params));

        Box::new(
            self.client
                .request_json::<OrdersPage>(Method::Get, url, None, self.headers())
                .map_err(|e| {
                    let kind = ErrorKind::from_http(&e);
                    e.context(kind).into()
                }),
        )
    }

    fn get_order(&self, order_number: OrderNumber) -> Box<Future<Item = Order, Error = Error> + Send> {
        let url = format!("{}/orders/{}", self.url, order_number);

        Box::new(
            self.client
                .request_json::<Order>(Method::Get, url, None, self.headers())
                .map_err(|e| {
                    let kind = ErrorKind::from_http(&e);
                    e.context(kind).into()
                }),
        )
    }

    fn cancel_order(&self, order_number: OrderNumber) -> Box<Future<Item = (), Error = Error> + Send> {
        let url = format!("{}/orders/{}/cancel", self.url, order_number);

        Box::new(
            self.client
                .request_json::<()>(Method::Post, url, None, self.headers())
                .map_err(|e| {
                    let kind = ErrorKind::from_http(&e);
                    e.context(kind).into()
                }),
        )
    }

    fn shipping_label(
        &self,
        order_number: OrderNumber,
        audience: LabelAudience,
    ) -> Box<Future<Item = LabelResource, Error = Error> + Send> {
        let url = match audience {
            LabelAudience::Customer => format!("{}/orders/{}/shipping-label", self.url, order_number),
            LabelAudience::Admin => format!("{}/admin/orders/{}/shipping-label", self.url, order_number),
        };

        Box::new(
            self.client
                .request_bytes(Method::Get, url, None, self.headers())
                .map_err(|e| {
                    let kind = ErrorKind::from_http(&e);
                    e.context(kind).into()
                })
                .map(|bytes| disambiguate_label(bytes)),
        )
    }
}

/// Type guard over the label response shape: a `{type:"url"}` object is a
/// redirect, anything else is the document itself.
fn disambiguate_label(bytes: Vec<u8>) -> LabelResource {
    match serde_json::from_slice::<LabelUrlObject>(&bytes) {
        Ok(ref object) if object.kind == "url" => LabelResource::Url(object.url.clone()),
        _ => LabelResource::Document(bytes),
    }
}

fn list_query(params: &OrderSearchParams) -> String {
    let mut query = format!("page={}&limit={}", params.page, params.limit);
    if let Some(status) = params.status {
        query.push_str(&format!("&status={}", status.code()));
    }
    if let Some(ref search) = params.search {
        query.push_str(&format!("&search={}", encode_component(search)));
    }
    query
}

fn encode_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.as_bytes() {
        match *byte {
            b'A'...b'Z' | b'a'...b'z' | b'0'...b'9' | b'-' | b'_' | b'.' | b'~' => out.push(*byte as char),
            other => out.push_str(&format!("%{:02X}", other)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::OrderStatus;

    #[test]
    fn query_includes_only_set_filters() {
        let params = OrderSearchParams::default();
        assert_eq!(list_query(&params), "page=1&limit=10");

        let params = params.with_status(Some(OrderStatus::Paid)).with_search(Some("blue shoes".to_string()));
        assert_eq!(list_query(&params), "page=1&limit=10&status=PAID&search=blue%20shoes");
    }

    #[test]
    fn label_type_guard() {
        let url_body = br#"{"type":"url","url":"https://cdn.example/label.pdf","message":"ok"}"#.to_vec();
        assert_eq!(
            disambiguate_label(url_body),
            LabelResource::Url("https://cdn.example/label.pdf".to_string())
        );

        let pdf_body = b"%PDF-1.4 binary".to_vec();
        assert_eq!(disambiguate_label(pdf_body.clone()), LabelResource::Document(pdf_body));

        // JSON, but not a url object - still treated as the document
        let other_json = br#"{"type":"inline","data":"zz"}"#.to_vec();
        assert_eq!(disambiguate_label(other_json.clone()), LabelResource::Document(other_json));
    }
}
