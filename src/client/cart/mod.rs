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
use models::{AddCartItemPayload, Cart, CartItemId, SetQuantityPayload};

pub trait CartClient: Send + Sync + 'static {
    /// Current server cart of the authenticated user
    fn get_cart(&self) -> Box<Future<Item = Cart, Error = Error> + Send>;
    /// Add a variant to the server cart
    fn add_item(&self, payload: AddCartItemPayload) -> Box<Future<Item = Cart, Error = Error> + Send>;
    /// Overwrite a cart line's quantity
    fn set_quantity(&self, item_id: CartItemId, payload: SetQuantityPayload) -> Box<Future<Item = Cart, Error = Error> + Send>;
    /// Delete a cart line
    fn remove_item(&self, item_id: CartItemId) -> Box<Future<Item = Cart, Error = Error> + Send>;
    /// Drop the whole server cart
    fn clear_cart(&self) -> Box<Future<Item = (), Error = Error> + Send>;
}

#[derive(Clone)]
pub struct CartClientImpl<C: HttpClient + Clone> {
    client: C,
    url: String,
    token: Option<String>,
}

impl<C: HttpClient + Clone + Send> CartClientImpl<C> {
    pub fn new(client: C, url: String, token: Option<String>) -> Self {
        Self { client, url, token }
    }

    fn headers(&self) -> Option<Headers> {
        auth_headers(self.token.as_ref().map(|token| token.as_str()))
    }
}

impl<C: HttpClient + Clone> CartClient for CartClientImpl<C> {
    fn get_cart(&self) -> Box<Future<Item = Cart, Error = Error> + Send> {
        let url = format!("{}/cart", self.url);

        Box::new(
            self.client
                .request_json::<Cart>(Method::Get, url, None, self.headers())
                .map_err(|e| {
                    let kind = ErrorKind::from_http(&e);
                    e.context(kind).into()
                }),
        )
    }

    fn add_item(&self, payload: AddCartItemPayload) -> Box<Future<Item = Cart, Error = Error> + Send> {
        let client = self.client.clone();
        let url = format!("{}/cart/items", self.url);
        let headers = self.headers();

        let fut = serde_json::to_string(&payload)
            .map_err(|e| e.context(ErrorKind::Internal).into())
            .into_future()
            .and_then(move |body| {
                client
                    .request_json::<Cart>(Method::Post, url, Some(body), headers)
                    .map_err(|e| {
                        let kind = ErrorKind::from_http(&e);
                        e.context(kind).into()
                    })
            });

        Box::new(fut)
    }

    fn set_quantity(&self, item_id: CartItemId, payload: SetQuantityPayload) -> Box<Future<Item = Cart, Error = Error> + Send> {
        let client = self.client.clone();
        let url = format!("{}/cart/items/{}", self.url, item_id);
        let headers = self.headers();

        let fut = serde_json::to_string(&payload)
            .map_err(|e| e.context(ErrorKind::Internal).into())
            .into_future()
            .and_then(move |body| {
                client
                    .request_json::<Cart>(Method::Patch, url, Some(body), headers)
                    .map_err(|e| {
                        let kind = ErrorKind::from_http(&e);
                        e.context(kind).into()
                    })
            });

        Box::new(fut)
    }

    fn remove_item(&self, item_id: CartItemId) -> Box<Future<Item = Cart, Error = Error> + Send> {
        let url = format!("{}/cart/items/{}", self.url, item_id);

        Box::new(
            self.client
                .request_json::<Cart>(Method::Delete, url, None, self.headers())
                .map_err(|e| {
                    let kind = ErrorKind::from_http(&e);
                    e.context(kind).into()
                }),
        )
    }

    fn clear_cart(&self) -> Box<Future<Item = (), Error = Error> + Send> {
        let url = format!("{}/cart", self.url);

        Box::new(
            self.client
                .request_json::<()>(Method::Delete, url, None, self.headers())
                .map_err(|e| {
                    let kind = ErrorKind::from_http(&e);
                    e.context(kind).into()
                }),
        )
    }
}
