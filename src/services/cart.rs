use std::collections::HashSet;

use failure::Error as FailureError;
use failure::Fail;
use futures::future;
use futures::future::Either;
use futures::prelude::*;
use futures::stream;
use validator::Validate;

use super::types::ServiceFuture;
use client::cart::CartClient;
use errors::Error;
use models::*;
use repos::GuestCartStore;

/// Service that provides operations for interacting with the session's cart
pub trait CartService {
    /// Get the server cart contents (authenticated sessions only)
    fn get_cart(&self) -> ServiceFuture<Cart>;
    /// Add a variant to whichever cart the session owns
    fn add_item(&self, payload: AddCartItemPayload) -> ServiceFuture<()>;
    /// Set a line's quantity; zero removes the line, absent lines are a no-op
    fn set_quantity(&self, variant_id: VariantId, quantity: Quantity) -> ServiceFuture<()>;
    /// Delete a line from the session's cart
    fn remove_item(&self, variant_id: VariantId) -> ServiceFuture<()>;
    /// Empty the session's cart
    fn clear_cart(&self) -> ServiceFuture<()>;
    /// Migrate guest cart lines into the server cart after login.
    ///
    /// Best-effort and at-most-once: per-line failures are logged, never
    /// retried, and the guest cart is cleared regardless of the outcome.
    /// Callers must serialize invocations - there is no internal lock.
    fn merge_guest_cart(&self) -> ServiceFuture<MergeSummary>;
}

/// Default implementation, dispatching between the guest cart store and
/// the cart API on the session's customer.
pub struct CartServiceImpl<C: CartClient + Clone> {
    client: C,
    guest_cart: GuestCartStore,
    customer: Customer,
}

impl<C: CartClient + Clone> CartServiceImpl<C> {
    pub fn new(client: C, guest_cart: GuestCartStore, customer: Customer) -> Self {
        Self {
            client,
            guest_cart,
            customer,
        }
    }
}

impl<C: CartClient + Clone> CartService for CartServiceImpl<C> {
    fn get_cart(&self) -> ServiceFuture<Cart> {
        debug!("Getting cart for {:?}", self.customer);

        if !self.customer.is_authenticated() {
            return Box::new(future::err(Error::Unauthorized.into()));
        }

        Box::new(
            self.client
                .get_cart()
                .map_err(|e| FailureError::from(e.context(Error::HttpClient))),
        )
    }

    fn add_item(&self, payload: AddCartItemPayload) -> ServiceFuture<()> {
        debug!("Adding {} of variant {} for {:?}", payload.quantity, payload.variant_id, self.customer);

        if let Err(e) = payload.validate() {
            return Box::new(future::err(Error::Validate(e).into()));
        }

        match self.customer {
            Customer::Anonymous => Box::new(future::result(
                self.guest_cart
                    .add(payload.variant_id, payload.quantity)
                    .map_err(FailureError::from),
            )),
            Customer::User(_) => Box::new(
                self.client
                    .add_item(payload)
                    .map(|_| ())
                    .map_err(|e| FailureError::from(e.context(Error::HttpClient))),
            ),
        }
    }

    fn set_quantity(&self, variant_id: VariantId, quantity: Quantity) -> ServiceFuture<()> {
        debug!("Setting quantity of variant {} to {} for {:?}", variant_id, quantity, self.customer);

        match self.customer {
            Customer::Anonymous => Box::new(future::result(
                self.guest_cart.update(variant_id, quantity).map_err(FailureError::from),
            )),
            Customer::User(_) => {
                let client = self.client.clone();
                Box::new(
                    self.client
                        .get_cart()
                        .map_err(|e| FailureError::from(e.context(Error::HttpClient)))
                        .and_then(move |cart| {
                            let found = cart.items.into_iter().find(|item| item.variant_id == variant_id);
                            match found {
                                None => Either::A(future::ok(())),
                                Some(item) => Either::B({
                                    if quantity.0 == 0 {
                                        Either::A(
                                            client
                                                .remove_item(item.id)
                                                .map(|_| ())
                                                .map_err(|e| FailureError::from(e.context(Error::HttpClient))),
                                        )
                                    } else {
                                        Either::B(
                                            client
                                                .set_quantity(item.id, SetQuantityPayload { quantity })
                                                .map(|_| ())
                                                .map_err(|e| FailureError::from(e.context(Error::HttpClient))),
                                        )
                                    }
                                }),
                            }
                        }),
                )
            }
        }
    }

    fn remove_item(&self, variant_id: VariantId) -> ServiceFuture<()> {
        debug!("Removing variant {} for {:?}", variant_id, self.customer);

        match self.customer {
            Customer::Anonymous => Box::new(future::result(
                self.guest_cart.remove(variant_id).map_err(FailureError::from),
            )),
            Customer::User(_) => {
                let client = self.client.clone();
                Box::new(
                    self.client
                        .get_cart()
                        .map_err(|e| FailureError::from(e.context(Error::HttpClient)))
                        .and_then(move |cart| {
                            let found = cart.items.into_iter().find(|item| item.variant_id == variant_id);
                            match found {
                                None => Either::A(future::ok(())),
                                Some(item) => Either::B(
                                    client
                                        .remove_item(item.id)
                                        .map(|_| ())
                                        .map_err(|e| FailureError::from(e.context(Error::HttpClient))),
                                ),
                            }
                        }),
                )
            }
        }
    }

    fn clear_cart(&self) -> ServiceFuture<()> {
        debug!("Clearing cart for {:?}", self.customer);

        match self.customer {
            Customer::Anonymous => Box::new(future::result(self.guest_cart.clear().map_err(FailureError::from))),
            Customer::User(_) => Box::new(
                self.client
                    .clear_cart()
                    .map_err(|e| FailureError::from(e.context(Error::HttpClient))),
            ),
        }
    }

    fn merge_guest_cart(&self) -> ServiceFuture<MergeSummary> {
        if !self.customer.is_authenticated() {
            return Box::new(future::err(Error::Unauthorized.into()));
        }

        let guest_items = self.guest_cart.get();
        if guest_items.is_empty() {
            debug!("Guest cart is empty, nothing to merge");
            return Box::new(future::ok(MergeSummary::default()));
        }

        debug!("Merging {} guest cart lines into the server cart", guest_items.len());

        let client = self.client.clone();
        let guest_cart = self.guest_cart.clone();

        let fut = self
            .client
            .get_cart()
            .then(move |res| {
                let existing: HashSet<VariantId> = match res {
                    Ok(cart) => cart.variant_ids(),
                    Err(e) => {
                        error!("Failed to read server cart, merging against an empty one: {}", e);
                        HashSet::new()
                    }
                };

                // One line at a time, in stored order - the next add only
                // starts after the previous one settled.
                stream::iter_ok::<_, FailureError>(guest_items).fold(MergeSummary::default(), move |mut summary, item| {
                    if existing.contains(&item.variant_id) {
                        // The server cart already has this variant; server
                        // state wins and the guest quantity is dropped.
                        summary.skipped.push(item.variant_id);
                        Either::A(future::ok(summary))
                    } else {
                        let variant_id = item.variant_id.clone();
                        let payload = AddCartItemPayload {
                            variant_id: item.variant_id,
                            quantity: item.quantity,
                        };
                        Either::B(client.add_item(payload).then(move |res| {
                            match res {
                                Ok(_) => summary.merged.push(variant_id),
                                Err(e) => {
                                    error!("Failed to migrate guest cart line {}: {}", variant_id, e);
                                    summary.failed.push(variant_id);
                                }
                            }
                            future::ok::<_, FailureError>(summary)
                        }))
                    }
                })
            })
            .then(move |res| {
                // The guest cart empties no matter how the merge went.
                if let Err(e) = guest_cart.clear() {
                    error!("Failed to clear guest cart after merge: {}", e);
                }
                res
            });

        Box::new(fut)
    }
}
