//! Storefront is the client-side core of an e-commerce storefront:
//! typed REST clients for the cart, order and payment APIs, a local
//! guest-cart store, cart reconciliation on login, an order facade for
//! UI consumption and a payment-status polling loader.
//!
//! The layered structure of the crate is
//!
//! `UI -> Service -> Client + Store -> HTTP`
//!
//! Each layer only faces errors of its base layers and only exposes its
//! own. E.g. the `Service` layer deals with `Client` and `Store` errors
//! and hands a single `failure::Error` chain to its consumers.

extern crate chrono;
extern crate config as config_crate;
#[macro_use]
extern crate derive_more;
#[macro_use]
extern crate failure;
extern crate futures;
extern crate hyper;
extern crate hyper_tls;
#[macro_use]
extern crate log;
extern crate sentry;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;
extern crate tokio;
extern crate tokio_core;
extern crate uuid;
extern crate validator;
#[macro_use]
extern crate validator_derive;

#[macro_use]
pub mod macros;
pub mod client;
pub mod config;
pub mod errors;
pub mod http;
pub mod loaders;
pub mod models;
pub mod pricing;
pub mod repos;
pub mod sentry_integration;
pub mod services;
