//! Typed clients for the backend REST collaborators. One module per
//! upstream surface; each exposes a trait, a hyper-backed implementation
//! and an in-memory mock.

pub mod cart;
pub mod orders;
pub mod payments;

use hyper::header::Headers;

/// Bearer-token headers for authenticated endpoints; `None` keeps the
/// request anonymous.
pub fn auth_headers(token: Option<&str>) -> Option<Headers> {
    token.map(|token| {
        let mut headers = Headers::new();
        headers.set_raw("authorization", format!("Bearer {}", token));
        headers
    })
}
