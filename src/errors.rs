use failure::Error as FailureError;
use validator::ValidationErrors;

use http::client::Error as HttpError;
use models::OrderStatus;

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "Not found")]
    NotFound,
    #[fail(display = "Parse error")]
    Parse,
    #[fail(display = "Validation error")]
    Validate(ValidationErrors),
    #[fail(display = "Authentication required")]
    Unauthorized,
    #[fail(display = "Order in state {} cannot be cancelled", _0)]
    NotCancellable(OrderStatus),
    #[fail(display = "Http client error")]
    HttpClient,
}

/// Extracts a human-readable message from an error chain for display.
///
/// Walks the chain looking for a structured API error payload; any error
/// without one collapses to the provided per-operation default.
pub fn display_message(err: &FailureError, default: &str) -> String {
    for cause in err.iter_chain() {
        if let Some(&HttpError::Api(ref api_error)) = cause.downcast_ref::<HttpError>() {
            if let Some(ref payload) = api_error.payload {
                return payload.message.clone();
            }
        }
    }
    default.to_string()
}
