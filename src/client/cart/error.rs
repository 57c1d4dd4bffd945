use std::fmt;

use failure::{Backtrace, Context, Fail};
use hyper::StatusCode;

use http::client::Error as HttpError;

#[derive(Debug)]
pub struct Error {
    inner: Context<ErrorKind>,
}

#[derive(Clone, Debug, Eq, Fail, PartialEq)]
pub enum ErrorKind {
    #[fail(display = "cart client error - not found")]
    NotFound,
    #[fail(display = "cart client error - unauthorized")]
    Unauthorized,
    #[fail(display = "cart client error - internal error")]
    Internal,
}

impl ErrorKind {
    pub fn from_http(e: &HttpError) -> Self {
        match *e {
            HttpError::Api(ref api_error) => match api_error.status {
                StatusCode::NotFound => ErrorKind::NotFound,
                StatusCode::Unauthorized | StatusCode::Forbidden => ErrorKind::Unauthorized,
                _ => ErrorKind::Internal,
            },
            _ => ErrorKind::Internal,
        }
    }
}

derive_error_impls!();
