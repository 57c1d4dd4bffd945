//! Shared HTTP client.
//!
//! A single `Client` owns the hyper connection pool and is driven on the
//! reactor via `stream()`; any number of cheap `ClientHandle` clones feed
//! it requests through a bounded channel and get the response back over a
//! oneshot callback. Handles are `Send + Sync`, so API clients built on
//! top of them can cross thread boundaries freely.

use std::fmt;
use std::time::Duration;

use futures::future;
use futures::prelude::*;
use futures::sync::{mpsc, oneshot};
use hyper;
use hyper::client::HttpConnector;
use hyper::header::{ContentLength, ContentType, Headers};
use hyper::{Method, Request, StatusCode, Uri};
use hyper_tls::HttpsConnector;
use serde::de::DeserializeOwned;
use serde_json;
use tokio::timer::Timeout;
use tokio_core::reactor::Handle;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub http_client_retries: usize,
    pub http_client_buffer_size: usize,
    pub timeout_duration_ms: u64,
    pub dns_worker_thread_count: usize,
}

/// Structured error body the backend returns for non-2xx responses.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ApiErrorPayload {
    pub status: String,
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
    #[serde(default)]
    pub errors: Option<serde_json::Value>,
}

#[derive(Clone, Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub payload: Option<ApiErrorPayload>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.payload {
            Some(ref payload) => write!(f, "{}: {}", self.status, payload.message),
            None => write!(f, "{}", self.status),
        }
    }
}

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "http client error - bad request url: {}", _0)]
    Uri(String),
    #[fail(display = "http client error - network failure: {}", _0)]
    Network(String),
    #[fail(display = "http client error - api responded {}", _0)]
    Api(ApiError),
    #[fail(display = "http client error - unable to parse response: {}", _0)]
    Parse(String),
    #[fail(display = "http client error - request timed out")]
    Timeout,
    #[fail(display = "http client error - request queue is gone")]
    ChannelClosed,
}

struct Payload {
    method: Method,
    url: String,
    body: Option<String>,
    headers: Option<Headers>,
    callback: oneshot::Sender<Result<Vec<u8>, Error>>,
}

/// Interface of the shared HTTP client as seen by API clients.
pub trait HttpClient: Send + Sync + 'static {
    fn request_bytes(
        &self,
        method: Method,
        url: String,
        body: Option<String>,
        headers: Option<Headers>,
    ) -> Box<Future<Item = Vec<u8>, Error = Error> + Send>;

    fn request_json<T>(
        &self,
        method: Method,
        url: String,
        body: Option<String>,
        headers: Option<Headers>,
    ) -> Box<Future<Item = T, Error = Error> + Send>
    where
        T: DeserializeOwned + Send + 'static,
        Self: Sized,
    {
        Box::new(self.request_bytes(method, url, body, headers).and_then(|bytes| {
            // Empty bodies stand in for JSON null so `()` endpoints parse.
            let result = if bytes.is_empty() {
                serde_json::from_slice(b"null")
            } else {
                serde_json::from_slice(&bytes)
            };
            result.map_err(|e| Error::Parse(format!("{}", e)))
        }))
    }
}

pub struct Client {
    client: hyper::Client<HttpsConnector<HttpConnector>>,
    handle: Handle,
    tx: mpsc::Sender<Payload>,
    rx: mpsc::Receiver<Payload>,
    max_retries: usize,
    timeout_duration: Duration,
}

impl Client {
    pub fn new(config: &Config, handle: &Handle) -> Self {
        let connector = HttpsConnector::new(config.dns_worker_thread_count, handle)
            .expect("Unexpected error creating TLS connector");
        let client = hyper::Client::configure().connector(connector).build(handle);
        let (tx, rx) = mpsc::channel::<Payload>(config.http_client_buffer_size);
        Self {
            client,
            handle: handle.clone(),
            tx,
            rx,
            max_retries: config.http_client_retries,
            timeout_duration: Duration::from_millis(config.timeout_duration_ms),
        }
    }

    pub fn handle(&self) -> ClientHandle {
        ClientHandle {
            tx: self.tx.clone(),
            max_retries: self.max_retries,
        }
    }

    /// Stream that executes queued requests. Must be spawned on the reactor
    /// the client was created with.
    pub fn stream(self) -> Box<Stream<Item = (), Error = ()>> {
        let Client {
            client,
            handle,
            rx,
            timeout_duration,
            ..
        } = self;

        Box::new(rx.map(move |payload| {
            Self::dispatch(&client, &handle, timeout_duration, payload);
        }))
    }

    fn dispatch(
        client: &hyper::Client<HttpsConnector<HttpConnector>>,
        handle: &Handle,
        timeout_duration: Duration,
        payload: Payload,
    ) {
        let Payload {
            method,
            url,
            body,
            headers,
            callback,
        } = payload;

        let uri = match url.parse::<Uri>() {
            Ok(uri) => uri,
            Err(_) => {
                let _ = callback.send(Err(Error::Uri(url)));
                return;
            }
        };

        let mut req = Request::new(method, uri);
        if let Some(headers) = headers {
            *req.headers_mut() = headers;
        }
        if let Some(body) = body {
            req.headers_mut().set(ContentType::json());
            req.headers_mut().set(ContentLength(body.len() as u64));
            req.set_body(body);
        }

        let work = client.request(req).and_then(|res| {
            let status = res.status();
            res.body().concat2().map(move |chunk| (status, chunk))
        });

        let work = Timeout::new(work, timeout_duration).then(move |res| {
            let outcome = match res {
                Ok((status, chunk)) => {
                    if status.is_success() {
                        Ok(chunk.to_vec())
                    } else {
                        let payload = serde_json::from_slice::<ApiErrorPayload>(&chunk).ok();
                        Err(Error::Api(ApiError { status, payload }))
                    }
                }
                Err(timeout_error) => {
                    if timeout_error.is_elapsed() {
                        Err(Error::Timeout)
                    } else {
                        match timeout_error.into_inner() {
                            Some(hyper_error) => Err(Error::Network(format!("{}", hyper_error))),
                            None => Err(Error::Network("timer failure".to_string())),
                        }
                    }
                }
            };
            let _ = callback.send(outcome);
            future::ok::<(), ()>(())
        });

        handle.spawn(work);
    }
}

#[derive(Clone)]
pub struct ClientHandle {
    tx: mpsc::Sender<Payload>,
    max_retries: usize,
}

impl ClientHandle {
    fn send_request(
        &self,
        method: Method,
        url: String,
        body: Option<String>,
        headers: Option<Headers>,
    ) -> impl Future<Item = Vec<u8>, Error = Error> + Send {
        let (callback, rx) = oneshot::channel::<Result<Vec<u8>, Error>>();
        let payload = Payload {
            method,
            url,
            body,
            headers,
            callback,
        };

        self.tx
            .clone()
            .send(payload)
            .map_err(|_| Error::ChannelClosed)
            .and_then(move |_| rx.map_err(|_| Error::ChannelClosed).and_then(|result| result))
    }
}

impl HttpClient for ClientHandle {
    fn request_bytes(
        &self,
        method: Method,
        url: String,
        body: Option<String>,
        headers: Option<Headers>,
    ) -> Box<Future<Item = Vec<u8>, Error = Error> + Send> {
        debug!("{} {}", method, url);

        let handle = self.clone();
        Box::new(future::loop_fn(self.max_retries, move |retries_left| {
            handle
                .send_request(method.clone(), url.clone(), body.clone(), headers.clone())
                .then(move |res| match res {
                    Ok(response_body) => Ok(future::Loop::Break(response_body)),
                    Err(e) => match e {
                        Error::Network(_) | Error::Timeout if retries_left > 0 => {
                            warn!("Transient http failure, retries left {}: {}", retries_left, e);
                            Ok(future::Loop::Continue(retries_left - 1))
                        }
                        e => Err(e),
                    },
                })
        }))
    }
}
