//! Config module contains the top-level config for the app.

use std::env;

use config_crate::{Config as RawConfig, ConfigError, Environment, File};

use http;

enum Env {
    Development,
    Test,
    Production,
}

impl Env {
    fn new() -> Self {
        match env::var("RUN_MODE") {
            Ok(ref s) if s == "test" => Env::Test,
            Ok(ref s) if s == "production" => Env::Production,
            _ => Env::Development,
        }
    }

    fn to_string(&self) -> &'static str {
        match self {
            &Env::Development => "development",
            &Env::Production => "production",
            &Env::Test => "test",
        }
    }
}

/// Basic settings - API base url, HTTP client tuning, polling cadence and
/// the guest cart storage location
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: Api,
    pub client: Client,
    pub payments_polling: PaymentsPolling,
    pub guest_cart: GuestCart,
    pub sentry: Option<SentryConfig>,
}

/// Backend REST API base url
#[derive(Debug, Deserialize, Clone)]
pub struct Api {
    pub url: String,
}

/// Http client settings
#[derive(Debug, Deserialize, Clone)]
pub struct Client {
    pub http_client_retries: usize,
    pub http_client_buffer_size: usize,
    pub timeout_duration_ms: u64,
    pub dns_worker_thread_count: usize,
}

/// Payment status polling cadence
#[derive(Debug, Deserialize, Clone)]
pub struct PaymentsPolling {
    pub initial_delay_ms: u64,
    pub interval_ms: u64,
}

/// Guest cart storage location
#[derive(Debug, Deserialize, Clone)]
pub struct GuestCart {
    pub storage_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SentryConfig {
    pub dsn: String,
}

impl Config {
    /// Creates config from base.toml, which is overwritten by <env>.toml, where
    /// env is one of development, test, production. After that it could be overwritten
    /// by env variables like STOREFRONT_API (this will override the `api` section)
    pub fn new() -> Result<Self, ConfigError> {
        let env = Env::new();
        let mut s = RawConfig::new();

        s.merge(File::with_name("config/base"))?;
        // Optional file specific for environment
        s.merge(File::with_name(&format!("config/{}", env.to_string())).required(false))?;

        // Add in settings from the environment (with a prefix of STOREFRONT)
        s.merge(Environment::with_prefix("STOREFRONT"))?;

        s.try_into()
    }

    pub fn to_http_config(&self) -> http::client::Config {
        http::client::Config {
            http_client_retries: self.client.http_client_retries,
            http_client_buffer_size: self.client.http_client_buffer_size,
            timeout_duration_ms: self.client.timeout_duration_ms,
            dns_worker_thread_count: self.client.dns_worker_thread_count,
        }
    }
}
