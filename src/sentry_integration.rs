use std::str::FromStr;

use sentry;
use sentry::integrations::panic::register_panic_handler;
use sentry::internals::ClientInitGuard;
use sentry::Dsn;

use config;

pub fn init(config: Option<&config::SentryConfig>) -> Option<ClientInitGuard> {
    config.map(|sentry_config| {
        info!("Initialized sentry with dsn: {}", &sentry_config.dsn);
        let dsn = Dsn::from_str(&sentry_config.dsn).expect("Failed to parse sentry dsn");
        let guard = sentry::init(dsn);
        register_panic_handler();
        guard
    })
}
