extern crate env_logger;
extern crate storefront_lib;

use std::env;

fn main() {
    env_logger::init();

    let config = storefront_lib::config::Config::new().expect("Can't load app config!");

    // Prepare sentry integration
    let _sentry = storefront_lib::sentry_integration::init(config.sentry.as_ref());

    let order_number = env::args().nth(1).expect("Usage: payment_watch <order-number>");

    storefront_lib::loaders::start_payment_status_watch(config, order_number.into());
}
