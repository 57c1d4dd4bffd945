use std::sync::Arc;

use futures::future;
use futures::prelude::*;
use tokio_core::reactor::Core;

use client::payments::{PaymentsClient, PaymentsClientImpl};
use config::Config;
use http;
use models::{OrderNumber, PaymentStatusData};

pub mod payment_status;
pub use self::payment_status::*;

/// Events sink that only logs. The storefront UI supplies its own sink to
/// navigate to the success/failure views.
pub struct LogPaymentEvents;

impl PaymentEvents for LogPaymentEvents {
    fn payment_succeeded(&self, data: &PaymentStatusData) {
        info!("Payment for order {} confirmed", data.order_number);
    }

    fn payment_failed(&self, data: &PaymentStatusData) {
        warn!("Payment for order {} failed", data.order_number);
    }
}

/// Watches a single order's payment until it resolves, then returns.
pub fn start_payment_status_watch(config: Config, order_number: OrderNumber) {
    let mut core = Core::new().expect("Unexpected error creating event loop core");
    let handle = core.handle();

    let client = http::client::Client::new(&config.to_http_config(), &handle);
    let client_handle = client.handle();
    let client_stream = client.stream();
    handle.spawn(client_stream.for_each(|_| Ok(())));

    let payments_client = PaymentsClientImpl::new(client_handle, config.api.url.clone(), None);
    let watch = PaymentStatusWatch::new(
        payments_client,
        order_number,
        Arc::new(LogPaymentEvents),
        &config.payments_polling,
    );

    let _ = core.run(create_payment_status_watch(watch));
}

fn create_payment_status_watch<C>(watch: PaymentStatusWatch<C>) -> impl Future<Item = (), Error = ()>
where
    C: PaymentsClient + Clone,
{
    watch
        .start()
        .map(|_| ())
        .or_else(|e| {
            error!("Error in payment status watch: {:?}.", e);
            future::ok(())
        })
        .for_each(|_| future::ok(()))
}
