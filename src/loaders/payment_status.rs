use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::prelude::*;
use failure::Error as FailureError;
use failure::Fail;
use futures::future;
use futures::prelude::*;
use sentry::integrations::failure::capture_error;
use tokio::timer::{Delay, Interval};

use client::payments::{Error as PaymentsError, PaymentsClient};
use config;
use models::{OrderNumber, PaymentStatus, PaymentStatusData};

/// Sink for terminal payment resolutions. The consuming UI navigates to
/// its success/failure view from here; each callback fires at most once
/// per watch.
pub trait PaymentEvents: Send + Sync + 'static {
    fn payment_succeeded(&self, data: &PaymentStatusData);
    fn payment_failed(&self, data: &PaymentStatusData);
}

#[derive(Clone, Debug, PartialEq)]
pub enum PaymentResolution {
    Paid(PaymentStatusData),
    Failed(PaymentStatusData),
}

#[derive(Clone, Debug, PartialEq)]
pub enum CheckOutcome {
    /// Payment still unpaid, keep polling
    Pending,
    /// This check resolved the payment
    Resolved(PaymentResolution),
    /// Another check already resolved the payment
    AlreadyResolved,
    /// The watch was stopped while the check was in flight
    Discarded,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PollEvent {
    Pending,
    Resolved(PaymentResolution),
    CheckFailed,
    Skipped,
}

/// Watches one pending order's payment by polling its status endpoint.
///
/// Clones share state, so any clone serves as a handle for `stop` and
/// `check_now`. Checks are not mutually exclusive - a manual check may
/// race a scheduled one; the first terminal resolution wins and later
/// ones are ignored.
#[derive(Clone)]
pub struct PaymentStatusWatch<C: PaymentsClient + Clone> {
    client: C,
    order_number: OrderNumber,
    events: Arc<PaymentEvents>,
    active: Arc<AtomicBool>,
    resolution: Arc<Mutex<Option<PaymentResolution>>>,
    unpaid_checks: Arc<AtomicUsize>,
    last_checked_at: Arc<Mutex<Option<DateTime<Utc>>>>,
    initial_delay: Duration,
    interval: Duration,
}

impl<C: PaymentsClient + Clone> PaymentStatusWatch<C> {
    pub fn new(
        client: C,
        order_number: OrderNumber,
        events: Arc<PaymentEvents>,
        config: &config::PaymentsPolling,
    ) -> Self {
        Self {
            client,
            order_number,
            events,
            active: Arc::new(AtomicBool::new(true)),
            resolution: Arc::new(Mutex::new(None)),
            unpaid_checks: Arc::new(AtomicUsize::new(0)),
            last_checked_at: Arc::new(Mutex::new(None)),
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            interval: Duration::from_millis(config.interval_ms),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Halts scheduling. A check already in flight has its result
    /// discarded instead of acting on torn-down state.
    pub fn stop(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    pub fn resolution(&self) -> Option<PaymentResolution> {
        self.resolution
            .lock()
            .expect("PaymentStatusWatch: poisoned mutex at resolution")
            .clone()
    }

    /// Non-terminal checks seen so far
    pub fn unpaid_checks(&self) -> usize {
        self.unpaid_checks.load(Ordering::SeqCst)
    }

    pub fn last_checked_at(&self) -> Option<DateTime<Utc>> {
        *self
            .last_checked_at
            .lock()
            .expect("PaymentStatusWatch: poisoned mutex at last_checked_at")
    }

    /// Single out-of-band check. Runs the same transition as a scheduled
    /// tick without resetting or restarting the interval.
    pub fn check_now(&self) -> Box<Future<Item = CheckOutcome, Error = PaymentsError> + Send> {
        self.check_once()
    }

    fn check_once(&self) -> Box<Future<Item = CheckOutcome, Error = PaymentsError> + Send> {
        if !self.is_active() {
            return Box::new(future::ok(self.inactive_outcome()));
        }

        let this = self.clone();
        Box::new(
            self.client
                .payment_status(self.order_number.clone())
                .map(move |data| this.apply(data)),
        )
    }

    fn apply(&self, data: PaymentStatusData) -> CheckOutcome {
        // The continuation may land after teardown; a stopped watch must
        // not act on the result.
        if !self.is_active() {
            return self.inactive_outcome();
        }

        match data.payment_status {
            PaymentStatus::Paid => self.try_resolve(PaymentResolution::Paid(data)),
            PaymentStatus::Failed => self.try_resolve(PaymentResolution::Failed(data)),
            PaymentStatus::Unpaid => {
                self.unpaid_checks.fetch_add(1, Ordering::SeqCst);
                *self
                    .last_checked_at
                    .lock()
                    .expect("PaymentStatusWatch: poisoned mutex at check") = Some(Utc::now());
                CheckOutcome::Pending
            }
        }
    }

    fn inactive_outcome(&self) -> CheckOutcome {
        if self.resolution().is_some() {
            CheckOutcome::AlreadyResolved
        } else {
            CheckOutcome::Discarded
        }
    }

    /// First terminal resolution wins; racing checks cannot notify twice.
    fn try_resolve(&self, resolution: PaymentResolution) -> CheckOutcome {
        {
            let mut guard = self
                .resolution
                .lock()
                .expect("PaymentStatusWatch: poisoned mutex at resolve");
            if guard.is_some() {
                return CheckOutcome::AlreadyResolved;
            }
            *guard = Some(resolution.clone());
        }
        self.active.store(false, Ordering::SeqCst);

        match resolution {
            PaymentResolution::Paid(ref data) => {
                info!("Order {} payment resolved: paid", data.order_number);
                self.events.payment_succeeded(data);
            }
            PaymentResolution::Failed(ref data) => {
                info!("Order {} payment resolved: failed", data.order_number);
                self.events.payment_failed(data);
            }
        }

        CheckOutcome::Resolved(resolution)
    }

    /// Drives checks from an external tick source. Production wires real
    /// timers via `start`; tests feed synthetic ticks to simulate time.
    /// The stream ends once the watch goes inactive.
    pub fn poll_on<S>(self, ticks: S) -> impl Stream<Item = PollEvent, Error = FailureError>
    where
        S: Stream<Item = (), Error = FailureError>,
    {
        let gate = self.clone();
        ticks
            .take_while(move |_| future::ok(gate.is_active()))
            .and_then(move |_| {
                self.check_once().then(|res| match res {
                    Ok(CheckOutcome::Pending) => future::ok(PollEvent::Pending),
                    Ok(CheckOutcome::Resolved(resolution)) => future::ok(PollEvent::Resolved(resolution)),
                    Ok(CheckOutcome::AlreadyResolved) | Ok(CheckOutcome::Discarded) => future::ok(PollEvent::Skipped),
                    Err(e) => {
                        // Transient check failures never escalate to the
                        // terminal failed state; the next tick retries.
                        let err = FailureError::from(e.context("payment status check failed"));
                        error!("{:?}", &err);
                        capture_error(&err);
                        future::ok(PollEvent::CheckFailed)
                    }
                })
            })
    }

    /// Schedules the first check after the configured initial delay, then
    /// keeps checking on the configured interval until the payment
    /// resolves or the watch is stopped.
    pub fn start(self) -> Box<Stream<Item = PollEvent, Error = FailureError> + Send> {
        info!(
            "PaymentStatusWatch started for order {} with initial delay {:?} and interval {:?}",
            self.order_number, self.initial_delay, self.interval
        );

        let first_at = Instant::now() + self.initial_delay;
        let first = Delay::new(first_at)
            .map(|_| ())
            .map_err(|e| FailureError::from(e.context("timer creation error")))
            .into_stream();
        let rest = Interval::new(first_at + self.interval, self.interval)
            .map(|_| ())
            .map_err(|e| FailureError::from(e.context("timer creation error")));

        Box::new(self.poll_on(first.chain(rest)))
    }
}
