//! The polling loop and its failure accounting.
//!
//! The watchdog stays healthy while the consecutive-failure count is at most
//! the configured threshold. The failure that pushes the count past the
//! threshold ends the loop: [`Watchdog::run`] returns a [`GaveUp`] verdict and
//! the caller exits with [`GAVE_UP_EXIT_CODE`].
//!
//! ```text
//! threshold = 3
//! outcomes:  F  F  F  S  F  F  F  F
//! count:     1  2  3  0  1  2  3  4  -> gave up
//! ```

use std::time::Duration;

use crate::config::WatchdogConfig;
use crate::error::Result;
use crate::probe::{Exchange, Probe};

/// Exit status reserved for "the nameserver stopped answering", distinct
/// from the generic failure code a crash would produce.
pub const GAVE_UP_EXIT_CODE: u8 = 128;

/// The loop ended because too many probes in a row failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaveUp {
    /// Consecutive failures at the moment of giving up (threshold + 1).
    pub failures: u64,
}

impl GaveUp {
    /// Process exit status to report.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        GAVE_UP_EXIT_CODE
    }
}

/// Probes a nameserver forever, or until it stops answering.
#[derive(Debug)]
pub struct Watchdog<P> {
    config: WatchdogConfig,
    probe: P,
    failures: u64,
}

impl<P> Watchdog<P> {
    /// Creates a watchdog with a zero failure count.
    #[must_use]
    pub const fn new(config: WatchdogConfig, probe: P) -> Self {
        Self {
            config,
            probe,
            failures: 0,
        }
    }

    /// Current consecutive-failure count.
    #[must_use]
    pub const fn failures(&self) -> u64 {
        self.failures
    }

    /// The configuration this watchdog was built with.
    #[must_use]
    pub const fn config(&self) -> &WatchdogConfig {
        &self.config
    }

    /// Accounts for one probe outcome and logs it.
    ///
    /// A success resets the count; a failure increments it. Returns
    /// `Some` exactly when the count now exceeds the threshold, after
    /// logging the terminal notice. Verbose mode only adds detail to the
    /// log lines; it never changes the returned decision.
    pub fn record(&mut self, outcome: &Result<Exchange>) -> Option<GaveUp> {
        match outcome {
            Ok(exchange) => {
                self.failures = 0;
                if self.config.verbose {
                    tracing::info!(
                        nameserver = %self.config.nameserver,
                        rtt_us = micros(exchange.rtt),
                        answer = %exchange.summary,
                        "Probe answered"
                    );
                }
                None
            }
            Err(e) => {
                self.failures += 1;
                if self.config.verbose {
                    tracing::warn!(
                        nameserver = %self.config.nameserver,
                        failures = self.failures,
                        threshold = self.config.failure_threshold,
                        error = %e,
                        "Fail # {}",
                        self.failures
                    );
                } else {
                    tracing::warn!(
                        nameserver = %self.config.nameserver,
                        failures = self.failures,
                        threshold = self.config.failure_threshold,
                        "Fail # {}",
                        self.failures
                    );
                }

                if self.failures > u64::from(self.config.failure_threshold) {
                    tracing::error!(
                        nameserver = %self.config.nameserver,
                        failures = self.failures,
                        "Reached maximum failure count # {}, exit!",
                        self.failures
                    );
                    return Some(GaveUp {
                        failures: self.failures,
                    });
                }
                None
            }
        }
    }
}

impl<P: Probe> Watchdog<P> {
    /// Runs one probe and records its outcome.
    pub async fn poll_once(&mut self) -> Option<GaveUp> {
        let outcome = self.probe.probe(&self.config.nameserver).await;
        self.record(&outcome)
    }

    /// Polls until the failure threshold is exceeded.
    ///
    /// Never returns while the nameserver keeps answering. No probe is sent
    /// after the one that caused the verdict.
    pub async fn run(mut self) -> GaveUp {
        tracing::info!(
            nameserver = %self.config.nameserver,
            threshold = self.config.failure_threshold,
            interval = ?self.config.poll_interval,
            "Watching DNS server"
        );
        loop {
            if let Some(gave_up) = self.poll_once().await {
                return gave_up;
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }
}

fn micros(rtt: Duration) -> u64 {
    u64::try_from(rtt.as_micros()).unwrap_or(u64::MAX)
}
