//! # dns-watchdog
//!
//! Liveness watchdog for a DNS resolver.
//!
//! The watchdog sends a diagnostic CHAOS-class query (`hostname.bind.` by
//! default) to one nameserver at a fixed interval and counts consecutive
//! failures. Once the count exceeds the configured threshold it logs a final
//! notice and the process exits with status 128, so a supervisor can restart
//! the resolver or page an operator.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use dns_watchdog::{UdpProbe, Watchdog, WatchdogConfig};
//!
//! let config = WatchdogConfig::new("127.0.0.1:53").with_failure_threshold(3);
//! let probe = UdpProbe::from_config(&config)?;
//!
//! // Only returns once the resolver has stopped answering.
//! let gave_up = Watchdog::new(config, probe).run().await;
//! std::process::exit(i32::from(gave_up.exit_code()));
//! ```
//!
//! ## Tolerance window
//!
//! A threshold of `N` tolerates `N` failures in a row and gives up on the
//! `N + 1`-th. Any answer, whatever its content, resets the count.
//!
//! ## Logging
//!
//! Everything goes through `tracing`. The binary routes events to syslog
//! (ident `dns-watchdog`) via [`Syslog`], falling back to stderr when no
//! syslog daemon socket is reachable.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod priority;
pub mod probe;
pub mod syslog;
pub mod util;
pub mod watchdog;

pub use config::WatchdogConfig;
pub use error::{Result, WatchdogError};
pub use priority::Priority;
pub use probe::{Exchange, Probe, UdpProbe};
pub use syslog::Syslog;
pub use watchdog::{GAVE_UP_EXIT_CODE, GaveUp, Watchdog};
