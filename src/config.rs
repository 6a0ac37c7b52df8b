//! Watchdog configuration.

use std::time::Duration;

/// Default probe target.
pub const DEFAULT_NAMESERVER: &str = "127.0.0.1:53";

/// Default CHAOS-class TXT name asked of the nameserver.
pub const DEFAULT_QUERY_NAME: &str = "hostname.bind.";

/// Settings read once at startup and never changed afterwards.
///
/// # Example
///
/// ```
/// use dns_watchdog::WatchdogConfig;
/// use std::time::Duration;
///
/// let config = WatchdogConfig::new("10.0.0.53:53")
///     .with_failure_threshold(5)
///     .with_poll_interval(Duration::from_secs(10));
///
/// assert_eq!(config.nameserver, "10.0.0.53:53");
/// assert_eq!(config.failure_threshold, 5);
/// assert!(!config.verbose);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchdogConfig {
    /// Nameserver to probe, as `host:port`.
    pub nameserver: String,

    /// Consecutive failures tolerated. The process gives up on the one after.
    pub failure_threshold: u32,

    /// Delay between the end of one probe and the start of the next.
    pub poll_interval: Duration,

    /// Upper bound for a single probe round trip.
    pub query_timeout: Duration,

    /// Name queried with class CHAOS, type TXT.
    pub query_name: String,

    /// Log round-trip times, answers and probe errors.
    pub verbose: bool,
}

impl WatchdogConfig {
    /// Creates a config with threshold 3, a one second interval and a two
    /// second probe timeout.
    #[must_use]
    pub fn new(nameserver: impl Into<String>) -> Self {
        Self {
            nameserver: nameserver.into(),
            failure_threshold: 3,
            poll_interval: Duration::from_secs(1),
            query_timeout: Duration::from_secs(2),
            query_name: DEFAULT_QUERY_NAME.to_string(),
            verbose: false,
        }
    }

    /// Overrides the failure threshold.
    #[must_use]
    pub const fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold;
        self
    }

    /// Overrides the poll interval.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Overrides the probe timeout.
    #[must_use]
    pub const fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Overrides the queried name.
    #[must_use]
    pub fn with_query_name(mut self, name: impl Into<String>) -> Self {
        self.query_name = name.into();
        self
    }

    /// Enables or disables verbose detail.
    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESERVER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_cli_defaults() {
        let c = WatchdogConfig::default();
        assert_eq!(c.nameserver, "127.0.0.1:53");
        assert_eq!(c.failure_threshold, 3);
        assert_eq!(c.poll_interval, Duration::from_secs(1));
        assert_eq!(c.query_timeout, Duration::from_secs(2));
        assert_eq!(c.query_name, "hostname.bind.");
        assert!(!c.verbose);
    }

    #[test]
    fn builders_override() {
        let c = WatchdogConfig::new("[::1]:5353")
            .with_failure_threshold(0)
            .with_poll_interval(Duration::ZERO)
            .with_query_timeout(Duration::from_millis(250))
            .with_query_name("version.bind.")
            .with_verbose(true);
        assert_eq!(c.nameserver, "[::1]:5353");
        assert_eq!(c.failure_threshold, 0);
        assert_eq!(c.poll_interval, Duration::ZERO);
        assert_eq!(c.query_timeout, Duration::from_millis(250));
        assert_eq!(c.query_name, "version.bind.");
        assert!(c.verbose);
    }
}
