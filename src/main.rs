use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{Level, Subscriber};
use tracing_subscriber::filter::{EnvFilter, FilterExt, Targets};
use tracing_subscriber::layer::Filter;
use tracing_subscriber::{Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use dns_watchdog::config::{DEFAULT_NAMESERVER, DEFAULT_QUERY_NAME};
use dns_watchdog::{Priority, Syslog, UdpProbe, Watchdog, WatchdogConfig};

#[derive(Debug, Parser)]
#[command(name = "dns-watchdog", version)]
#[command(about = "Probe a DNS resolver and exit once it stops answering", long_about = None)]
struct Cli {
    /// IP address and port of the nameserver
    #[arg(short = 'n', long, default_value = DEFAULT_NAMESERVER)]
    nameserver: String,

    /// Syslog severity (EMERG, ALERT, CRIT, ERR, WARNING, NOTICE, INFO, DEBUG)
    #[arg(short = 'y', long, default_value = "NOTICE")]
    severity: String,

    /// Syslog facility (KERN, USER, MAIL, DAEMON, AUTH, SYSLOG, LPR, NEWS, UUCP, CRON, AUTHPRIV, FTP, LOCAL[0-7])
    #[arg(short = 'f', long, default_value = "SYSLOG")]
    facility: String,

    /// Verbose log output
    #[arg(short, long)]
    verbose: bool,

    /// Consecutive failures tolerated before exiting
    #[arg(short = 'c', long = "count", default_value_t = 3)]
    failure_threshold: u32,

    /// Interval between probes, in seconds
    #[arg(short = 's', long = "interval", default_value_t = 1)]
    interval_secs: u64,

    /// Probe timeout, in seconds
    #[arg(short = 't', long = "timeout", default_value_t = 2)]
    timeout_secs: u64,

    /// CHAOS TXT name to query (hostname.bind., version.bind., id.server.)
    #[arg(short = 'q', long = "query", default_value = DEFAULT_QUERY_NAME)]
    query_name: String,
}

impl Cli {
    fn watchdog_config(&self) -> WatchdogConfig {
        WatchdogConfig::new(self.nameserver.clone())
            .with_failure_threshold(self.failure_threshold)
            .with_poll_interval(Duration::from_secs(self.interval_secs))
            .with_query_timeout(Duration::from_secs(self.timeout_secs))
            .with_query_name(self.query_name.clone())
            .with_verbose(self.verbose)
    }
}

/// `RUST_LOG` directives (default `info`), except that this crate's
/// warnings and errors always pass: failures are never silenced.
fn log_filter<S: Subscriber>(directives: Option<&str>) -> impl Filter<S> + use<S> {
    let from_env = directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));
    from_env.or(Targets::new().with_target(env!("CARGO_CRATE_NAME"), Level::WARN))
}

/// Routes events to syslog, or to stderr when syslog is unreachable.
///
/// Returns `true` if syslog is in use.
fn init_logging(priority: Priority) -> bool {
    let syslog = Syslog::open(priority);
    let to_syslog = syslog.is_some();
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::registry()
        .with(syslog.map(|sink| {
            fmt::layer()
                .with_writer(sink)
                .with_ansi(false)
                .without_time()
                .with_level(false)
                .with_target(false)
                .with_filter(log_filter(directives.as_deref()))
        }))
        .with((!to_syslog).then(|| {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(log_filter(directives.as_deref()))
        }))
        .init();

    to_syslog
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let priority = Priority::from_names(&cli.severity, &cli.facility);
    let to_syslog = init_logging(priority);

    if cli.verbose {
        let sink = if to_syslog { "syslog" } else { "stderr" };
        tracing::info!(
            severity = %cli.severity,
            facility = %cli.facility,
            priority = priority.code(),
            sink,
            "Logging configured"
        );
    }

    let config = cli.watchdog_config();
    let probe = match UdpProbe::from_config(&config) {
        Ok(probe) => probe,
        Err(e) => {
            tracing::error!(error = %e, "Cannot start watchdog");
            return ExitCode::FAILURE;
        }
    };

    let gave_up = Watchdog::new(config, probe).run().await;
    ExitCode::from(gave_up.exit_code())
}
