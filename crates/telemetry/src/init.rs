// Path: crates/telemetry/src/init.rs
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// The filter used when neither `RUST_LOG` nor a verbosity flag says otherwise.
pub const DEFAULT_FILTER: &str = "info";

/// Maps a repeated `-v` count to a filter directive for the workspace's log targets.
pub fn filter_for_verbosity(verbosity: u8) -> String {
    match verbosity {
        0 => DEFAULT_FILTER.to_string(),
        1 => "info,tx=debug,pipeline=debug,issuance=debug,verify=debug".to_string(),
        _ => "debug,algod=trace,content_store=trace".to_string(),
    }
}

/// Initializes the global `tracing` subscriber for structured JSON logging on stderr.
///
/// `RUST_LOG` wins over `default_filter` when set. Records emitted through the
/// `log` facade are bridged into the same subscriber. Call once per process.
pub fn init_tracing(default_filter: &str) -> Result<(), anyhow::Error> {
    let fmt_layer = fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339());
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;
    let subscriber = Registry::default().with(filter).with(fmt_layer);
    tracing_log::LogTracer::init()?;
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
