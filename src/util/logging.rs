use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the logging system with tracing.
///
/// The `verbose` flag controls whether debug logs are shown; `RUST_LOG`
/// overrides either default.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "reproscope=debug,warn"
    } else {
        "reproscope=info,warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}
