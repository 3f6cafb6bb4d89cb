use mycfg_core::constants::LOG_ENV_VAR;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the stderr subscriber and route `log` records from the core
/// library into it. The filter comes from `MYCFG_LOG`, falling back to
/// `warn` (or `debug` with `--verbose`).
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // Ignore failures: a logger may already be installed (tests)
    let _ = tracing_log::LogTracer::init();
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .try_init();
}
