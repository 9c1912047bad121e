use crate::config::DEFAULT_LOG_FILTER;
use tracing_subscriber::EnvFilter;

/// Install the stderr `fmt` subscriber.
///
/// An unparsable `filter` falls back to the default level. Calling this more
/// than once is harmless.
pub fn init(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}
