pub mod address_stream;

use tracing_subscriber::EnvFilter;

/// Logs to stderr. `RUST_LOG` wins over the default level.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "lettermail_lib=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}
