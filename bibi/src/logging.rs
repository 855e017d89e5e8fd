// Tracing setup for the command-line driver

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Environment variable holding the log filter, e.g. `BIBI_LOG=bibi_interpreter=debug`
pub const LOG_ENV: &str = "BIBI_LOG";

/// Install the global subscriber once.
///
/// `--debug` forces the `debug` level; otherwise the filter comes from
/// `BIBI_LOG` and falls back to `warn`. Events go to stderr so they never mix
/// with program output.
pub fn init_tracing(debug: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        let filter = if debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
        };

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(filter)
            .init();
    });
}
