//! Tracing setup for the `budget` binary

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter, e.g. `budget_calc=debug`
pub const LOG_ENV_VAR: &str = "BUDGET_CALC_LOG";

/// Filter used when `BUDGET_CALC_LOG` is unset or invalid
pub const DEFAULT_LOG_FILTER: &str = "budget_calc=warn";

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber, writing to stderr so stdout stays clean
/// for exports
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
