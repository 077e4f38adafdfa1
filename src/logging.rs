use std::io::IsTerminal;
use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `ISSUEDUP_LOG=issuedup=debug`.
pub const LOG_ENV: &str = "ISSUEDUP_LOG";
const DEFAULT_FILTER: &str = "issuedup=info";

static INIT: Once = Once::new();

/// Install the stderr log subscriber. Safe to call more than once.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .with_target(false)
            .init();
    });
}
