use tracing_subscriber::EnvFilter;

use crate::config::is_truthy;

pub const DEBUG_ENV: &str = "CONCENTRATION_DEBUG";

pub fn debug_mode_enabled() -> bool {
    std::env::var(DEBUG_ENV).is_ok_and(|value| is_truthy(&value))
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `CONCENTRATION_DEBUG` set.
pub fn init() {
    let default_level = if debug_mode_enabled() { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
