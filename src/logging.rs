//! Logging initialization utilities.

use env_logger::Env;

/// Initialize logging with a default filter level.
pub fn init() {
    let env = Env::default().default_filter_or("info");
    env_logger::Builder::from_env(env).init();
}

/// Initialize logging from tests; safe to call repeatedly.
pub fn try_init() {
    let env = Env::default().default_filter_or("debug");
    let _ = env_logger::Builder::from_env(env).is_test(true).try_init();
}
