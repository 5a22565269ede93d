//! Tracing setup for the CLI binary (grounded on the teacher's
//! `frontend::logger`, adapted from a wasm/web-console writer to a plain
//! terminal one).

use tracing_subscriber::prelude::*;

pub fn init() {
    static LOGGER_INITIALIZED: std::sync::Once = std::sync::Once::new();

    LOGGER_INITIALIZED.call_once(|| {
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

        tracing_subscriber::registry().with(fmt_layer).with(env_filter).init();

        std::panic::set_hook(Box::new(tracing_panic::panic_hook));
    });
}
