//! Tracing setup for hosts embedding the sync core.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a console `fmt` subscriber.
///
/// `RUST_LOG` wins over `level` when set. Returns `false` if a global
/// subscriber is already installed (or `level` is not a valid filter), so
/// calling this more than once is harmless.
pub fn init_tracing(level: &str) -> bool {
    let env_filter = match EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level)) {
        Ok(filter) => filter,
        Err(_) => return false,
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(level, "[hub-sync] Tracing initialized");
    }
    installed
}
