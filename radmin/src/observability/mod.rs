//! Observability (logging)
//!
//! Diagnostics go to stderr through `tracing` so they never mix with the
//! progress lines the CLI prints on stdout.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging
///
/// Honors `RUST_LOG`. Without it, debug builds log `radmin=debug` and
/// release builds log warnings only.
///
/// # Example
///
/// ```rust,no_run
/// radmin::observability::init();
/// tracing::info!("generator started");
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            EnvFilter::new("info,radmin=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    // A second init (tests, embedding) keeps the first subscriber.
    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();

    if let Err(err) = result {
        tracing::debug!(%err, "logging already initialized");
    }
}
