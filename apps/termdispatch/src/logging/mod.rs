//! Structured logging for termdispatch
//!
//! Sets up tracing-based logging for the command line tool. Library users
//! install their own subscriber; the dispatcher only emits events.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system
///
/// This sets up tracing with:
/// - Environment-based filtering via RUST_LOG env var
/// - Default level of INFO in release builds, DEBUG in debug builds
/// - Output on stderr, so rendered command lines on stdout stay clean
///
/// `verbose` raises the crate's own level to TRACE.
pub fn init(verbose: bool) {
    let default_level = if verbose {
        "termdispatch=trace,termdispatch_lib=trace,info"
    } else if cfg!(debug_assertions) {
        "termdispatch=debug,termdispatch_lib=debug,info"
    } else {
        "termdispatch=info,termdispatch_lib=info,warn"
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .compact(),
        )
        .init();
}

/// Initialize logging for tests
///
/// Uses try_init() to avoid panicking if called multiple times.
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new("trace"))
        .with(fmt::layer().with_test_writer())
        .try_init();
}

/// Macro for creating a span with common fields
#[macro_export]
macro_rules! operation_span {
    ($name:expr) => {
        tracing::info_span!($name)
    };
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_does_not_panic() {
        init_test();
        init_test();
    }

    #[test]
    fn test_operation_span() {
        init_test();
        let span = crate::operation_span!("probe", terminal = "xterm");
        let _guard = span.enter();
        tracing::debug!("inside span");
    }
}
