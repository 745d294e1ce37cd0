//! Span constructors and subscriber setup.

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// The filter comes from `RUST_LOG` (default `info`). Setting
/// `SLIRC_LOG_FORMAT=json` switches to JSON lines.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if std::env::var("SLIRC_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Standardized span constructors for client observability.
pub mod spans {
    use tracing::{Span, debug_span, info_span};

    /// Span for one connection attempt, from connect through registration.
    pub fn connection(host: &str, port: u16) -> Span {
        info_span!("connection", host = %host, port = port)
    }

    /// Span for the reader task.
    pub fn reader(host: &str) -> Span {
        info_span!("reader", host = %host)
    }

    /// Span for handling one application event in the binary.
    pub fn event(kind: &str) -> Span {
        debug_span!("event", kind = %kind)
    }
}
