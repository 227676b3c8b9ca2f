//! # songcritic-logging
//!
//! Two channels of output for a critique submission:
//!
//! - `tracing` diagnostics (payload sizes, raw responses that failed to
//!   parse, tolerated inconsistencies), configured by [`init_tracing`]
//! - [`LogEvent`]s describing the submission lifecycle, printed by a
//!   [`Logger`] and optionally appended to a JSONL file
//!
//! A submission emits, in order: `submission_started`, `media_encoded`
//! (audio only), `request_sent`, `response_received`,
//! `response_inconsistent` (lenient policy only), `critique_rendered`, and
//! finally `submission_finished`. A failure emits `submission_failed`
//! before `submission_finished`.

mod events;

pub use events::{LogEvent, LogFormat, Logger};

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init_tracing(level: &str, format: LogFormat) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);
    let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    match format {
        LogFormat::Json => registry.with(layer.json()).try_init(),
        LogFormat::Compact => registry.with(layer.compact()).try_init(),
        LogFormat::Pretty => registry.with(layer).try_init(),
    }
}
