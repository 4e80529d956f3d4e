//! Optional file logging for embedders
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! embedder's choice. [`init_file_tracing`] is the ready-made one: a lazily created
//! log file, filtered by `RUST_LOG` when set and by the given level otherwise.

mod lazy_file_writer;

use std::path::Path;
use std::path::PathBuf;

pub use lazy_file_writer::LazyFileWriter;
pub use lazy_file_writer::LazyWriter;
use strum::AsRefStr;
use strum::Display;
use strum::EnumString;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::Error;
use crate::error::Result;

/// Log file name used by [`default_log_path`]
const TRACE_LOG_FILE_NAME: &str = "graph_snapshot_trace.log";

/// Tracing levels accepted by [`init_file_tracing`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TracingLevel {
    /// Errors only
    Error,
    /// Malformed configuration and contained faults
    #[default]
    Warn,
    /// Informational
    Info,
    /// Registry setup and per-call summaries
    Debug,
    /// Every cycle and truncation event
    Trace,
}

/// Log file in the system temp directory
#[must_use]
pub fn default_log_path() -> PathBuf { std::env::temp_dir().join(TRACE_LOG_FILE_NAME) }

/// Install a global subscriber writing to `path`
///
/// The file is only created when the first event is written. Fails when a global
/// subscriber is already installed.
pub fn init_file_tracing(path: impl AsRef<Path>, level: TracingLevel) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_ref()));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(LazyFileWriter::new(path.as_ref()))
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Tracing(e.to_string()).into())
}
