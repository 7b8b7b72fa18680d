//! Output formatting utilities
//!
//! Human-readable and JSON output for the listing, plus error and warning
//! reporting on stderr.

mod formatter;

pub use formatter::{Formatter, format_entry};

/// Output configuration derived from CLI flags
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Use JSON output format
    pub json: bool,
    /// Disable colored output
    pub no_color: bool,
    /// Suppress non-error output
    pub quiet: bool,
}
