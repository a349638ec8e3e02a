//! Non-fatal problems found while loading JSONL data.
//!
//! Resilient loaders skip lines they cannot use and record a [`Warning`] in
//! a [`WarningCollector`] instead of aborting.
//!
//! ```
//! use flowdag_jsonl::warning::{Warning, WarningCollector};
//!
//! let collector = WarningCollector::new();
//! collector.add(Warning::MalformedJson {
//!     line_number: 5,
//!     error: "unexpected end of input".to_string(),
//! });
//! assert_eq!(collector.into_warnings().len(), 1);
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A non-fatal warning raised while reading JSONL data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A non-blank line did not decode into the requested type.
    MalformedJson {
        /// The 1-based line number of the skipped line.
        line_number: usize,
        /// The decode error message.
        error: String,
    },

    /// Reading stopped early at this line, e.g. on an I/O failure.
    SkippedLine {
        /// The 1-based line number that could not be read.
        line_number: usize,
        /// Why the line was skipped.
        reason: String,
    },
}

impl Warning {
    /// Returns the line number associated with this warning.
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::MalformedJson { line_number, .. } | Self::SkippedLine { line_number, .. } => {
                *line_number
            }
        }
    }

    /// Returns a stable identifier for the warning kind.
    ///
    /// ```
    /// use flowdag_jsonl::warning::Warning;
    ///
    /// let warning = Warning::SkippedLine { line_number: 1, reason: "eof".into() };
    /// assert_eq!(warning.kind(), "skipped_line");
    /// ```
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedJson { .. } => "malformed_json",
            Self::SkippedLine { .. } => "skipped_line",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedJson { line_number, error } => {
                write!(f, "line {line_number}: malformed JSON: {error}")
            }
            Self::SkippedLine {
                line_number,
                reason,
            } => write!(f, "line {line_number}: skipped: {reason}"),
        }
    }
}

impl std::error::Error for Warning {}

/// Shared, cloneable sink for [`Warning`]s.
///
/// Clones share the same storage, so a clone can be moved into a stream
/// while the caller keeps a handle to read the warnings afterwards. A
/// poisoned lock is recovered; a warning list has no invariant to break.
#[derive(Debug, Clone, Default)]
pub struct WarningCollector {
    warnings: Arc<Mutex<Vec<Warning>>>,
}

impl WarningCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<Warning>> {
        self.warnings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a warning.
    pub fn add(&self, warning: Warning) {
        tracing::debug!(kind = warning.kind(), line = warning.line_number(), "jsonl warning");
        self.entries().push(warning);
    }

    /// Number of warnings recorded so far, across all clones.
    #[must_use]
    pub fn count(&self) -> usize {
        self.entries().len()
    }

    /// Consumes this handle and returns the recorded warnings.
    ///
    /// Moves the vector out when this is the last handle, clones otherwise.
    #[must_use]
    pub fn into_warnings(self) -> Vec<Warning> {
        match Arc::try_unwrap(self.warnings) {
            Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
            Err(shared) => shared
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }
}
