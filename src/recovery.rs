//! Recovery strategy for malformed records.
//!
//! Real-world MARC files routinely omit the directory terminator or carry
//! data fields without indicators. [`RecoveryMode`] decides whether such
//! issues fail the record or get logged and collected as warnings.
//! Structural corruption (bad offsets, out-of-bounds fields) is always fatal.

use crate::error::DecodeError;

/// Strategy for handling recoverable decode issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryMode {
    /// Log recoverable issues and keep decoding (default)
    #[default]
    Lenient,
    /// Fail the record on the first recoverable issue
    Strict,
}

/// Collects the recoverable issues seen while decoding one record.
#[derive(Debug, Default)]
pub struct RecoveryContext {
    /// Current recovery mode
    pub mode: RecoveryMode,
    /// Issues that were recovered from, in the order they were met
    pub warnings: Vec<DecodeError>,
}

impl RecoveryContext {
    /// Create a new recovery context with the given mode
    #[must_use]
    pub fn new(mode: RecoveryMode) -> Self {
        RecoveryContext {
            mode,
            warnings: Vec::new(),
        }
    }

    /// Try to recover from an issue based on the recovery mode.
    ///
    /// # Errors
    ///
    /// Returns the issue unchanged in strict mode, or when it is not
    /// recoverable at all. Otherwise it is logged and recorded.
    pub fn recover(&mut self, issue: DecodeError) -> Result<(), DecodeError> {
        if self.mode == RecoveryMode::Strict || !issue.is_recoverable() {
            return Err(issue);
        }
        tracing::warn!(%issue, "recovered from malformed record structure");
        self.warnings.push(issue);
        Ok(())
    }
}
