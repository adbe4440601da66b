//! `SafetyViolation` — the recordable failure structure delivered to the
//! single report sink on a failed check (§4.8/§7).

use std::time::{SystemTime, UNIX_EPOCH};

/// Which sub-check produced a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationCategory {
    DelimiterBalance,
    PatternCompleteness,
    ResultTypeUsage,
    SliceTypeCheck,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// An opaque context blob carried alongside the violation, meaningful only
/// to whatever produced it.
pub type ContextBlob = Vec<u8>;

/// One recorded failure. `message` is capped at 512 bytes per §4.8 —
/// [`SafetyViolation::new`] truncates on construction rather than at the
/// report sink, so every sink sees an already-bounded message.
#[derive(Debug, Clone)]
pub struct SafetyViolation {
    pub category: ViolationCategory,
    pub severity: Severity,
    pub timestamp_nanos: u128,
    pub source_file: String,
    pub source_line: u32,
    pub source_function: String,
    pub message: String,
    pub context: ContextBlob,
}

const MAX_MESSAGE_BYTES: usize = 512;

impl SafetyViolation {
    pub fn new(
        category: ViolationCategory,
        severity: Severity,
        source_file: impl Into<String>,
        source_line: u32,
        source_function: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let mut message = message.into();
        if message.len() > MAX_MESSAGE_BYTES {
            let mut cut = MAX_MESSAGE_BYTES;
            while !message.is_char_boundary(cut) {
                cut -= 1;
            }
            message.truncate(cut);
        }
        SafetyViolation {
            category,
            severity,
            timestamp_nanos: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or(0),
            source_file: source_file.into(),
            source_line,
            source_function: source_function.into(),
            message,
            context: ContextBlob::new(),
        }
    }

    pub fn with_context(mut self, context: ContextBlob) -> Self {
        self.context = context;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_truncated_to_512_bytes() {
        let long = "x".repeat(1000);
        let v = SafetyViolation::new(
            ViolationCategory::SliceTypeCheck,
            Severity::Error,
            "main.lang",
            1,
            "check_slice",
            long,
        );
        assert!(v.message.len() <= 512);
    }

    #[test]
    fn timestamp_is_populated() {
        let v = SafetyViolation::new(
            ViolationCategory::ResultTypeUsage,
            Severity::Warning,
            "main.lang",
            1,
            "check_result_usage",
            "mismatch",
        );
        assert!(v.timestamp_nanos > 0);
    }
}
