//! Unified diagnostic type shared by the analyzer and the safety
//! validator, per §7's "final diagnostic list" and §4.8's report sink.

use serde::{Deserialize, Serialize};

use crate::analyzer::ast::SourceLocation;
use crate::error::ErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

/// `{severity, code, location {file, line, column}, formatted message}`
/// per §6. `code` is carried by [`ErrorKind`]; `file` is optional since not
/// every diagnostic originates from a source buffer (e.g. a task-core
/// `ThreadError`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: ErrorKind,
    pub file: Option<String>,
    pub location: Option<SourceLocation>,
    pub message: String,
}

impl Diagnostic {
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        Diagnostic {
            severity: Severity::Error,
            kind,
            file: None,
            location: None,
            message,
        }
    }

    pub fn warning(kind: ErrorKind, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            kind,
            file: None,
            location: None,
            message: message.into(),
        }
    }

    pub fn at(mut self, file: impl Into<String>, location: SourceLocation) -> Self {
        self.file = Some(file.into());
        self.location = Some(location);
        self
    }
}

/// A single report sink for diagnostics and safety violations. The
/// analyzer's own accumulator and the safety subsystem's configured sink
/// both implement this so a collaborator can register one sink that sees
/// both.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}
