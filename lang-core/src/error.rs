//! Shared error taxonomy.
//!
//! Every fallible operation in this crate — the Result engine, the safety
//! validator, the analyzer, and the task core — reports through this one
//! enum so a collaborator driving the front end sees a single vocabulary of
//! failure kinds instead of one per subsystem.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Disjoint error kinds, per the allocator/runtime/analyzer taxonomy.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    #[error("allocator returned no memory")]
    OutOfMemory,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("required pointer was null")]
    NullPointer,

    #[error("index or length exceeds container bounds")]
    BoundsCheck,

    #[error("type mismatch: expected type id {expected}, found {found}")]
    TypeMismatch { expected: u32, found: u32 },

    #[error("ownership hint forbade the attempted operation")]
    OwnershipViolation,

    #[error("task primitive failed: {0}")]
    ThreadError(String),

    #[error("external I/O primitive failed: {0}")]
    IoError(String),

    #[error("crypto subsystem error (out of core scope): {0}")]
    CryptoError(String),

    #[error("runtime invariant failure: {0}")]
    RuntimeError(String),

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),

    #[error("invalid syntax: {0}")]
    InvalidSyntax(String),

    #[error("incomplete pattern match: missing {missing:?}")]
    IncompletePattern { missing: Vec<String> },

    #[error("redundant pattern at arm index {index}")]
    RedundantPattern { index: usize },

    #[error("unreachable pattern at arm index {index}")]
    UnreachablePattern { index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_disjoint_by_variant() {
        assert_ne!(ErrorKind::OutOfMemory, ErrorKind::NullPointer);
        assert_eq!(
            ErrorKind::TypeMismatch {
                expected: 1,
                found: 1
            },
            ErrorKind::TypeMismatch {
                expected: 1,
                found: 1
            }
        );
    }

    #[test]
    fn messages_are_human_readable() {
        let e = ErrorKind::DuplicateSymbol("foo".into());
        assert_eq!(e.to_string(), "duplicate symbol: foo");
    }
}
