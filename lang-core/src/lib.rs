//! lang-core — the Result/Match runtime engine, the safety validator, the
//! semantic analyzer substrate, and the task primitives for a
//! statically-typed, ahead-of-time compiled systems language's front end.
//!
//! Out of scope, by design: the lexer and token display tables, AST
//! cloning/destruction walkers, code generation, a CLI driver, and
//! platform threading shims. This crate consumes an AST of
//! declarations/statements/expressions (`analyzer::ast`) and a thread/time
//! primitive (`thread_primitive::ThreadPrimitive`); it exposes Result/Match
//! engine values, resolved symbol tables and type descriptors, and task
//! handles.

pub mod analyzer;
pub mod combinators;
pub mod error;
pub mod match_engine;
pub mod registry;
pub mod result;
pub mod safety;
pub mod task;
pub mod thread_primitive;
pub mod types;

pub use analyzer::Analyzer;
pub use error::ErrorKind;
pub use match_engine::{dispatch, Arm, Pattern};
pub use result::{AnyResult, Ownership, TypeId, ANY_TYPE};
pub use safety::{SafetyConfig, SafetyValidator};
pub use task::{TaskHandle, TaskState};
pub use types::TypeRegistry;

use tracing::info;

/// Initializes the crate's `tracing` subscriber from `RUST_LOG` (falling
/// back to `info`). A collaborator embedding this crate in its own binary
/// is free to install its own subscriber instead and skip this; repeated
/// calls are harmless (the underlying `try_init` only succeeds once).
pub fn init() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    info!("lang-core v{} initialized", env!("CARGO_PKG_VERSION"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_does_not_panic_when_called_more_than_once() {
        init();
        init();
    }

    #[test]
    fn s2_pure_combinator_pipeline_smoke_test() {
        let r = result::ok_i64(2).and_then::<i64, _>(|v| result::ok_i64(v + 1));
        assert_eq!(*r.unwrap_ok::<i64>().unwrap(), 3);
    }
}
