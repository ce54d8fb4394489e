//! ## Crate layout
//! - `core`: predicate tree, evaluator and config, errors, and metrics.
//!
//! The `prelude` module carries the vocabulary needed to build and evaluate
//! predicates.

pub use predica_core as core;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use predica_core::error::PredicateError as Error;

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::{
        eval::{CombineMode, EvalConfig, Evaluator},
        predicate::{CompoundPredicate, CompoundPredicateType, Predicate},
        value::{Bindings, Value},
    };
}
