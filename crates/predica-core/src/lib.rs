//! Core runtime for Predica: the predicate tree, the evaluator that folds it,
//! evaluation config, errors, and the metrics sink.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod error;
pub mod eval;
pub mod obs;
pub mod predicate;
pub mod value;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, or config loaders are re-exported here.
///

pub mod prelude {
    pub use crate::{
        predicate::{CompoundPredicate, CompoundPredicateType, Predicate},
        value::{Bindings, Value},
    };
}
