mod ast;
mod host;


pub use ast::{CompoundPredicate, CompoundPredicateType, Predicate, PredicateKind, TestFn};
