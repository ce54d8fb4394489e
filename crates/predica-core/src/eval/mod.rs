//! Predicate evaluation.
//!
//! One recursive pass matches on the node kind; there is no per-node virtual
//! dispatch. Recursion depth equals the depth of the predicate tree.

mod config;

pub use config::{CombineMode, EvalConfig};

use crate::{
    error::{PredicateError, UnsupportedFeature},
    obs::sink::{self, MetricsEvent, NodeKind},
    predicate::{CompoundPredicate, CompoundPredicateType, Predicate, PredicateKind},
    value::Bindings,
};

///
/// Evaluator
///
/// Stateless apart from its config, so one evaluator may be shared freely
/// across threads. Thread safety of the wrapped test functions is the
/// caller's concern.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Evaluator {
    config: EvalConfig,
}

impl Evaluator {
    #[must_use]
    pub const fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Evaluate `predicate` against `target` with no substitution variables.
    #[must_use]
    pub fn evaluate<T: ?Sized>(&self, predicate: &Predicate<T>, target: Option<&T>) -> bool {
        self.eval_node(predicate, target, None)
    }

    /// Evaluate `predicate` against `target`, threading `bindings` unchanged
    /// to every test function in the tree.
    ///
    /// Variable substitution is not implemented, so a non-empty binding map
    /// is rejected up front for every predicate kind. `None` and an empty map
    /// evaluate normally.
    pub fn evaluate_with_bindings<T: ?Sized>(
        &self,
        predicate: &Predicate<T>,
        target: Option<&T>,
        bindings: Option<&Bindings>,
    ) -> Result<bool, PredicateError> {
        if bindings.is_some_and(|bindings| !bindings.is_empty()) {
            return Err(PredicateError::unsupported(
                UnsupportedFeature::SubstitutionVariables,
            ));
        }

        Ok(self.eval_node(predicate, target, bindings))
    }

    fn eval_node<T: ?Sized>(
        self,
        predicate: &Predicate<T>,
        target: Option<&T>,
        bindings: Option<&Bindings>,
    ) -> bool {
        match predicate {
            Predicate::Simple(PredicateKind::Constant(value)) => {
                record(NodeKind::Constant);
                *value
            }
            Predicate::Simple(PredicateKind::Test(test)) => {
                if let Some(target) = target {
                    record(NodeKind::Test);
                    test.call(target, bindings)
                } else {
                    // A test applied to no object is false; the function never runs.
                    record(NodeKind::AbsentTarget);
                    false
                }
            }
            Predicate::Compound(compound) => {
                record(NodeKind::Compound(compound.kind()));
                self.eval_compound(compound, target, bindings)
            }
        }
    }

    fn eval_compound<T: ?Sized>(
        self,
        compound: &CompoundPredicate<T>,
        target: Option<&T>,
        bindings: Option<&Bindings>,
    ) -> bool {
        let children = compound.subpredicates();
        let eval = |child: &Predicate<T>| self.eval_node(child, target, bindings);

        match (compound.kind(), self.config.combine) {
            // `&` and `|` on bool do not short-circuit: every child runs.
            (CompoundPredicateType::And, CombineMode::Exhaustive) => {
                children.iter().fold(true, |acc, child| acc & eval(child))
            }
            (CompoundPredicateType::Or, CombineMode::Exhaustive) => {
                children.iter().fold(false, |acc, child| acc | eval(child))
            }
            (CompoundPredicateType::And, CombineMode::ShortCircuit) => children.iter().all(eval),
            (CompoundPredicateType::Or, CombineMode::ShortCircuit) => children.iter().any(eval),

            // NOT arity is fixed to one child at construction.
            (CompoundPredicateType::Not, _) => !eval(&children[0]),
        }
    }
}

fn record(kind: NodeKind) {
    sink::record(MetricsEvent::Evaluate { kind });
}
