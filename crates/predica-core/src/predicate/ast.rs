use crate::{
    error::PredicateError,
    eval::Evaluator,
    obs::sink::{self, MetricsEvent},
    value::Bindings,
};
use std::{
    fmt,
    ops::{BitAnd, BitOr, Not},
    sync::Arc,
};

///
/// Predicate tree
///
/// A predicate is either a simple leaf (a fixed boolean or a caller-supplied
/// test function) or a compound node combining child predicates with AND,
/// OR or NOT. Every node is immutable once built; clones share the test
/// functions and child lists.
///

///
/// TestFn
///
/// Shared handle to a caller-supplied test function.
///

type TestFnInner<T> = dyn Fn(&T, Option<&Bindings>) -> bool + Send + Sync;

pub struct TestFn<T: ?Sized>(Arc<TestFnInner<T>>);

impl<T: ?Sized> TestFn<T> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&T, Option<&Bindings>) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub(crate) fn call(&self, target: &T, bindings: Option<&Bindings>) -> bool {
        (self.0)(target, bindings)
    }
}

impl<T: ?Sized> Clone for TestFn<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> fmt::Debug for TestFn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<fn>")
    }
}

///
/// PredicateKind
///

pub enum PredicateKind<T: ?Sized> {
    Constant(bool),
    Test(TestFn<T>),
}

impl<T: ?Sized> Clone for PredicateKind<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Constant(value) => Self::Constant(*value),
            Self::Test(test) => Self::Test(test.clone()),
        }
    }
}

impl<T: ?Sized> fmt::Debug for PredicateKind<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Self::Test(test) => f.debug_tuple("Test").field(test).finish(),
        }
    }
}

///
/// CompoundPredicateType
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CompoundPredicateType {
    Not,
    And,
    Or,
}

impl fmt::Display for CompoundPredicateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Not => "NOT",
            Self::And => "AND",
            Self::Or => "OR",
        };
        write!(f, "{label}")
    }
}

///
/// CompoundPredicate
///
/// A combinator plus its ordered children. Child order is preserved exactly
/// as given and is the order the evaluator visits them in.
///

pub struct CompoundPredicate<T: ?Sized> {
    kind: CompoundPredicateType,
    subpredicates: Arc<[Predicate<T>]>,
}

impl<T: ?Sized> CompoundPredicate<T> {
    /// Build a compound predicate.
    ///
    /// # Panics
    ///
    /// Panics when `kind` is NOT and `subpredicates` does not hold exactly one
    /// predicate. This is a caller bug, not a runtime condition.
    #[must_use]
    pub fn new(kind: CompoundPredicateType, subpredicates: Vec<Predicate<T>>) -> Self {
        if kind == CompoundPredicateType::Not && subpredicates.len() != 1 {
            sink::record(MetricsEvent::ContractViolation);
            panic!(
                "unsupported predicate count of {} for NOT compound predicate",
                subpredicates.len()
            );
        }

        Self {
            kind,
            subpredicates: subpredicates.into(),
        }
    }

    #[must_use]
    pub fn and(subpredicates: Vec<Predicate<T>>) -> Self {
        Self::new(CompoundPredicateType::And, subpredicates)
    }

    #[must_use]
    pub fn or(subpredicates: Vec<Predicate<T>>) -> Self {
        Self::new(CompoundPredicateType::Or, subpredicates)
    }

    #[must_use]
    pub fn not(subpredicate: Predicate<T>) -> Self {
        Self::new(CompoundPredicateType::Not, vec![subpredicate])
    }

    #[must_use]
    pub const fn kind(&self) -> CompoundPredicateType {
        self.kind
    }

    #[must_use]
    pub fn subpredicates(&self) -> &[Predicate<T>] {
        &self.subpredicates
    }
}

impl<T: ?Sized> Clone for CompoundPredicate<T> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            subpredicates: Arc::clone(&self.subpredicates),
        }
    }
}

impl<T: ?Sized> fmt::Debug for CompoundPredicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompoundPredicate")
            .field("kind", &self.kind)
            .field("subpredicates", &self.subpredicates())
            .finish()
    }
}

///
/// Predicate
///

pub enum Predicate<T: ?Sized> {
    Simple(PredicateKind<T>),
    Compound(CompoundPredicate<T>),
}

impl<T: ?Sized> Predicate<T> {
    /// Predicate that ignores its target and always yields `value`.
    #[must_use]
    pub const fn constant(value: bool) -> Self {
        Self::Simple(PredicateKind::Constant(value))
    }

    /// Predicate backed by a caller-supplied test function.
    ///
    /// The function is only called with a present target; panics raised by it
    /// propagate to the caller of `evaluate`.
    #[must_use]
    pub fn test<F>(f: F) -> Self
    where
        F: Fn(&T, Option<&Bindings>) -> bool + Send + Sync + 'static,
    {
        Self::Simple(PredicateKind::Test(TestFn::new(f)))
    }

    /// See [`CompoundPredicate::new`] for the NOT arity contract.
    #[must_use]
    pub fn compound(kind: CompoundPredicateType, subpredicates: Vec<Self>) -> Self {
        Self::Compound(CompoundPredicate::new(kind, subpredicates))
    }

    #[must_use]
    pub fn and(subpredicates: Vec<Self>) -> Self {
        Self::Compound(CompoundPredicate::and(subpredicates))
    }

    #[must_use]
    pub fn or(subpredicates: Vec<Self>) -> Self {
        Self::Compound(CompoundPredicate::or(subpredicates))
    }

    #[expect(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(subpredicate: Self) -> Self {
        Self::Compound(CompoundPredicate::not(subpredicate))
    }

    #[must_use]
    pub const fn is_compound(&self) -> bool {
        matches!(self, Self::Compound(_))
    }

    #[must_use]
    pub const fn as_compound(&self) -> Option<&CompoundPredicate<T>> {
        match self {
            Self::Compound(compound) => Some(compound),
            Self::Simple(_) => None,
        }
    }

    /// Evaluate against `target` with no substitution variables.
    #[must_use]
    pub fn evaluate(&self, target: Option<&T>) -> bool {
        Evaluator::default().evaluate(self, target)
    }

    /// Evaluate against `target`, threading `bindings` to every test function.
    ///
    /// A non-empty binding map is rejected with
    /// [`UnsupportedFeature::SubstitutionVariables`](crate::error::UnsupportedFeature)
    /// before any node is evaluated.
    pub fn evaluate_with_bindings(
        &self,
        target: Option<&T>,
        bindings: Option<&Bindings>,
    ) -> Result<bool, PredicateError> {
        Evaluator::default().evaluate_with_bindings(self, target, bindings)
    }
}

impl<T: ?Sized> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Simple(kind) => Self::Simple(kind.clone()),
            Self::Compound(compound) => Self::Compound(compound.clone()),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(kind) => fmt::Debug::fmt(kind, f),
            Self::Compound(compound) => fmt::Debug::fmt(compound, f),
        }
    }
}

impl<T: ?Sized> From<CompoundPredicate<T>> for Predicate<T> {
    fn from(compound: CompoundPredicate<T>) -> Self {
        Self::Compound(compound)
    }
}

impl<T: ?Sized> From<bool> for Predicate<T> {
    fn from(value: bool) -> Self {
        Self::constant(value)
    }
}

impl<T: ?Sized> BitAnd for Predicate<T> {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::and(vec![self, rhs])
    }
}

impl<T: ?Sized> BitAnd for &Predicate<T> {
    type Output = Predicate<T>;

    fn bitand(self, rhs: Self) -> Self::Output {
        Predicate::and(vec![self.clone(), rhs.clone()])
    }
}

impl<T: ?Sized> BitOr for Predicate<T> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::or(vec![self, rhs])
    }
}

impl<T: ?Sized> BitOr for &Predicate<T> {
    type Output = Predicate<T>;

    fn bitor(self, rhs: Self) -> Self::Output {
        Predicate::or(vec![self.clone(), rhs.clone()])
    }
}

impl<T: ?Sized> Not for Predicate<T> {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::Compound(CompoundPredicate::not(self))
    }
}

impl<T: ?Sized> Not for &Predicate<T> {
    type Output = Predicate<T>;

    fn not(self) -> Self::Output {
        Predicate::Compound(CompoundPredicate::not(self.clone()))
    }
}
