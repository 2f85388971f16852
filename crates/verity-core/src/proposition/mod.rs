//! Propositions: immutable, reusable boolean conditions.
//!
//! A proposition is evaluated against a model and always returns a fresh
//! [`BooleanResult`]. Propositions hold no mutable state, so a [`Spec`] can be
//! cloned and evaluated from any number of threads at once.

mod decorator;
mod leaf;

pub use decorator::{Decorator, MapMetadata, Named};
pub use leaf::Leaf;

use std::ops::{BitAnd, BitOr, BitXor};
use std::sync::Arc;

use crate::assertion::{all_explanations, Assertable};
use crate::combinator::{Binary, Not, Operator};
use crate::description::Description;
use crate::quantifier::{HigherOrder, Quantifier};
use crate::result::BooleanResult;
use crate::{BoxError, EvaluationError};

/// A boolean condition over models of type `T` yielding metadata of type `M`.
pub trait Proposition<T: ?Sized, M>: Send + Sync {
    /// Statement and detailed description of this proposition.
    fn description(&self) -> Description;

    /// Evaluate the proposition against a model.
    ///
    /// # Errors
    ///
    /// Returns an [`EvaluationError`] naming the failing proposition when a
    /// user-supplied predicate or factory fails anywhere in the tree.
    fn is_satisfied_by(&self, model: &T) -> Result<BooleanResult<M>, EvaluationError>;
}

/// Assertion factory applied to each metadata value.
pub(crate) type AssertionFactory<T, M> =
    Arc<dyn Fn(&T, &M) -> Result<String, BoxError> + Send + Sync>;

pub(crate) fn assertion_factory<T, M, F>(factory: F) -> AssertionFactory<T, M>
where
    T: ?Sized,
    F: Fn(&T, &M) -> Result<String, BoxError> + Send + Sync + 'static,
{
    Arc::new(factory)
}

/// Resolve the assertions for a batch of metadata.
///
/// Returns the assertions and whether they explain the outcome on their own.
pub(crate) fn resolve_assertions<T: ?Sized, M: Assertable>(
    model: &T,
    metadata: &[M],
    factory: Option<&AssertionFactory<T, M>>,
) -> Result<(Vec<String>, bool), BoxError> {
    match factory {
        Some(factory) => {
            let assertions = metadata
                .iter()
                .map(|value| factory(model, value))
                .collect::<Result<Vec<_>, _>>()?;
            let explained = !assertions.is_empty();
            Ok((assertions, explained))
        }
        None => Ok((
            metadata.iter().map(Assertable::assertion).collect(),
            all_explanations(metadata),
        )),
    }
}

/// Wrap a user failure with the name of the proposition it came from.
pub(crate) fn failure(statement: &str, source: BoxError) -> EvaluationError {
    tracing::debug!(proposition = %statement, error = %source, "Proposition evaluation failed");
    EvaluationError::new(statement, source)
}

/// Shared handle to a proposition.
///
/// Cheap to clone; supports `&`, `|`, `^` and `!` as well as the
/// short-circuit forms [`and_also`](Spec::and_also) and
/// [`or_else`](Spec::or_else).
pub struct Spec<T: ?Sized, M> {
    inner: Arc<dyn Proposition<T, M>>,
}

impl<T: ?Sized, M> Clone for Spec<T, M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: ?Sized + 'static, M: 'static> Spec<T, M> {
    pub fn new(proposition: impl Proposition<T, M> + 'static) -> Self {
        Self {
            inner: Arc::new(proposition),
        }
    }

    pub fn description(&self) -> Description {
        self.inner.description()
    }

    pub fn is_satisfied_by(&self, model: &T) -> Result<BooleanResult<M>, EvaluationError> {
        self.inner.is_satisfied_by(model)
    }
}

impl<T, M> Spec<T, M>
where
    T: ?Sized + 'static,
    M: Clone + Send + Sync + 'static,
{
    fn binary(&self, operator: Operator, other: &Spec<T, M>) -> Spec<T, M> {
        Spec::new(Binary::new(operator, self.clone(), other.clone()))
    }

    pub fn and(&self, other: &Spec<T, M>) -> Spec<T, M> {
        self.binary(Operator::And, other)
    }

    pub fn or(&self, other: &Spec<T, M>) -> Spec<T, M> {
        self.binary(Operator::Or, other)
    }

    pub fn xor(&self, other: &Spec<T, M>) -> Spec<T, M> {
        self.binary(Operator::Xor, other)
    }

    /// AND that skips `other` when `self` is unsatisfied.
    pub fn and_also(&self, other: &Spec<T, M>) -> Spec<T, M> {
        self.binary(Operator::AndAlso, other)
    }

    /// OR that skips `other` when `self` is satisfied.
    pub fn or_else(&self, other: &Spec<T, M>) -> Spec<T, M> {
        self.binary(Operator::OrElse, other)
    }

    pub fn not(&self) -> Spec<T, M> {
        Spec::new(Not::new(self.clone()))
    }

    /// Give this proposition a name without overriding its metadata.
    pub fn named(&self, statement: impl Into<String>) -> Spec<T, M> {
        Spec::new(Named::new(statement, self.clone()))
    }

    /// Change the metadata type of every result.
    pub fn map_metadata<N, F>(&self, map: F) -> Spec<T, N>
    where
        N: 'static,
        F: Fn(&M) -> N + Send + Sync + 'static,
    {
        Spec::new(MapMetadata::new(self.clone(), map))
    }
}

impl<T, M> Spec<T, M>
where
    T: 'static,
    M: Clone + Send + Sync + 'static,
{
    /// Quantify this proposition over a collection of models.
    pub fn quantify(&self, statement: impl Into<String>, quantifier: Quantifier) -> Spec<[T], M> {
        Spec::new(HigherOrder::new(statement, quantifier, self.clone()))
    }

    pub fn all(&self, statement: impl Into<String>) -> Spec<[T], M> {
        self.quantify(statement, Quantifier::All)
    }

    pub fn any(&self, statement: impl Into<String>) -> Spec<[T], M> {
        self.quantify(statement, Quantifier::Any)
    }

    pub fn none(&self, statement: impl Into<String>) -> Spec<[T], M> {
        self.quantify(statement, Quantifier::NoneSatisfied)
    }

    pub fn at_least(&self, n: usize, statement: impl Into<String>) -> Spec<[T], M> {
        self.quantify(statement, Quantifier::AtLeast(n))
    }

    pub fn at_most(&self, n: usize, statement: impl Into<String>) -> Spec<[T], M> {
        self.quantify(statement, Quantifier::AtMost(n))
    }

    pub fn exactly(&self, n: usize, statement: impl Into<String>) -> Spec<[T], M> {
        self.quantify(statement, Quantifier::Exactly(n))
    }
}

impl<T: ?Sized + 'static, M: 'static> Proposition<T, M> for Spec<T, M> {
    fn description(&self) -> Description {
        self.inner.description()
    }

    fn is_satisfied_by(&self, model: &T) -> Result<BooleanResult<M>, EvaluationError> {
        self.inner.is_satisfied_by(model)
    }
}

macro_rules! spec_operator {
    ($trait:ident, $method:ident, $operator:expr) => {
        impl<T, M> $trait for Spec<T, M>
        where
            T: ?Sized + 'static,
            M: Clone + Send + Sync + 'static,
        {
            type Output = Spec<T, M>;

            fn $method(self, rhs: Self) -> Self::Output {
                Spec::new(Binary::new($operator, self, rhs))
            }
        }

        impl<T, M> $trait for &Spec<T, M>
        where
            T: ?Sized + 'static,
            M: Clone + Send + Sync + 'static,
        {
            type Output = Spec<T, M>;

            fn $method(self, rhs: Self) -> Self::Output {
                self.binary($operator, rhs)
            }
        }
    };
}

spec_operator!(BitAnd, bitand, Operator::And);
spec_operator!(BitOr, bitor, Operator::Or);
spec_operator!(BitXor, bitxor, Operator::Xor);

impl<T, M> std::ops::Not for Spec<T, M>
where
    T: ?Sized + 'static,
    M: Clone + Send + Sync + 'static,
{
    type Output = Spec<T, M>;

    fn not(self) -> Self::Output {
        Spec::new(Not::new(self))
    }
}

impl<T, M> std::ops::Not for &Spec<T, M>
where
    T: ?Sized + 'static,
    M: Clone + Send + Sync + 'static,
{
    type Output = Spec<T, M>;

    fn not(self) -> Self::Output {
        Spec::new(Not::new(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn is_even() -> Spec<i32, String> {
        Spec::new(Leaf::new("is even", |n: &i32| n % 2 == 0))
    }

    fn is_positive() -> Spec<i32, String> {
        Spec::new(Leaf::new("is positive", |n: &i32| *n > 0))
    }

    #[test]
    fn test_leaf_reason_is_negated_statement() {
        let result = is_even().is_satisfied_by(&3).unwrap();
        assert!(!result.satisfied());
        assert_eq!(result.reason(), "!is even");
        assert_eq!(result.metadata(), ["!is even"]);
    }

    #[test]
    fn test_reference_operators() {
        let even = is_even();
        let positive = is_positive();

        let both = &even & &positive;
        let either = &even | &positive;
        let one = &even ^ &positive;
        let neither = !&either;

        assert!(both.is_satisfied_by(&2).unwrap().satisfied());
        assert!(either.is_satisfied_by(&-2).unwrap().satisfied());
        assert!(one.is_satisfied_by(&3).unwrap().satisfied());
        assert!(neither.is_satisfied_by(&-3).unwrap().satisfied());
        assert_eq!(neither.description().statement(), "!(is even | is positive)");
    }

    #[test]
    fn test_named_methods_match_operators() {
        let by_method = is_even().and(&is_positive()).or(&is_even().not());
        let by_operator = (is_even() & is_positive()) | !is_even();
        assert_eq!(by_method.description(), by_operator.description());

        for n in -4..4 {
            assert_eq!(
                by_method.is_satisfied_by(&n).unwrap().reason(),
                by_operator.is_satisfied_by(&n).unwrap().reason()
            );
        }
    }

    #[test]
    fn test_map_metadata_changes_type() {
        let lengths: Spec<i32, usize> = is_even().map_metadata(|text: &String| text.len());
        let result = lengths.is_satisfied_by(&3).unwrap();
        assert_eq!(result.metadata(), [8]);
        assert_eq!(result.reason(), "!is even");
    }

    #[test]
    fn test_specs_evaluate_concurrently() {
        let spec = is_even() & is_positive();

        thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|n| {
                    let spec = spec.clone();
                    scope.spawn(move || spec.is_satisfied_by(&(n * 2 + 2)).unwrap().satisfied())
                })
                .collect();

            for handle in handles {
                assert!(handle.join().unwrap());
            }
        });
    }

    #[test]
    fn test_results_are_fresh_per_evaluation() {
        let spec = is_even() | is_positive();
        let first = spec.is_satisfied_by(&4).unwrap();
        let second = spec.is_satisfied_by(&4).unwrap();
        assert_eq!(first.reason(), second.reason());
        assert_eq!(first.description().detailed(), second.description().detailed());
    }
}
