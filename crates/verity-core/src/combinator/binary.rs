//! Binary combinator propositions.

use crate::description::Description;
use crate::proposition::{Proposition, Spec};
use crate::result::BooleanResult;
use crate::EvaluationError;

use super::{combine, Operator};

/// Two propositions joined by a binary operator.
///
/// The short-circuit operators skip the right operand entirely when the left
/// one already decides the outcome.
pub struct Binary<T: ?Sized, M> {
    operator: Operator,
    left: Spec<T, M>,
    right: Spec<T, M>,
}

impl<T: ?Sized, M> Binary<T, M> {
    pub fn new(operator: Operator, left: Spec<T, M>, right: Spec<T, M>) -> Self {
        Self {
            operator,
            left,
            right,
        }
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }
}

impl<T, M> Proposition<T, M> for Binary<T, M>
where
    T: ?Sized + 'static,
    M: Clone + Send + Sync + 'static,
{
    fn description(&self) -> Description {
        Description::combine(
            self.operator,
            self.left.description(),
            self.right.description(),
        )
    }

    fn is_satisfied_by(&self, model: &T) -> Result<BooleanResult<M>, EvaluationError> {
        let left = self.left.is_satisfied_by(model)?;

        if self.operator.short_circuits(left.satisfied()) {
            tracing::trace!(
                operator = self.operator.label(),
                left = left.satisfied(),
                "Left operand decided the outcome, right operand skipped"
            );
            return Ok(combine(self.operator, vec![left]));
        }

        let right = self.right.is_satisfied_by(model)?;
        Ok(combine(self.operator, vec![left, right]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proposition::Leaf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn is_even() -> Spec<i32, String> {
        Spec::new(Leaf::explained(
            "is even",
            |n: &i32| n % 2 == 0,
            "the number is even",
            "the number is odd",
        ))
    }

    fn is_positive() -> Spec<i32, String> {
        Spec::new(Leaf::explained(
            "is positive",
            |n: &i32| *n > 0,
            "the number is positive",
            "the number is negative",
        ))
    }

    fn counting(calls: Arc<AtomicUsize>, result: bool) -> Spec<i32, String> {
        Spec::new(Leaf::new("counted", move |_: &i32| {
            calls.fetch_add(1, Ordering::SeqCst);
            result
        }))
    }

    #[test]
    fn test_and_of_two_failures_names_both() {
        let spec = is_even() & is_positive();
        let result = spec.is_satisfied_by(&-3).unwrap();

        assert!(!result.satisfied());
        assert_eq!(result.reason(), "the number is odd & the number is negative");
        assert_eq!(
            result.description().detailed(),
            "AND\n    the number is odd\n    the number is negative"
        );
    }

    #[test]
    fn test_and_names_only_the_failure() {
        let result = (is_even() & is_positive()).is_satisfied_by(&3).unwrap();
        assert_eq!(result.reason(), "the number is odd");
        assert_eq!(result.metadata(), ["the number is odd"]);
    }

    #[test]
    fn test_or_names_only_the_success() {
        let result = (is_even() | is_positive()).is_satisfied_by(&3).unwrap();
        assert!(result.satisfied());
        assert_eq!(result.reason(), "the number is positive");
    }

    #[test]
    fn test_xor_names_both() {
        let result = (is_even() ^ is_positive()).is_satisfied_by(&4).unwrap();
        assert!(!result.satisfied());
        assert_eq!(result.reason(), "the number is even ^ the number is positive");
    }

    #[test]
    fn test_and_also_skips_right_operand() {
        let calls = Arc::new(AtomicUsize::new(0));
        let spec = is_even().and_also(&counting(calls.clone(), true));

        let result = spec.is_satisfied_by(&3).unwrap();
        assert!(!result.satisfied());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(result.reason(), "the number is odd");

        let result = spec.is_satisfied_by(&4).unwrap();
        assert!(result.satisfied());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.reason(), "the number is even && counted");
    }

    #[test]
    fn test_or_else_skips_right_operand() {
        let calls = Arc::new(AtomicUsize::new(0));
        let spec = is_even().or_else(&counting(calls.clone(), false));

        let result = spec.is_satisfied_by(&2).unwrap();
        assert!(result.satisfied());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(result.underlying().len(), 1);

        let result = spec.is_satisfied_by(&1).unwrap();
        assert!(!result.satisfied());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.reason(), "the number is odd || !counted");
    }

    #[test]
    fn test_description_names_operands() {
        let spec = (is_even() & is_positive()) | !is_even();
        assert_eq!(spec.description().statement(), "is even & is positive | !is even");
        assert_eq!(
            spec.description().detailed(),
            "OR\n    is even & is positive\n    !is even"
        );
    }

    #[test]
    fn test_mixed_precedence_in_reason() {
        let spec = (is_even() | is_positive()) & is_positive();
        let result = spec.is_satisfied_by(&4).unwrap();
        assert_eq!(
            result.reason(),
            "(the number is even | the number is positive) & the number is positive"
        );
    }
}
