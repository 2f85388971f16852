//! Logical negation.

use crate::description::Description;
use crate::explanation::{Explanation, NodeKind};
use crate::proposition::{Proposition, Spec};
use crate::result::BooleanResult;
use crate::EvaluationError;

/// Negation of a proposition.
///
/// The operand is always the single cause. Its metadata and reason pass
/// through unchanged: the operand's reason already states the fact that
/// makes the negation hold.
pub struct Not<T: ?Sized, M> {
    operand: Spec<T, M>,
}

impl<T: ?Sized, M> Not<T, M> {
    pub fn new(operand: Spec<T, M>) -> Self {
        Self { operand }
    }
}

impl<T, M> Proposition<T, M> for Not<T, M>
where
    T: ?Sized + 'static,
    M: Clone + Send + Sync + 'static,
{
    fn description(&self) -> Description {
        Description::negate(self.operand.description())
    }

    fn is_satisfied_by(&self, model: &T) -> Result<BooleanResult<M>, EvaluationError> {
        Ok(negate(self.operand.is_satisfied_by(model)?))
    }
}

/// Invert an evaluated result.
pub(crate) fn negate<M: Clone>(operand: BooleanResult<M>) -> BooleanResult<M> {
    let satisfied = !operand.satisfied();
    let explanation = Explanation::composite(
        satisfied,
        NodeKind::Negation,
        vec![operand.shared_explanation()],
    );

    BooleanResult::from_parts(operand.metadata().to_vec(), explanation, vec![operand])
}
