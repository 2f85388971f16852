//! Logical combinators and causal selection.
//!
//! Each combinator decides its outcome from one or two operand results and
//! then selects the operands that *caused* that outcome. Only causal operands
//! contribute metadata and explanations to the combined result:
//!
//! | Operator | Satisfied               | Unsatisfied             |
//! |----------|-------------------------|-------------------------|
//! | AND      | every operand           | the unsatisfied ones    |
//! | OR       | the satisfied ones      | every operand           |
//! | XOR      | every operand           | every operand           |
//! | NOT      | the operand             | the operand             |
//!
//! The short-circuit forms (AND ALSO, OR ELSE) follow AND and OR over the
//! operands that were actually evaluated.

mod binary;
mod not;

pub use binary::Binary;
pub use not::Not;

pub(crate) use not::negate;

use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor};

use crate::explanation::{Explanation, NodeKind};
use crate::result::BooleanResult;

/// Selects the operands responsible for an outcome.
pub trait CauseSelector {
    /// Indices of the operands that caused `outcome`, given each operand's
    /// own satisfied flag. Never empty unless `operands` is.
    fn select(&self, outcome: bool, operands: &[bool]) -> Vec<usize>;
}

/// Binary logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    And,
    Or,
    Xor,
    AndAlso,
    OrElse,
}

impl Operator {
    /// Infix token used in one-line descriptions.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::And => "&",
            Operator::Or => "|",
            Operator::Xor => "^",
            Operator::AndAlso => "&&",
            Operator::OrElse => "||",
        }
    }

    /// Header used in detailed descriptions.
    pub fn label(self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Xor => "XOR",
            Operator::AndAlso => "AND ALSO",
            Operator::OrElse => "OR ELSE",
        }
    }

    /// Binding strength; higher binds tighter.
    pub(crate) fn precedence(self) -> u8 {
        match self {
            Operator::And => 4,
            Operator::Xor => 3,
            Operator::Or => 2,
            Operator::AndAlso => 1,
            Operator::OrElse => 0,
        }
    }

    /// Apply the operator's truth table.
    pub fn evaluate(self, left: bool, right: bool) -> bool {
        match self {
            Operator::And | Operator::AndAlso => left && right,
            Operator::Or | Operator::OrElse => left || right,
            Operator::Xor => left ^ right,
        }
    }

    /// Whether the left operand alone decides the outcome.
    pub fn short_circuits(self, left: bool) -> bool {
        match self {
            Operator::AndAlso => !left,
            Operator::OrElse => left,
            _ => false,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl CauseSelector for Operator {
    fn select(&self, outcome: bool, operands: &[bool]) -> Vec<usize> {
        match self {
            Operator::And | Operator::AndAlso if outcome => every(operands),
            Operator::And | Operator::AndAlso => matching(operands, false),
            Operator::Or | Operator::OrElse if outcome => matching(operands, true),
            Operator::Or | Operator::OrElse => every(operands),
            Operator::Xor => every(operands),
        }
    }
}

fn every(operands: &[bool]) -> Vec<usize> {
    (0..operands.len()).collect()
}

/// Operands whose flag equals `value`, or all of them when none do.
pub(crate) fn matching(operands: &[bool], value: bool) -> Vec<usize> {
    let selected: Vec<usize> = operands
        .iter()
        .enumerate()
        .filter(|(_, satisfied)| **satisfied == value)
        .map(|(index, _)| index)
        .collect();

    if selected.is_empty() {
        every(operands)
    } else {
        selected
    }
}

/// Combine evaluated operands under `operator`.
///
/// A single operand means the right-hand side was short-circuited.
pub(crate) fn combine<M: Clone>(operator: Operator, operands: Vec<BooleanResult<M>>) -> BooleanResult<M> {
    let flags: Vec<bool> = operands.iter().map(BooleanResult::satisfied).collect();
    let satisfied = flags
        .iter()
        .copied()
        .reduce(|left, right| operator.evaluate(left, right))
        .unwrap_or(false);

    let selected = operator.select(satisfied, &flags);
    let causes: Vec<BooleanResult<M>> = operands
        .into_iter()
        .enumerate()
        .filter(|(index, _)| selected.contains(index))
        .map(|(_, result)| result)
        .collect();

    let metadata = causes
        .iter()
        .flat_map(|cause| cause.metadata().iter().cloned())
        .collect();
    let explanation = Explanation::composite(
        satisfied,
        NodeKind::Operator(operator),
        causes.iter().map(BooleanResult::shared_explanation).collect(),
    );

    BooleanResult::from_parts(metadata, explanation, causes)
}

impl<M: Clone> BitAnd for BooleanResult<M> {
    type Output = BooleanResult<M>;

    fn bitand(self, rhs: Self) -> Self::Output {
        combine(Operator::And, vec![self, rhs])
    }
}

impl<M: Clone> BitOr for BooleanResult<M> {
    type Output = BooleanResult<M>;

    fn bitor(self, rhs: Self) -> Self::Output {
        combine(Operator::Or, vec![self, rhs])
    }
}

impl<M: Clone> BitXor for BooleanResult<M> {
    type Output = BooleanResult<M>;

    fn bitxor(self, rhs: Self) -> Self::Output {
        combine(Operator::Xor, vec![self, rhs])
    }
}

impl<M: Clone> std::ops::Not for BooleanResult<M> {
    type Output = BooleanResult<M>;

    fn not(self) -> Self::Output {
        negate(self)
    }
}
