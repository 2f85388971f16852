//! Quantifiers over collections of models.
//!
//! A quantifier maps one proposition across a slice of models and aggregates
//! the count of satisfied results. Causal selection generalizes the binary
//! rules: the children whose outcome equals the quantifier's *decisive* value
//! are causal, falling back to every child when none match.

mod evaluation;
mod higher_order;

pub use evaluation::Evaluation;
pub use higher_order::HigherOrder;

use std::fmt;

use crate::combinator::{matching, CauseSelector};

/// Aggregate predicate over the number of satisfied children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    All,
    Any,
    NoneSatisfied,
    AtLeast(usize),
    AtMost(usize),
    Exactly(usize),
}

impl Quantifier {
    /// Whether `true_count` satisfied children out of `total` satisfy the
    /// quantifier.
    pub fn is_satisfied(self, true_count: usize, total: usize) -> bool {
        match self {
            Quantifier::All => true_count == total,
            Quantifier::Any => true_count >= 1,
            Quantifier::NoneSatisfied => true_count == 0,
            Quantifier::AtLeast(n) => true_count >= n,
            Quantifier::AtMost(n) => true_count <= n,
            Quantifier::Exactly(n) => true_count == n,
        }
    }

    /// The child outcome that explains the aggregate outcome.
    pub fn decisive(self, outcome: bool, true_count: usize) -> bool {
        match self {
            Quantifier::All | Quantifier::Any | Quantifier::AtLeast(_) => outcome,
            Quantifier::NoneSatisfied | Quantifier::AtMost(_) => !outcome,
            Quantifier::Exactly(n) => outcome || true_count > n,
        }
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantifier::All => f.write_str("all"),
            Quantifier::Any => f.write_str("any"),
            Quantifier::NoneSatisfied => f.write_str("none"),
            Quantifier::AtLeast(n) => write!(f, "at least {}", n),
            Quantifier::AtMost(n) => write!(f, "at most {}", n),
            Quantifier::Exactly(n) => write!(f, "exactly {}", n),
        }
    }
}

impl CauseSelector for Quantifier {
    fn select(&self, outcome: bool, operands: &[bool]) -> Vec<usize> {
        let true_count = operands.iter().filter(|satisfied| **satisfied).count();
        matching(operands, self.decisive(outcome, true_count))
    }
}
