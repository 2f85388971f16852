//! # verity-core
//!
//! Composable boolean propositions with causal, human-readable explanations.
//!
//! Every evaluation answers three questions:
//! - Does the proposition hold?
//! - Which sub-propositions actually caused that outcome?
//! - How do we say so in one line, and in an indented breakdown?
//!
//! ## Key Guarantees
//!
//! 1. **Causal**: explanations attach only the operands that decided the outcome
//! 2. **Deduplicated**: assertion views never repeat a reason
//! 3. **Stateless**: propositions are immutable and can be shared across threads
//! 4. **Faithful errors**: a failing predicate surfaces as one error naming it
//!
//! ## Example
//!
//! ```rust
//! use verity_core::{Leaf, Spec};
//!
//! let is_even: Spec<i32, String> = Spec::new(Leaf::explained(
//!     "is even",
//!     |n: &i32| n % 2 == 0,
//!     "the number is even",
//!     "the number is odd",
//! ));
//! let is_positive: Spec<i32, String> = Spec::new(Leaf::explained(
//!     "is positive",
//!     |n: &i32| *n > 0,
//!     "the number is positive",
//!     "the number is negative",
//! ));
//!
//! let result = (is_even & is_positive).is_satisfied_by(&-3)?;
//! assert!(!result.satisfied());
//! assert_eq!(result.reason(), "the number is odd & the number is negative");
//! # Ok::<(), verity_core::EvaluationError>(())
//! ```

pub mod assertion;
pub mod combinator;
pub mod config;
pub mod description;
pub mod explanation;
pub mod proposition;
pub mod quantifier;
pub mod result;

// Re-export main types at crate root
pub use assertion::Assertable;
pub use combinator::{Binary, CauseSelector, Not, Operator};
pub use config::{ConfigError, RenderConfig};
pub use description::Description;
pub use explanation::Explanation;
pub use proposition::{Decorator, Leaf, MapMetadata, Named, Proposition, Spec};
pub use quantifier::{Evaluation, HigherOrder, Quantifier};
pub use result::{BooleanResult, ResultDescription};

use thiserror::Error;

/// Boxed error raised by user-supplied predicates and factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A user-supplied predicate or factory failed during evaluation.
///
/// Raised only where user code runs and propagated unchanged through every
/// combinator and quantifier above it.
#[derive(Error, Debug)]
#[error("Failed to evaluate proposition '{proposition}': {source}")]
pub struct EvaluationError {
    proposition: String,
    source: BoxError,
}

impl EvaluationError {
    pub fn new(proposition: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            proposition: proposition.into(),
            source: source.into(),
        }
    }

    /// Statement of the proposition that failed.
    pub fn proposition(&self) -> &str {
        &self.proposition
    }
}
