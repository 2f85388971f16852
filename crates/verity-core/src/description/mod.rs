//! Descriptions of propositions and results.
//!
//! Both proposition definitions and evaluated results are lowered into the
//! same small expression form before rendering, so statements, reasons and
//! detailed breakdowns share one set of layout rules:
//!
//! - same-operator chains are flattened (`a & b & c`)
//! - mixed operators are bracketed only where precedence requires it
//! - negated statements containing reserved punctuation are bracketed
//!   (`!(is true (with brackets))`)

pub(crate) mod render;

use std::fmt;

use crate::combinator::Operator;
use crate::config::RenderConfig;

/// Renderable expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Expr {
    /// Verbatim text. `compound` marks a comma-joined list of assertions.
    Atom { text: String, compound: bool },

    /// Operands joined by a binary operator.
    Group {
        operator: Operator,
        operands: Vec<Expr>,
    },

    /// Logical negation.
    Negate(Box<Expr>),

    /// A named wrapper with nested content (decorators, quantifiers).
    Block { header: Box<Expr>, body: Vec<Expr> },
}

impl Expr {
    pub(crate) fn atom(text: impl Into<String>) -> Self {
        Expr::Atom {
            text: text.into(),
            compound: false,
        }
    }

    /// A list of assertions, comma-joined when there is more than one.
    pub(crate) fn assertions(assertions: &[String]) -> Self {
        Expr::Atom {
            text: assertions.join(", "),
            compound: assertions.len() > 1,
        }
    }

    /// A statement, negated when it does not hold.
    pub(crate) fn statement(statement: &str, satisfied: bool) -> Self {
        let atom = Expr::atom(statement);
        if satisfied {
            atom
        } else {
            Expr::Negate(Box::new(atom))
        }
    }
}

/// Description of a proposition: a one-line statement plus a detailed form
/// that names its sub-propositions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    expr: Expr,
}

impl Description {
    /// Description of a leaf proposition.
    pub fn new(statement: impl Into<String>) -> Self {
        Self {
            expr: Expr::atom(statement),
        }
    }

    pub(crate) fn combine(operator: Operator, left: Description, right: Description) -> Self {
        Self {
            expr: Expr::Group {
                operator,
                operands: vec![left.expr, right.expr],
            },
        }
    }

    pub(crate) fn negate(operand: Description) -> Self {
        Self {
            expr: Expr::Negate(Box::new(operand.expr)),
        }
    }

    /// A named proposition wrapping another one.
    pub(crate) fn wrap(statement: impl Into<String>, inner: Description) -> Self {
        Self {
            expr: Expr::Block {
                header: Box::new(Expr::atom(statement)),
                body: vec![inner.expr],
            },
        }
    }

    /// One-line statement.
    pub fn statement(&self) -> String {
        render::compact(&self.expr)
    }

    /// Multi-line form using the default render configuration.
    pub fn detailed(&self) -> String {
        self.detailed_with(&RenderConfig::default())
    }

    /// Multi-line form using an explicit render configuration.
    pub fn detailed_with(&self, config: &RenderConfig) -> String {
        render::detailed(&self.expr, config)
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.statement())
    }
}
