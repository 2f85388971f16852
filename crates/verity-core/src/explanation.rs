//! Explanation trees.
//!
//! An [`Explanation`] records why a result holds: the node's own assertions
//! and the explanations of its *causal* operands only. Operands that were
//! evaluated but did not decide the outcome are never attached, so every
//! traversal answers "why" with the minimal set of reasons.
//!
//! Nodes are built bottom-up during evaluation and shared through `Arc`, so a
//! parent owns its children and cycles cannot occur.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;

use crate::combinator::Operator;
use crate::config::RenderConfig;
use crate::description::{render, Expr};

/// How a node contributes to the rendered description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NodeKind {
    /// A leaf or a decorator: rendered as its assertions when they explain
    /// themselves, otherwise as its (possibly negated) statement.
    Atom { statement: String, explained: bool },

    /// A binary combinator over its causal operands.
    Operator(Operator),

    /// A negation; the operand's reason already states the fact.
    Negation,

    /// A quantifier over a collection of models.
    Quantifier { statement: String, explained: bool },
}

/// The explanation attached to every evaluated result.
#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    satisfied: bool,
    assertions: Vec<String>,
    underlying: Vec<Arc<Explanation>>,
    #[serde(skip)]
    kind: NodeKind,
}

impl Explanation {
    /// A node that owns its assertions (leaf or decorator).
    pub(crate) fn atom(
        satisfied: bool,
        statement: impl Into<String>,
        explained: bool,
        assertions: Vec<String>,
        underlying: Vec<Arc<Explanation>>,
    ) -> Self {
        Self {
            satisfied,
            assertions: distinct(assertions),
            underlying,
            kind: NodeKind::Atom {
                statement: statement.into(),
                explained,
            },
        }
    }

    /// A combinator node. Its assertions are the union of its causes'.
    pub(crate) fn composite(
        satisfied: bool,
        kind: NodeKind,
        underlying: Vec<Arc<Explanation>>,
    ) -> Self {
        let assertions = distinct(
            underlying
                .iter()
                .flat_map(|cause| cause.assertions.iter().cloned()),
        );

        Self {
            satisfied,
            assertions,
            underlying,
            kind,
        }
    }

    /// A quantifier node with its own summary assertions.
    pub(crate) fn quantified(
        satisfied: bool,
        statement: impl Into<String>,
        explained: bool,
        assertions: Vec<String>,
        underlying: Vec<Arc<Explanation>>,
    ) -> Self {
        Self {
            satisfied,
            assertions: distinct(assertions),
            underlying,
            kind: NodeKind::Quantifier {
                statement: statement.into(),
                explained,
            },
        }
    }

    /// Whether the explained result was satisfied.
    pub fn satisfied(&self) -> bool {
        self.satisfied
    }

    /// This node's own assertions, deduplicated, in evaluation order.
    pub fn assertions(&self) -> &[String] {
        &self.assertions
    }

    /// Explanations of the causal operands.
    pub fn underlying(&self) -> &[Arc<Explanation>] {
        &self.underlying
    }

    /// Whether this node has no causal operands.
    pub fn is_leaf(&self) -> bool {
        self.underlying.is_empty()
    }

    /// Assertions of this node and every descendant, each reported once.
    pub fn deep_assertions(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut assertions = Vec::new();
        self.collect_deep(&mut seen, &mut assertions);
        assertions
    }

    fn collect_deep<'a>(&'a self, seen: &mut HashSet<&'a str>, out: &mut Vec<String>) {
        for assertion in &self.assertions {
            if seen.insert(assertion.as_str()) {
                out.push(assertion.clone());
            }
        }
        for cause in &self.underlying {
            cause.collect_deep(seen, out);
        }
    }

    /// Assertions found at the leaves of the causal tree.
    pub fn root_assertions(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut assertions = Vec::new();
        self.collect_roots(&mut seen, &mut assertions);
        assertions
    }

    fn collect_roots<'a>(&'a self, seen: &mut HashSet<&'a str>, out: &mut Vec<String>) {
        if self.underlying.is_empty() {
            for assertion in &self.assertions {
                if seen.insert(assertion.as_str()) {
                    out.push(assertion.clone());
                }
            }
            return;
        }
        for cause in &self.underlying {
            cause.collect_roots(seen, out);
        }
    }

    /// Assertions of the immediate causal operands.
    pub fn sub_assertions(&self) -> Vec<String> {
        distinct(
            self.underlying
                .iter()
                .flat_map(|cause| cause.assertions.iter().cloned()),
        )
    }

    /// One-line reason, rendered from the causal tree.
    pub fn reason(&self) -> String {
        render::compact(&self.to_expr())
    }

    /// Multi-line breakdown using the default render configuration.
    pub fn detailed(&self) -> String {
        self.detailed_with(&RenderConfig::default())
    }

    /// Multi-line breakdown using an explicit render configuration.
    pub fn detailed_with(&self, config: &RenderConfig) -> String {
        render::detailed(&self.to_expr(), config)
    }

    pub(crate) fn to_expr(&self) -> Expr {
        match &self.kind {
            NodeKind::Atom {
                statement,
                explained,
            } => self.headline(statement, *explained),
            NodeKind::Operator(operator) => match self.underlying.as_slice() {
                [] => Expr::assertions(&self.assertions),
                [cause] => cause.to_expr(),
                causes => Expr::Group {
                    operator: *operator,
                    operands: causes.iter().map(|cause| cause.to_expr()).collect(),
                },
            },
            NodeKind::Negation => self
                .underlying
                .first()
                .map(|operand| operand.to_expr())
                .unwrap_or_else(|| Expr::assertions(&self.assertions)),
            NodeKind::Quantifier {
                statement,
                explained,
            } => {
                let body = group_assertions(
                    self.underlying
                        .iter()
                        .flat_map(|cause| cause.assertions.iter().map(String::as_str)),
                );
                Expr::Block {
                    header: Box::new(self.headline(statement, *explained)),
                    body: body.into_iter().map(Expr::atom).collect(),
                }
            }
        }
    }

    fn headline(&self, statement: &str, explained: bool) -> Expr {
        if explained && !self.assertions.is_empty() {
            Expr::assertions(&self.assertions)
        } else {
            Expr::statement(statement, self.satisfied)
        }
    }
}

/// Deduplicate while keeping first-seen order.
pub(crate) fn distinct(values: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

/// Collapse repeated assertions into `"3x value"` entries, first-seen order.
pub(crate) fn group_assertions<'a>(assertions: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for assertion in assertions {
        let count = counts.entry(assertion).or_insert(0);
        if *count == 0 {
            order.push(assertion);
        }
        *count += 1;
    }

    order
        .into_iter()
        .map(|assertion| match counts[assertion] {
            1 => assertion.to_string(),
            n => format!("{}x {}", n, assertion),
        })
        .collect()
}
