//! Evaluated results.

use std::fmt;
use std::sync::Arc;

use crate::assertion::{all_explanations, Assertable};
use crate::config::RenderConfig;
use crate::explanation::Explanation;

/// The outcome of evaluating a proposition against a model.
///
/// Carries the truth value, the metadata yielded by the causal part of the
/// proposition tree, and the explanation from which reasons are rendered.
#[derive(Debug, Clone)]
pub struct BooleanResult<M> {
    metadata: Vec<M>,
    explanation: Arc<Explanation>,
    underlying: Vec<BooleanResult<M>>,
}

impl<M: Assertable> BooleanResult<M> {
    /// A leaf result whose assertions are derived from its metadata.
    pub fn new(satisfied: bool, statement: impl Into<String>, metadata: Vec<M>) -> Self {
        let explained = all_explanations(&metadata);
        let assertions = metadata.iter().map(Assertable::assertion).collect();
        let explanation = Explanation::atom(satisfied, statement, explained, assertions, vec![]);
        Self::from_parts(metadata, explanation, vec![])
    }
}

impl<M> BooleanResult<M> {
    /// A leaf result with explicit assertions.
    pub fn with_assertions(
        satisfied: bool,
        statement: impl Into<String>,
        metadata: Vec<M>,
        assertions: Vec<String>,
    ) -> Self {
        let explained = !assertions.is_empty();
        let explanation = Explanation::atom(satisfied, statement, explained, assertions, vec![]);
        Self::from_parts(metadata, explanation, vec![])
    }

    pub(crate) fn from_parts(
        metadata: Vec<M>,
        explanation: Explanation,
        underlying: Vec<BooleanResult<M>>,
    ) -> Self {
        Self {
            metadata,
            explanation: Arc::new(explanation),
            underlying,
        }
    }

    /// Whether the proposition holds.
    pub fn satisfied(&self) -> bool {
        self.explanation.satisfied()
    }

    /// Metadata yielded by the causal part of the tree, in evaluation order.
    pub fn metadata(&self) -> &[M] {
        &self.metadata
    }

    /// Take the metadata out of the result.
    pub fn into_metadata(self) -> Vec<M> {
        self.metadata
    }

    /// The explanation tree.
    pub fn explanation(&self) -> &Explanation {
        &self.explanation
    }

    pub(crate) fn shared_explanation(&self) -> Arc<Explanation> {
        Arc::clone(&self.explanation)
    }

    /// This result's own assertions.
    pub fn assertions(&self) -> &[String] {
        self.explanation.assertions()
    }

    /// Assertions of this result and every causal descendant.
    pub fn deep_assertions(&self) -> Vec<String> {
        self.explanation.deep_assertions()
    }

    /// Assertions at the leaves of the causal tree.
    pub fn root_assertions(&self) -> Vec<String> {
        self.explanation.root_assertions()
    }

    /// Assertions of the immediate causal operands.
    pub fn sub_assertions(&self) -> Vec<String> {
        self.explanation.sub_assertions()
    }

    /// Explanations of the causal operands, whatever their metadata type.
    pub fn underlying(&self) -> &[Arc<Explanation>] {
        self.explanation.underlying()
    }

    /// Causal operands that share this result's metadata type.
    ///
    /// Empty for leaves, and for decorators and quantifiers whose operands
    /// yield a different metadata type; use [`underlying`](Self::underlying)
    /// to reach those.
    pub fn underlying_with_metadata(&self) -> &[BooleanResult<M>] {
        &self.underlying
    }

    /// One-line reason.
    pub fn reason(&self) -> String {
        self.explanation.reason()
    }

    /// Rendered description using the default configuration.
    pub fn description(&self) -> ResultDescription<'_> {
        self.describe_with(RenderConfig::default())
    }

    /// Rendered description using an explicit configuration.
    pub fn describe_with(&self, config: RenderConfig) -> ResultDescription<'_> {
        ResultDescription {
            explanation: &self.explanation,
            config,
        }
    }

    /// Change the metadata type, keeping the explanation untouched.
    pub fn map_metadata<N, F>(self, mut map: F) -> BooleanResult<N>
    where
        F: FnMut(M) -> N,
    {
        self.map_with(&mut map)
    }

    fn map_with<N, F>(self, map: &mut F) -> BooleanResult<N>
    where
        F: FnMut(M) -> N,
    {
        let underlying = self
            .underlying
            .into_iter()
            .map(|operand| operand.map_with(map))
            .collect();

        BooleanResult {
            metadata: self.metadata.into_iter().map(&mut *map).collect(),
            explanation: self.explanation,
            underlying,
        }
    }
}

impl<M> fmt::Display for BooleanResult<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason())
    }
}

/// Reason and detailed breakdown of a result.
#[derive(Debug, Clone, Copy)]
pub struct ResultDescription<'a> {
    explanation: &'a Explanation,
    config: RenderConfig,
}

impl ResultDescription<'_> {
    /// One-line reason.
    pub fn reason(&self) -> String {
        self.explanation.reason()
    }

    /// Multi-line breakdown.
    pub fn detailed(&self) -> String {
        self.explanation.detailed_with(&self.config)
    }
}

impl fmt::Display for ResultDescription<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason())
    }
}
