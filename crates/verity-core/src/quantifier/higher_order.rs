//! Quantified propositions.

use std::sync::Arc;

use crate::assertion::{all_explanations, Assertable};
use crate::combinator::CauseSelector;
use crate::description::Description;
use crate::explanation::{group_assertions, Explanation};
use crate::proposition::{failure, Proposition, Spec};
use crate::result::BooleanResult;
use crate::{BoxError, EvaluationError};

use super::{Evaluation, Quantifier};

type SummaryFactory<T, N, M> =
    Arc<dyn Fn(&Evaluation<'_, T, N>) -> Result<Vec<M>, BoxError> + Send + Sync>;
type SummaryAssertion<T, N, M> =
    Arc<dyn Fn(&Evaluation<'_, T, N>, &M) -> Result<String, BoxError> + Send + Sync>;
type AssertionStrategy<T, N, M> =
    Arc<dyn Fn(&Evaluation<'_, T, N>, &[M]) -> (Vec<String>, bool) + Send + Sync>;

/// Keeps the causal child results when their metadata type is the parent's.
type CausalResults<N, M> = fn(Vec<BooleanResult<N>>) -> Vec<BooleanResult<M>>;

fn discard<N, M>(_: Vec<BooleanResult<N>>) -> Vec<BooleanResult<M>> {
    Vec::new()
}

fn summary_factory<T, N, M, F>(factory: F) -> SummaryFactory<T, N, M>
where
    F: Fn(&Evaluation<'_, T, N>) -> Result<Vec<M>, BoxError> + Send + Sync + 'static,
{
    Arc::new(factory)
}

fn summary_assertion<T, N, M, F>(assertion: F) -> SummaryAssertion<T, N, M>
where
    F: Fn(&Evaluation<'_, T, N>, &M) -> Result<String, BoxError> + Send + Sync + 'static,
{
    Arc::new(assertion)
}

fn assertion_strategy<T, N, M, F>(strategy: F) -> AssertionStrategy<T, N, M>
where
    F: Fn(&Evaluation<'_, T, N>, &[M]) -> (Vec<String>, bool) + Send + Sync + 'static,
{
    Arc::new(strategy)
}

/// A proposition over a slice of models, aggregating one child result per
/// model under a [`Quantifier`].
///
/// Only the causal children are attached to the explanation. Without custom
/// factories the metadata is the causal children's metadata, the assertions
/// are their assertions grouped with multiplicities (`3x true`) and the reason
/// is the statement.
pub struct HigherOrder<T, N, M> {
    statement: String,
    quantifier: Quantifier,
    child: Spec<T, N>,
    when_true: SummaryFactory<T, N, M>,
    when_false: SummaryFactory<T, N, M>,
    assert_true: Option<SummaryAssertion<T, N, M>>,
    assert_false: Option<SummaryAssertion<T, N, M>>,
    assertions: AssertionStrategy<T, N, M>,
    typed_causes: CausalResults<N, M>,
}

impl<T, M> HigherOrder<T, M, M>
where
    T: 'static,
    M: Clone + Send + Sync + 'static,
{
    pub fn new(statement: impl Into<String>, quantifier: Quantifier, child: Spec<T, M>) -> Self {
        let causal_metadata =
            summary_factory(|evaluation: &Evaluation<'_, T, M>| Ok(evaluation.causal_metadata()));

        Self {
            statement: statement.into(),
            quantifier,
            child,
            when_true: Arc::clone(&causal_metadata),
            when_false: causal_metadata,
            assert_true: None,
            assert_false: None,
            assertions: assertion_strategy(|evaluation: &Evaluation<'_, T, M>, _: &[M]| {
                let grouped = group_assertions(
                    evaluation
                        .causes()
                        .into_iter()
                        .flat_map(|cause| cause.assertions().iter().map(String::as_str)),
                );
                (grouped, false)
            }),
            typed_causes: |causes| causes,
        }
    }
}

impl<T, N, M> HigherOrder<T, N, M>
where
    T: 'static,
    N: 'static,
    M: Assertable + Send + Sync + 'static,
{
    /// A quantifier whose metadata is built from the evaluation summary.
    pub fn with_factories<FT, FF>(
        statement: impl Into<String>,
        quantifier: Quantifier,
        child: Spec<T, N>,
        when_true: FT,
        when_false: FF,
    ) -> Self
    where
        FT: Fn(&Evaluation<'_, T, N>) -> Vec<M> + Send + Sync + 'static,
        FF: Fn(&Evaluation<'_, T, N>) -> Vec<M> + Send + Sync + 'static,
    {
        Self::try_with_factories(
            statement,
            quantifier,
            child,
            move |evaluation: &Evaluation<'_, T, N>| Ok::<_, BoxError>(when_true(evaluation)),
            move |evaluation: &Evaluation<'_, T, N>| Ok::<_, BoxError>(when_false(evaluation)),
        )
    }

    pub fn try_with_factories<FT, FF, E>(
        statement: impl Into<String>,
        quantifier: Quantifier,
        child: Spec<T, N>,
        when_true: FT,
        when_false: FF,
    ) -> Self
    where
        FT: Fn(&Evaluation<'_, T, N>) -> Result<Vec<M>, E> + Send + Sync + 'static,
        FF: Fn(&Evaluation<'_, T, N>) -> Result<Vec<M>, E> + Send + Sync + 'static,
        E: Into<BoxError> + 'static,
    {
        Self {
            statement: statement.into(),
            quantifier,
            child,
            when_true: summary_factory(move |evaluation: &Evaluation<'_, T, N>| {
                when_true(evaluation).map_err(Into::into)
            }),
            when_false: summary_factory(move |evaluation: &Evaluation<'_, T, N>| {
                when_false(evaluation).map_err(Into::into)
            }),
            assert_true: None,
            assert_false: None,
            assertions: assertion_strategy(|_: &Evaluation<'_, T, N>, metadata: &[M]| {
                (
                    metadata.iter().map(Assertable::assertion).collect(),
                    all_explanations(metadata),
                )
            }),
            typed_causes: discard,
        }
    }

    /// One fixed metadata value per aggregate outcome.
    pub fn with_metadata(
        statement: impl Into<String>,
        quantifier: Quantifier,
        child: Spec<T, N>,
        when_true: M,
        when_false: M,
    ) -> Self
    where
        M: Clone,
    {
        Self::with_factories(
            statement,
            quantifier,
            child,
            move |_: &Evaluation<'_, T, N>| vec![when_true.clone()],
            move |_: &Evaluation<'_, T, N>| vec![when_false.clone()],
        )
    }
}

impl<T: 'static, N: 'static> HigherOrder<T, N, String> {
    /// Explain each aggregate outcome with a fixed sentence.
    pub fn explained(
        statement: impl Into<String>,
        quantifier: Quantifier,
        child: Spec<T, N>,
        when_true: impl Into<String>,
        when_false: impl Into<String>,
    ) -> Self {
        Self::with_metadata(statement, quantifier, child, when_true.into(), when_false.into())
    }
}

impl<T, N, M> HigherOrder<T, N, M>
where
    T: 'static,
    N: 'static,
    M: 'static,
{
    /// Assertion for each metadata value when the quantifier holds.
    pub fn assert_true<A>(self, assertion: A) -> Self
    where
        A: Fn(&Evaluation<'_, T, N>, &M) -> String + Send + Sync + 'static,
    {
        self.try_assert_true(move |evaluation: &Evaluation<'_, T, N>, value: &M| {
            Ok::<_, BoxError>(assertion(evaluation, value))
        })
    }

    /// Assertion for each metadata value when the quantifier does not hold.
    pub fn assert_false<A>(self, assertion: A) -> Self
    where
        A: Fn(&Evaluation<'_, T, N>, &M) -> String + Send + Sync + 'static,
    {
        self.try_assert_false(move |evaluation: &Evaluation<'_, T, N>, value: &M| {
            Ok::<_, BoxError>(assertion(evaluation, value))
        })
    }

    pub fn try_assert_true<A, E>(mut self, assertion: A) -> Self
    where
        A: Fn(&Evaluation<'_, T, N>, &M) -> Result<String, E> + Send + Sync + 'static,
        E: Into<BoxError> + 'static,
    {
        self.assert_true = Some(summary_assertion(
            move |evaluation: &Evaluation<'_, T, N>, value: &M| assertion(evaluation, value).map_err(Into::into),
        ));
        self
    }

    pub fn try_assert_false<A, E>(mut self, assertion: A) -> Self
    where
        A: Fn(&Evaluation<'_, T, N>, &M) -> Result<String, E> + Send + Sync + 'static,
        E: Into<BoxError> + 'static,
    {
        self.assert_false = Some(summary_assertion(
            move |evaluation: &Evaluation<'_, T, N>, value: &M| assertion(evaluation, value).map_err(Into::into),
        ));
        self
    }

    pub fn quantifier(&self) -> Quantifier {
        self.quantifier
    }

    fn resolve_assertions(
        &self,
        evaluation: &Evaluation<'_, T, N>,
        metadata: &[M],
    ) -> Result<(Vec<String>, bool), BoxError> {
        let assertion = if evaluation.satisfied() {
            self.assert_true.as_ref()
        } else {
            self.assert_false.as_ref()
        };

        match assertion {
            Some(assertion) => {
                let assertions = metadata
                    .iter()
                    .map(|value| assertion(evaluation, value))
                    .collect::<Result<Vec<_>, _>>()?;
                let explained = !assertions.is_empty();
                Ok((assertions, explained))
            }
            None => Ok((self.assertions)(evaluation, metadata)),
        }
    }
}

impl<T, N, M> Proposition<[T], M> for HigherOrder<T, N, M>
where
    T: 'static,
    N: 'static,
    M: 'static,
{
    fn description(&self) -> Description {
        Description::wrap(self.statement.as_str(), self.child.description())
    }

    fn is_satisfied_by(&self, models: &[T]) -> Result<BooleanResult<M>, EvaluationError> {
        let results = models
            .iter()
            .map(|model| self.child.is_satisfied_by(model))
            .collect::<Result<Vec<_>, _>>()?;

        let flags: Vec<bool> = results.iter().map(BooleanResult::satisfied).collect();
        let true_count = flags.iter().filter(|satisfied| **satisfied).count();
        let satisfied = self.quantifier.is_satisfied(true_count, flags.len());
        let causes = self.quantifier.select(satisfied, &flags);

        tracing::trace!(
            quantifier = %self.quantifier,
            total = flags.len(),
            true_count,
            causes = causes.len(),
            satisfied,
            "Quantifier aggregated child results"
        );

        let evaluation = Evaluation::new(self.quantifier, satisfied, models, &results, &causes);
        let factory = if satisfied {
            &self.when_true
        } else {
            &self.when_false
        };

        let metadata = factory(&evaluation).map_err(|e| failure(&self.statement, e))?;
        let (assertions, explained) = self
            .resolve_assertions(&evaluation, &metadata)
            .map_err(|e| failure(&self.statement, e))?;

        let underlying = causes
            .iter()
            .map(|index| results[*index].shared_explanation())
            .collect();
        let explanation = Explanation::quantified(
            satisfied,
            self.statement.as_str(),
            explained,
            assertions,
            underlying,
        );

        let mut results: Vec<Option<BooleanResult<N>>> = results.into_iter().map(Some).collect();
        let causal = causes.iter().filter_map(|index| results[*index].take()).collect();

        Ok(BooleanResult::from_parts(
            metadata,
            explanation,
            (self.typed_causes)(causal),
        ))
    }
}
