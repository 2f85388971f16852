//! Propositions wrapping another proposition.

use std::sync::Arc;

use crate::assertion::Assertable;
use crate::description::Description;
use crate::explanation::Explanation;
use crate::result::BooleanResult;
use crate::{BoxError, EvaluationError};

use super::{assertion_factory, failure, resolve_assertions, AssertionFactory, Proposition, Spec};

type ChildFactory<T, N, M> =
    Arc<dyn Fn(&T, &BooleanResult<N>) -> Result<Vec<M>, BoxError> + Send + Sync>;

fn child_factory<T, N, M, F>(factory: F) -> ChildFactory<T, N, M>
where
    T: ?Sized,
    F: Fn(&T, &BooleanResult<N>) -> Result<Vec<M>, BoxError> + Send + Sync + 'static,
{
    Arc::new(factory)
}

/// Replaces the metadata of a wrapped proposition.
///
/// The wrapped result stays reachable as the single causal operand, so its
/// reasoning is available through `underlying` and the deep views, but its
/// assertions never appear among the decorator's own. The wrapped proposition
/// may yield a different metadata type `N`.
pub struct Decorator<T: ?Sized, N, M> {
    statement: String,
    child: Spec<T, N>,
    when_true: ChildFactory<T, N, M>,
    when_false: ChildFactory<T, N, M>,
    assert_true: Option<AssertionFactory<T, M>>,
    assert_false: Option<AssertionFactory<T, M>>,
}

impl<T: ?Sized + 'static, N: 'static> Decorator<T, N, String> {
    /// Explain the wrapped outcome with a fixed sentence.
    pub fn explained(
        statement: impl Into<String>,
        child: Spec<T, N>,
        when_true: impl Into<String>,
        when_false: impl Into<String>,
    ) -> Self {
        Self::with_metadata(statement, child, when_true.into(), when_false.into())
    }
}

impl<T, N, M> Decorator<T, N, M>
where
    T: ?Sized + 'static,
    N: 'static,
    M: Send + Sync + 'static,
{
    pub fn new<FT, FF>(statement: impl Into<String>, child: Spec<T, N>, when_true: FT, when_false: FF) -> Self
    where
        FT: Fn(&T, &BooleanResult<N>) -> Vec<M> + Send + Sync + 'static,
        FF: Fn(&T, &BooleanResult<N>) -> Vec<M> + Send + Sync + 'static,
    {
        Self::try_new(
            statement,
            child,
            move |model: &T, result: &BooleanResult<N>| Ok::<_, BoxError>(when_true(model, result)),
            move |model: &T, result: &BooleanResult<N>| Ok::<_, BoxError>(when_false(model, result)),
        )
    }

    pub fn try_new<FT, FF, E>(statement: impl Into<String>, child: Spec<T, N>, when_true: FT, when_false: FF) -> Self
    where
        FT: Fn(&T, &BooleanResult<N>) -> Result<Vec<M>, E> + Send + Sync + 'static,
        FF: Fn(&T, &BooleanResult<N>) -> Result<Vec<M>, E> + Send + Sync + 'static,
        E: Into<BoxError> + 'static,
    {
        Self {
            statement: statement.into(),
            child,
            when_true: child_factory(move |model: &T, result: &BooleanResult<N>| {
                when_true(model, result).map_err(Into::into)
            }),
            when_false: child_factory(move |model: &T, result: &BooleanResult<N>| {
                when_false(model, result).map_err(Into::into)
            }),
            assert_true: None,
            assert_false: None,
        }
    }

    pub fn with_metadata(statement: impl Into<String>, child: Spec<T, N>, when_true: M, when_false: M) -> Self
    where
        M: Clone,
    {
        Self::new(
            statement,
            child,
            move |_: &T, _: &BooleanResult<N>| vec![when_true.clone()],
            move |_: &T, _: &BooleanResult<N>| vec![when_false.clone()],
        )
    }

    /// Same computed metadata whatever the outcome.
    pub fn yielding<F>(statement: impl Into<String>, child: Spec<T, N>, value: F) -> Self
    where
        F: Fn(&T, &BooleanResult<N>) -> Vec<M> + Send + Sync + 'static,
    {
        let value = Arc::new(value);
        let when_false = Arc::clone(&value);
        Self::new(
            statement,
            child,
            move |model: &T, result: &BooleanResult<N>| value(model, result),
            move |model: &T, result: &BooleanResult<N>| when_false(model, result),
        )
    }

    pub fn assert_true<A>(self, assertion: A) -> Self
    where
        A: Fn(&T, &M) -> String + Send + Sync + 'static,
    {
        self.try_assert_true(move |model: &T, value: &M| Ok::<_, BoxError>(assertion(model, value)))
    }

    pub fn assert_false<A>(self, assertion: A) -> Self
    where
        A: Fn(&T, &M) -> String + Send + Sync + 'static,
    {
        self.try_assert_false(move |model: &T, value: &M| Ok::<_, BoxError>(assertion(model, value)))
    }

    pub fn try_assert_true<A, E>(mut self, assertion: A) -> Self
    where
        A: Fn(&T, &M) -> Result<String, E> + Send + Sync + 'static,
        E: Into<BoxError> + 'static,
    {
        self.assert_true = Some(assertion_factory(move |model: &T, value: &M| {
            assertion(model, value).map_err(Into::into)
        }));
        self
    }

    pub fn try_assert_false<A, E>(mut self, assertion: A) -> Self
    where
        A: Fn(&T, &M) -> Result<String, E> + Send + Sync + 'static,
        E: Into<BoxError> + 'static,
    {
        self.assert_false = Some(assertion_factory(move |model: &T, value: &M| {
            assertion(model, value).map_err(Into::into)
        }));
        self
    }
}

impl<T, N, M> Proposition<T, M> for Decorator<T, N, M>
where
    T: ?Sized + 'static,
    N: 'static,
    M: Assertable + Send + Sync + 'static,
{
    fn description(&self) -> Description {
        Description::wrap(self.statement.as_str(), self.child.description())
    }

    fn is_satisfied_by(&self, model: &T) -> Result<BooleanResult<M>, EvaluationError> {
        let child = self.child.is_satisfied_by(model)?;
        let satisfied = child.satisfied();

        let (factory, assertion) = if satisfied {
            (&self.when_true, self.assert_true.as_ref())
        } else {
            (&self.when_false, self.assert_false.as_ref())
        };

        let metadata = factory(model, &child).map_err(|e| failure(&self.statement, e))?;
        let (assertions, explained) =
            resolve_assertions(model, &metadata, assertion).map_err(|e| failure(&self.statement, e))?;

        let explanation = Explanation::atom(
            satisfied,
            self.statement.as_str(),
            explained,
            assertions,
            vec![child.shared_explanation()],
        );
        Ok(BooleanResult::from_parts(metadata, explanation, vec![]))
    }
}

/// Gives a proposition a name while keeping its metadata.
///
/// The reason becomes the name (negated when unsatisfied); metadata and
/// assertions pass through from the wrapped result.
pub struct Named<T: ?Sized, M> {
    statement: String,
    operand: Spec<T, M>,
}

impl<T: ?Sized, M> Named<T, M> {
    pub fn new(statement: impl Into<String>, operand: Spec<T, M>) -> Self {
        Self {
            statement: statement.into(),
            operand,
        }
    }
}

impl<T, M> Proposition<T, M> for Named<T, M>
where
    T: ?Sized + 'static,
    M: Clone + Send + Sync + 'static,
{
    fn description(&self) -> Description {
        Description::wrap(self.statement.as_str(), self.operand.description())
    }

    fn is_satisfied_by(&self, model: &T) -> Result<BooleanResult<M>, EvaluationError> {
        let operand = self.operand.is_satisfied_by(model)?;
        let explanation = Explanation::atom(
            operand.satisfied(),
            self.statement.as_str(),
            false,
            operand.assertions().to_vec(),
            vec![operand.shared_explanation()],
        );

        Ok(BooleanResult::from_parts(
            operand.metadata().to_vec(),
            explanation,
            vec![operand],
        ))
    }
}

/// Converts the metadata of every result to another type.
pub struct MapMetadata<T: ?Sized, M, N> {
    operand: Spec<T, M>,
    map: Arc<dyn Fn(&M) -> N + Send + Sync>,
}

impl<T: ?Sized, M, N> MapMetadata<T, M, N> {
    pub fn new<F>(operand: Spec<T, M>, map: F) -> Self
    where
        F: Fn(&M) -> N + Send + Sync + 'static,
    {
        Self {
            operand,
            map: Arc::new(map),
        }
    }
}

impl<T, M, N> Proposition<T, N> for MapMetadata<T, M, N>
where
    T: ?Sized + 'static,
    M: 'static,
    N: 'static,
{
    fn description(&self) -> Description {
        self.operand.description()
    }

    fn is_satisfied_by(&self, model: &T) -> Result<BooleanResult<N>, EvaluationError> {
        let result = self.operand.is_satisfied_by(model)?;
        Ok(result.map_metadata(|value| (self.map)(&value)))
    }
}
