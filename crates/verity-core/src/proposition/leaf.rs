//! Leaf propositions.

use std::sync::Arc;

use crate::assertion::Assertable;
use crate::description::render::negate_statement;
use crate::description::Description;
use crate::explanation::Explanation;
use crate::result::BooleanResult;
use crate::{BoxError, EvaluationError};

use super::{assertion_factory, failure, resolve_assertions, AssertionFactory, Proposition};

type Predicate<T> = Arc<dyn Fn(&T) -> Result<bool, BoxError> + Send + Sync>;
type MetadataFactory<T, M> = Arc<dyn Fn(&T) -> Result<Vec<M>, BoxError> + Send + Sync>;

fn predicate<T, F>(test: F) -> Predicate<T>
where
    T: ?Sized,
    F: Fn(&T) -> Result<bool, BoxError> + Send + Sync + 'static,
{
    Arc::new(test)
}

fn metadata_factory<T, M, F>(factory: F) -> MetadataFactory<T, M>
where
    T: ?Sized,
    F: Fn(&T) -> Result<Vec<M>, BoxError> + Send + Sync + 'static,
{
    Arc::new(factory)
}

/// A predicate over a single model with metadata for either outcome.
///
/// Metadata is produced only for the outcome that occurred. Unless explicit
/// assertion factories are attached, assertions are derived from the metadata
/// through [`Assertable`].
pub struct Leaf<T: ?Sized, M> {
    statement: String,
    predicate: Predicate<T>,
    when_true: MetadataFactory<T, M>,
    when_false: MetadataFactory<T, M>,
    assert_true: Option<AssertionFactory<T, M>>,
    assert_false: Option<AssertionFactory<T, M>>,
}

impl<T: ?Sized + 'static> Leaf<T, String> {
    /// A boolean-only leaf. Its metadata is its own statement, negated when
    /// the predicate does not hold.
    pub fn new<F>(statement: impl Into<String>, test: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::try_new(statement, move |model: &T| Ok::<_, BoxError>(test(model)))
    }

    /// A boolean-only leaf with a fallible predicate.
    pub fn try_new<F, E>(statement: impl Into<String>, test: F) -> Self
    where
        F: Fn(&T) -> Result<bool, E> + Send + Sync + 'static,
        E: Into<BoxError> + 'static,
    {
        let statement = statement.into();
        let negated = negate_statement(&statement);
        Self::with_metadata_fallible(statement.clone(), test, statement, negated)
    }

    /// A leaf that explains each outcome with a fixed sentence.
    pub fn explained<F>(
        statement: impl Into<String>,
        test: F,
        when_true: impl Into<String>,
        when_false: impl Into<String>,
    ) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::with_metadata(statement, test, when_true.into(), when_false.into())
    }
}

impl<T, M> Leaf<T, M>
where
    T: ?Sized + 'static,
    M: Send + Sync + 'static,
{
    /// A leaf yielding one fixed metadata value per outcome.
    pub fn with_metadata<F>(statement: impl Into<String>, test: F, when_true: M, when_false: M) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
        M: Clone,
    {
        Self::with_metadata_fallible(
            statement,
            move |model: &T| Ok::<_, BoxError>(test(model)),
            when_true,
            when_false,
        )
    }

    fn with_metadata_fallible<F, E>(statement: impl Into<String>, test: F, when_true: M, when_false: M) -> Self
    where
        F: Fn(&T) -> Result<bool, E> + Send + Sync + 'static,
        E: Into<BoxError> + 'static,
        M: Clone,
    {
        Self::try_from_factories(
            statement,
            test,
            move |_: &T| Ok::<_, E>(vec![when_true.clone()]),
            move |_: &T| Ok::<_, E>(vec![when_false.clone()]),
        )
    }

    /// A leaf whose metadata is computed from the model.
    pub fn from_factories<F, FT, FF>(statement: impl Into<String>, test: F, when_true: FT, when_false: FF) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
        FT: Fn(&T) -> Vec<M> + Send + Sync + 'static,
        FF: Fn(&T) -> Vec<M> + Send + Sync + 'static,
    {
        Self::try_from_factories(
            statement,
            move |model: &T| Ok::<_, BoxError>(test(model)),
            move |model: &T| Ok::<_, BoxError>(when_true(model)),
            move |model: &T| Ok::<_, BoxError>(when_false(model)),
        )
    }

    /// A leaf whose predicate and metadata factories may fail.
    ///
    /// Any failure aborts the evaluation with an [`EvaluationError`] naming
    /// this leaf.
    pub fn try_from_factories<F, FT, FF, E>(
        statement: impl Into<String>,
        test: F,
        when_true: FT,
        when_false: FF,
    ) -> Self
    where
        F: Fn(&T) -> Result<bool, E> + Send + Sync + 'static,
        FT: Fn(&T) -> Result<Vec<M>, E> + Send + Sync + 'static,
        FF: Fn(&T) -> Result<Vec<M>, E> + Send + Sync + 'static,
        E: Into<BoxError> + 'static,
    {
        Self {
            statement: statement.into(),
            predicate: predicate(move |model: &T| test(model).map_err(Into::into)),
            when_true: metadata_factory(move |model: &T| when_true(model).map_err(Into::into)),
            when_false: metadata_factory(move |model: &T| when_false(model).map_err(Into::into)),
            assert_true: None,
            assert_false: None,
        }
    }

    /// A leaf yielding the same computed value whatever the outcome.
    pub fn yielding<F, Y>(statement: impl Into<String>, test: F, value: Y) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
        Y: Fn(&T) -> M + Send + Sync + 'static,
    {
        let value = Arc::new(value);
        let when_false = Arc::clone(&value);
        Self::from_factories(
            statement,
            test,
            move |model: &T| vec![value(model)],
            move |model: &T| vec![when_false(model)],
        )
    }

    /// Assertion for each metadata value when the leaf holds.
    pub fn assert_true<A>(self, assertion: A) -> Self
    where
        A: Fn(&T, &M) -> String + Send + Sync + 'static,
    {
        self.try_assert_true(move |model: &T, value: &M| Ok::<_, BoxError>(assertion(model, value)))
    }

    /// Assertion for each metadata value when the leaf does not hold.
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

    pub fn statement(&self) -> &str {
        &self.statement
    }
}

impl<T, M> Proposition<T, M> for Leaf<T, M>
where
    T: ?Sized + 'static,
    M: Assertable + Send + Sync + 'static,
{
    fn description(&self) -> Description {
        Description::new(self.statement.as_str())
    }

    fn is_satisfied_by(&self, model: &T) -> Result<BooleanResult<M>, EvaluationError> {
        let satisfied = (self.predicate)(model).map_err(|e| failure(&self.statement, e))?;

        let (factory, assertion) = if satisfied {
            (&self.when_true, self.assert_true.as_ref())
        } else {
            (&self.when_false, self.assert_false.as_ref())
        };

        let metadata = factory(model).map_err(|e| failure(&self.statement, e))?;
        let (assertions, explained) =
            resolve_assertions(model, &metadata, assertion).map_err(|e| failure(&self.statement, e))?;

        let explanation = Explanation::atom(
            satisfied,
            self.statement.as_str(),
            explained,
            assertions,
            vec![],
        );
        Ok(BooleanResult::from_parts(metadata, explanation, vec![]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_boolean_leaf_uses_statement_as_metadata() {
        let leaf = Leaf::new("is even", |n: &i32| n % 2 == 0);

        let result = leaf.is_satisfied_by(&2).unwrap();
        assert_eq!(result.metadata(), ["is even"]);
        assert_eq!(result.reason(), "is even");

        let result = leaf.is_satisfied_by(&3).unwrap();
        assert_eq!(result.metadata(), ["!is even"]);
        assert_eq!(result.assertions(), ["!is even"]);
        assert_eq!(result.reason(), "!is even");
    }

    #[test]
    fn test_reserved_punctuation_is_bracketed_when_negated() {
        let leaf = Leaf::new("is true (with brackets)", |b: &bool| *b);
        let result = leaf.is_satisfied_by(&false).unwrap();
        assert_eq!(result.reason(), "!(is true (with brackets))");
    }

    #[test]
    fn test_textual_metadata_is_the_assertion() {
        let leaf = Leaf::explained("is even", |n: &i32| n % 2 == 0, "the number is even", "the number is odd");
        let result = leaf.is_satisfied_by(&3).unwrap();

        let as_strings: Vec<String> = result.metadata().to_vec();
        assert_eq!(result.assertions(), as_strings.as_slice());
        assert_eq!(result.reason(), "the number is odd");
    }

    #[test]
    fn test_value_metadata_falls_back_to_statement() {
        let leaf = Leaf::with_metadata("is true", |b: &bool| *b, 1, 0);
        let result = leaf.is_satisfied_by(&false).unwrap();

        assert_eq!(result.metadata(), [0]);
        assert_eq!(result.assertions(), ["0"]);
        assert_eq!(result.reason(), "!is true");
    }

    #[test]
    fn test_factories_see_the_model() {
        let leaf = Leaf::from_factories(
            "is positive",
            |n: &i32| *n > 0,
            |n: &i32| vec![format!("{} is positive", n)],
            |n: &i32| vec![format!("{} is not positive", n)],
        );

        let result = leaf.is_satisfied_by(&-4).unwrap();
        assert_eq!(result.reason(), "-4 is not positive");
    }

    #[test]
    fn test_assertion_factories_explain_values() {
        let leaf = Leaf::yielding("is small", |n: &u32| *n < 10, |n: &u32| *n)
            .assert_true(|_, n| format!("{} is below ten", n))
            .assert_false(|_, n| format!("{} is ten or more", n));

        let result = leaf.is_satisfied_by(&12).unwrap();
        assert_eq!(result.metadata(), [12]);
        assert_eq!(result.assertions(), ["12 is ten or more"]);
        assert_eq!(result.reason(), "12 is ten or more");
        assert_eq!(leaf.statement(), "is small");
    }

    #[test]
    fn test_predicate_failure_names_the_leaf() {
        let leaf: Leaf<i32, String> = Leaf::try_new("is parsable", |_: &i32| Err::<bool, _>("parser exploded"));
        let error = leaf.is_satisfied_by(&1).unwrap_err();

        assert_eq!(error.proposition(), "is parsable");
        assert_eq!(error.to_string(), "Failed to evaluate proposition 'is parsable': parser exploded");
        assert_eq!(error.source().unwrap().to_string(), "parser exploded");
    }

    #[test]
    fn test_factory_failure_is_wrapped() {
        let leaf: Leaf<i32, String> = Leaf::try_from_factories(
            "has reason",
            |_: &i32| Ok::<_, String>(false),
            |_: &i32| Ok(vec!["fine".to_string()]),
            |_: &i32| Err("no reason available".to_string()),
        );

        let error = leaf.is_satisfied_by(&1).unwrap_err();
        assert_eq!(error.proposition(), "has reason");
        assert!(error.to_string().contains("no reason available"));
    }

    #[test]
    fn test_failing_assertion_factory_is_wrapped() {
        let leaf = Leaf::with_metadata("is set", |b: &bool| *b, true, false)
            .try_assert_false(|_, _| Err::<String, _>("cannot describe"));

        let error = leaf.is_satisfied_by(&false).unwrap_err();
        assert_eq!(error.proposition(), "is set");
        assert!(leaf.is_satisfied_by(&true).is_ok());
    }
}
