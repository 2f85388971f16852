//! Evaluation summaries handed to quantifier factories.

use crate::result::BooleanResult;

use super::Quantifier;

/// What a quantifier saw: the models, one result per model, and which of
/// those results caused the aggregate outcome.
pub struct Evaluation<'a, T, M> {
    quantifier: Quantifier,
    satisfied: bool,
    models: &'a [T],
    results: &'a [BooleanResult<M>],
    causes: &'a [usize],
}

impl<'a, T, M> Evaluation<'a, T, M> {
    pub(crate) fn new(
        quantifier: Quantifier,
        satisfied: bool,
        models: &'a [T],
        results: &'a [BooleanResult<M>],
        causes: &'a [usize],
    ) -> Self {
        Self {
            quantifier,
            satisfied,
            models,
            results,
            causes,
        }
    }

    pub fn quantifier(&self) -> Quantifier {
        self.quantifier
    }

    /// The aggregate outcome.
    pub fn satisfied(&self) -> bool {
        self.satisfied
    }

    pub fn count(&self) -> usize {
        self.results.len()
    }

    pub fn true_count(&self) -> usize {
        self.results.iter().filter(|result| result.satisfied()).count()
    }

    pub fn false_count(&self) -> usize {
        self.count() - self.true_count()
    }

    pub fn models(&self) -> &'a [T] {
        self.models
    }

    /// Models whose result was satisfied.
    pub fn true_models(&self) -> Vec<&'a T> {
        self.models_where(true)
    }

    /// Models whose result was not satisfied.
    pub fn false_models(&self) -> Vec<&'a T> {
        self.models_where(false)
    }

    fn models_where(&self, satisfied: bool) -> Vec<&'a T> {
        self.models
            .iter()
            .zip(self.results)
            .filter(|(_, result)| result.satisfied() == satisfied)
            .map(|(model, _)| model)
            .collect()
    }

    pub fn results(&self) -> &'a [BooleanResult<M>] {
        self.results
    }

    pub fn true_results(&self) -> Vec<&'a BooleanResult<M>> {
        self.results.iter().filter(|result| result.satisfied()).collect()
    }

    pub fn false_results(&self) -> Vec<&'a BooleanResult<M>> {
        self.results.iter().filter(|result| !result.satisfied()).collect()
    }

    /// Results that caused the aggregate outcome, in model order.
    pub fn causes(&self) -> Vec<&'a BooleanResult<M>> {
        let results = self.results;
        self.causes.iter().map(|index| &results[*index]).collect()
    }

    /// Metadata of the causal results, concatenated in model order.
    pub fn causal_metadata(&self) -> Vec<M>
    where
        M: Clone,
    {
        self.causes
            .iter()
            .flat_map(|index| self.results[*index].metadata().iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(satisfied: bool, value: i32) -> BooleanResult<i32> {
        BooleanResult::new(satisfied, "is positive", vec![value])
    }

    #[test]
    fn test_partitions_by_outcome() {
        let models = [3, -1, -2];
        let results = [result(true, 3), result(false, -1), result(false, -2)];
        let causes = [1, 2];
        let evaluation = Evaluation::new(Quantifier::All, false, &models, &results, &causes);

        assert_eq!(evaluation.count(), 3);
        assert_eq!(evaluation.true_count(), 1);
        assert_eq!(evaluation.false_count(), 2);
        assert_eq!(evaluation.true_models(), [&3]);
        assert_eq!(evaluation.false_models(), [&-1, &-2]);
        assert_eq!(evaluation.false_results().len(), 2);
        assert_eq!(evaluation.causes().len(), 2);
        assert_eq!(evaluation.causal_metadata(), [-1, -2]);
        assert_eq!(evaluation.quantifier(), Quantifier::All);
        assert!(!evaluation.satisfied());
    }
}
