//! Evaluation reports in text and JSON form.

use std::fmt;

use anyhow::{Context, Result};
use serde::Serialize;
use verity_core::{BooleanResult, Explanation, RenderConfig};

use crate::definition::Compiled;

/// What a single evaluation was run against.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Subject {
    Number(i64),
    Numbers(Vec<i64>),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Number(n) => write!(f, "{}", n),
            Subject::Numbers(numbers) => {
                let numbers: Vec<String> = numbers.iter().map(i64::to_string).collect();
                write!(f, "[{}]", numbers.join(", "))
            }
        }
    }
}

/// Outcome of one evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub subject: Subject,
    pub satisfied: bool,
    pub reason: String,
    pub detailed: String,
    pub metadata: Vec<String>,

    /// Causal explanation tree
    pub explanation: Explanation,
}

impl EvaluationReport {
    fn new(subject: Subject, result: BooleanResult<String>, config: RenderConfig) -> Self {
        let description = result.describe_with(config);
        Self {
            subject,
            satisfied: result.satisfied(),
            reason: description.reason(),
            detailed: description.detailed(),
            metadata: result.metadata().to_vec(),
            explanation: result.explanation().clone(),
        }
    }
}

/// All evaluations of one definition.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Statement of the evaluated proposition
    pub statement: String,
    pub evaluations: Vec<EvaluationReport>,
}

impl Report {
    /// Evaluate a compiled definition against the given numbers.
    pub fn evaluate(compiled: &Compiled, numbers: &[i64], config: RenderConfig) -> Result<Self> {
        let statement = compiled.description().statement();

        let evaluations = match compiled {
            Compiled::Each(spec) => numbers
                .iter()
                .map(|n| {
                    let result = spec
                        .is_satisfied_by(n)
                        .with_context(|| format!("Evaluation failed for {}", n))?;
                    tracing::debug!(model = n, satisfied = result.satisfied(), "Evaluated number");
                    Ok(EvaluationReport::new(Subject::Number(*n), result, config))
                })
                .collect::<Result<Vec<_>>>()?,
            Compiled::Collection(spec) => {
                let result = spec
                    .is_satisfied_by(numbers)
                    .context("Evaluation failed for the list of numbers")?;
                tracing::debug!(count = numbers.len(), satisfied = result.satisfied(), "Evaluated list");
                vec![EvaluationReport::new(
                    Subject::Numbers(numbers.to_vec()),
                    result,
                    config,
                )]
            }
        };

        Ok(Self {
            statement,
            evaluations,
        })
    }

    /// Whether every evaluation was satisfied.
    pub fn all_satisfied(&self) -> bool {
        self.evaluations.iter().all(|evaluation| evaluation.satisfied)
    }

    pub fn to_text(&self, config: &RenderConfig) -> String {
        let indent = config.indentation(1);
        let mut lines = vec![self.statement.clone()];

        for evaluation in &self.evaluations {
            let verdict = if evaluation.satisfied {
                "SATISFIED"
            } else {
                "NOT SATISFIED"
            };
            lines.push(String::new());
            lines.push(format!("{}: {}", evaluation.subject, verdict));
            lines.push(format!("{}reason: {}", indent, evaluation.reason));
            lines.extend(
                evaluation
                    .detailed
                    .lines()
                    .map(|line| format!("{}{}", indent, line)),
            );
        }

        lines.join("\n")
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::Definition;

    const POSITIVE_EVENS: &str = include_str!("../definitions/positive-evens.yaml");
    const MOSTLY_SMALL: &str = include_str!("../definitions/mostly-small.yaml");

    fn report(yaml: &str, numbers: &[i64]) -> Report {
        let definition = Definition::from_yaml(yaml).unwrap();
        let compiled = definition.compile().unwrap();
        Report::evaluate(&compiled, numbers, definition.render).unwrap()
    }

    #[test]
    fn test_text_report() {
        let report = report(POSITIVE_EVENS, &[-3, 4]);
        assert!(!report.all_satisfied());
        assert_eq!(
            report.to_text(&RenderConfig::default()),
            "is even & is positive\n\
             \n\
             -3: NOT SATISFIED\n    \
             reason: -3 is odd & -3 is negative\n    \
             AND\n        \
             -3 is odd\n        \
             -3 is negative\n\
             \n\
             4: SATISFIED\n    \
             reason: 4 is even & 4 is positive\n    \
             AND\n        \
             4 is even\n        \
             4 is positive"
        );
    }

    #[test]
    fn test_json_report_carries_the_causal_tree() {
        let report = report(POSITIVE_EVENS, &[3]);
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        let evaluation = &json["evaluations"][0];
        assert_eq!(evaluation["subject"], 3);
        assert_eq!(evaluation["satisfied"], false);
        assert_eq!(evaluation["reason"], "3 is odd");
        assert_eq!(evaluation["metadata"][0], "3 is odd");
        assert_eq!(evaluation["explanation"]["underlying"][0]["assertions"][0], "3 is odd");
    }

    #[test]
    fn test_quantified_report() {
        let report = report(MOSTLY_SMALL, &[3, 70, 140, 9]);
        assert_eq!(report.evaluations.len(), 1);

        let evaluation = &report.evaluations[0];
        assert!(evaluation.satisfied);
        assert_eq!(evaluation.subject.to_string(), "[3, 70, 140, 9]");
        assert_eq!(
            evaluation.reason,
            "at most two numbers are large or multiples of seven"
        );
        assert_eq!(evaluation.explanation.underlying().len(), 2);
    }

    #[test]
    fn test_evaluation_failure_has_context() {
        let definition =
            Definition::from_yaml("proposition:\n  kind: check\n  test: divisible_by\n  value: 0\n").unwrap();
        let compiled = definition.compile().unwrap();

        let error = Report::evaluate(&compiled, &[5], definition.render).unwrap_err();
        assert_eq!(error.to_string(), "Evaluation failed for 5");
        assert!(format!("{:#}", error).contains("divisibility by zero"));
    }
}
