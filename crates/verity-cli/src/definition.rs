//! Declarative proposition definitions over integers.
//!
//! A definition file describes a proposition tree in YAML. Nodes are tagged by
//! `kind`; leaves are `check` nodes running one of the built-in [`Test`]s.
//!
//! ```yaml
//! proposition:
//!   kind: and
//!   operands:
//!     - kind: check
//!       test: even
//!       when_true: "{model} is even"
//!       when_false: "{model} is odd"
//!     - kind: check
//!       test: greater_than
//!       value: 10
//! quantifier:
//!   kind: at_least
//!   count: 2
//! render:
//!   max_line_width: 60
//! ```

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use verity_core::{BooleanResult, Decorator, Description, Leaf, Quantifier, RenderConfig, Spec};

/// Placeholder replaced by the evaluated number in `when_true` / `when_false`.
const MODEL_PLACEHOLDER: &str = "{model}";

/// A complete definition file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Definition {
    /// Root of the proposition tree
    pub proposition: Node,

    /// Evaluate the whole list of numbers at once under this quantifier
    #[serde(default)]
    pub quantifier: Option<QuantifierDefinition>,

    /// Layout of detailed descriptions
    #[serde(default)]
    pub render: RenderConfig,
}

/// A node of the proposition tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Check {
        test: Test,

        /// Operand of the comparison tests
        #[serde(default)]
        value: Option<i64>,

        /// Overrides the generated statement (`is even`, `is greater than 3`)
        #[serde(default)]
        statement: Option<String>,

        #[serde(default)]
        when_true: Option<String>,

        #[serde(default)]
        when_false: Option<String>,
    },
    And {
        operands: Vec<Node>,
    },
    Or {
        operands: Vec<Node>,
    },
    Xor {
        operands: Vec<Node>,
    },
    AndAlso {
        operands: Vec<Node>,
    },
    OrElse {
        operands: Vec<Node>,
    },
    Not {
        operand: Box<Node>,
    },
    Named {
        statement: String,
        operand: Box<Node>,

        #[serde(default)]
        when_true: Option<String>,

        #[serde(default)]
        when_false: Option<String>,
    },
}

/// Built-in integer tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Test {
    Even,
    Odd,
    Positive,
    Negative,
    Zero,
    GreaterThan,
    LessThan,
    EqualTo,
    DivisibleBy,
}

impl Test {
    fn needs_value(self) -> bool {
        matches!(
            self,
            Test::GreaterThan | Test::LessThan | Test::EqualTo | Test::DivisibleBy
        )
    }

    fn statement(self, value: i64) -> String {
        match self {
            Test::Even => "is even".to_string(),
            Test::Odd => "is odd".to_string(),
            Test::Positive => "is positive".to_string(),
            Test::Negative => "is negative".to_string(),
            Test::Zero => "is zero".to_string(),
            Test::GreaterThan => format!("is greater than {}", value),
            Test::LessThan => format!("is less than {}", value),
            Test::EqualTo => format!("is equal to {}", value),
            Test::DivisibleBy => format!("is divisible by {}", value),
        }
    }

    fn holds(self, value: i64, n: i64) -> Result<bool, String> {
        Ok(match self {
            Test::Even => n % 2 == 0,
            Test::Odd => n % 2 != 0,
            Test::Positive => n > 0,
            Test::Negative => n < 0,
            Test::Zero => n == 0,
            Test::GreaterThan => n > value,
            Test::LessThan => n < value,
            Test::EqualTo => n == value,
            Test::DivisibleBy if value == 0 => {
                return Err(format!("cannot check {} for divisibility by zero", n))
            }
            Test::DivisibleBy => n.wrapping_rem(value) == 0,
        })
    }
}

/// Quantifier applied to the whole list of numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantifierDefinition {
    pub kind: QuantifierKind,

    /// Threshold for `at_least`, `at_most` and `exactly`
    #[serde(default)]
    pub count: Option<usize>,

    #[serde(default)]
    pub statement: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantifierKind {
    All,
    Any,
    None,
    AtLeast,
    AtMost,
    Exactly,
}

impl QuantifierDefinition {
    fn quantifier(&self) -> Result<Quantifier> {
        let count = || {
            self.count
                .with_context(|| format!("Quantifier '{:?}' requires a count", self.kind))
        };

        Ok(match self.kind {
            QuantifierKind::All => Quantifier::All,
            QuantifierKind::Any => Quantifier::Any,
            QuantifierKind::None => Quantifier::NoneSatisfied,
            QuantifierKind::AtLeast => Quantifier::AtLeast(count()?),
            QuantifierKind::AtMost => Quantifier::AtMost(count()?),
            QuantifierKind::Exactly => Quantifier::Exactly(count()?),
        })
    }
}

/// A definition compiled into propositions.
pub enum Compiled {
    /// Evaluated once per number.
    Each(Spec<i64, String>),

    /// Evaluated once over all numbers.
    Collection(Spec<[i64], String>),
}

impl Compiled {
    pub fn description(&self) -> Description {
        match self {
            Compiled::Each(spec) => spec.description(),
            Compiled::Collection(spec) => spec.description(),
        }
    }
}

impl Definition {
    /// Load a definition from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = fs::read_to_string(path)
            .with_context(|| format!("Failed to read definition file {}", path.display()))?;
        Self::from_yaml(&yaml).with_context(|| format!("Invalid definition in {}", path.display()))
    }

    /// Parse and validate a definition from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let definition: Definition =
            serde_yaml::from_str(yaml).context("Failed to parse definition YAML")?;
        definition.validate()?;
        Ok(definition)
    }

    /// Check the structural rules serde cannot express.
    pub fn validate(&self) -> Result<()> {
        self.render.validate()?;
        self.proposition.validate()?;
        if let Some(quantifier) = &self.quantifier {
            quantifier.quantifier()?;
        }
        Ok(())
    }

    pub fn compile(&self) -> Result<Compiled> {
        let spec = self.proposition.build()?;

        match &self.quantifier {
            None => Ok(Compiled::Each(spec)),
            Some(definition) => {
                let quantifier = definition.quantifier()?;
                let statement = definition
                    .statement
                    .clone()
                    .unwrap_or_else(|| format!("{} of the numbers match", quantifier));
                tracing::debug!(%quantifier, %statement, "Compiled quantified definition");
                Ok(Compiled::Collection(spec.quantify(statement, quantifier)))
            }
        }
    }
}

impl Node {
    fn validate(&self) -> Result<()> {
        match self {
            Node::Check {
                test,
                value,
                when_true,
                when_false,
                ..
            } => {
                if test.needs_value() && value.is_none() {
                    bail!("Test '{:?}' requires a value", test);
                }
                check_explanations(when_true, when_false)
            }
            Node::And { operands }
            | Node::Or { operands }
            | Node::Xor { operands }
            | Node::AndAlso { operands }
            | Node::OrElse { operands } => {
                if operands.is_empty() {
                    bail!("Combinator nodes need at least one operand");
                }
                operands.iter().try_for_each(Node::validate)
            }
            Node::Not { operand } => operand.validate(),
            Node::Named {
                operand,
                when_true,
                when_false,
                ..
            } => {
                check_explanations(when_true, when_false)?;
                operand.validate()
            }
        }
    }

    /// Build the proposition tree for this node.
    pub fn build(&self) -> Result<Spec<i64, String>> {
        match self {
            Node::Check {
                test,
                value,
                statement,
                when_true,
                when_false,
            } => Ok(check(*test, *value, statement.clone(), when_true, when_false)),
            Node::And { operands } => fold(operands, |left, right| left & right),
            Node::Or { operands } => fold(operands, |left, right| left | right),
            Node::Xor { operands } => fold(operands, |left, right| left ^ right),
            Node::AndAlso { operands } => fold(operands, |left, right| left.and_also(&right)),
            Node::OrElse { operands } => fold(operands, |left, right| left.or_else(&right)),
            Node::Not { operand } => Ok(!operand.build()?),
            Node::Named {
                statement,
                operand,
                when_true,
                when_false,
            } => {
                let operand = operand.build()?;
                Ok(match (when_true.clone(), when_false.clone()) {
                    (Some(when_true), Some(when_false)) => Spec::new(Decorator::new(
                        statement.as_str(),
                        operand,
                        move |n: &i64, _: &BooleanResult<String>| {
                            vec![when_true.replace(MODEL_PLACEHOLDER, &n.to_string())]
                        },
                        move |n: &i64, _: &BooleanResult<String>| {
                            vec![when_false.replace(MODEL_PLACEHOLDER, &n.to_string())]
                        },
                    )),
                    _ => operand.named(statement.as_str()),
                })
            }
        }
    }
}

fn check_explanations(when_true: &Option<String>, when_false: &Option<String>) -> Result<()> {
    if when_true.is_some() != when_false.is_some() {
        bail!("'when_true' and 'when_false' must be given together");
    }
    Ok(())
}

fn fold<F>(operands: &[Node], combine: F) -> Result<Spec<i64, String>>
where
    F: Fn(Spec<i64, String>, Spec<i64, String>) -> Spec<i64, String>,
{
    let specs = operands.iter().map(Node::build).collect::<Result<Vec<_>>>()?;
    specs
        .into_iter()
        .reduce(combine)
        .context("Combinator nodes need at least one operand")
}

fn check(
    test: Test,
    value: Option<i64>,
    statement: Option<String>,
    when_true: &Option<String>,
    when_false: &Option<String>,
) -> Spec<i64, String> {
    let value = value.unwrap_or_default();
    let statement = statement.unwrap_or_else(|| test.statement(value));
    let predicate = move |n: &i64| test.holds(value, *n);

    match (when_true.clone(), when_false.clone()) {
        (Some(when_true), Some(when_false)) => Spec::new(Leaf::try_from_factories(
            statement,
            predicate,
            move |n: &i64| Ok(vec![when_true.replace(MODEL_PLACEHOLDER, &n.to_string())]),
            move |n: &i64| Ok(vec![when_false.replace(MODEL_PLACEHOLDER, &n.to_string())]),
        )),
        _ => Spec::new(Leaf::try_new(statement, predicate)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSITIVE_EVENS: &str = include_str!("../definitions/positive-evens.yaml");

    fn compile_each(yaml: &str) -> Spec<i64, String> {
        match Definition::from_yaml(yaml).unwrap().compile().unwrap() {
            Compiled::Each(spec) => spec,
            Compiled::Collection(_) => panic!("expected a per-number definition"),
        }
    }

    #[test]
    fn test_bundled_definition() {
        let spec = compile_each(POSITIVE_EVENS);

        let result = spec.is_satisfied_by(&-3).unwrap();
        assert!(!result.satisfied());
        assert_eq!(result.reason(), "-3 is odd & -3 is negative");

        assert!(spec.is_satisfied_by(&4).unwrap().satisfied());
        assert_eq!(spec.description().statement(), "is even & is positive");
    }

    #[test]
    fn test_generated_statements() {
        let spec = compile_each(
            r#"
proposition:
  kind: or
  operands:
    - kind: check
      test: greater_than
      value: 10
    - kind: not
      operand:
        kind: check
        test: divisible_by
        value: 3
"#,
        );

        assert_eq!(
            spec.description().statement(),
            "is greater than 10 | !is divisible by 3"
        );
        let result = spec.is_satisfied_by(&6).unwrap();
        assert!(!result.satisfied());
        assert_eq!(result.reason(), "!is greater than 10 | is divisible by 3");
    }

    #[test]
    fn test_operands_fold_left() {
        let spec = compile_each(
            r#"
proposition:
  kind: and_also
  operands:
    - kind: check
      test: positive
    - kind: check
      test: even
    - kind: check
      test: less_than
      value: 100
"#,
        );
        assert_eq!(
            spec.description().statement(),
            "is positive && is even && is less than 100"
        );
        assert_eq!(spec.is_satisfied_by(&-1).unwrap().reason(), "!is positive");
    }

    #[test]
    fn test_named_with_explanations() {
        let spec = compile_each(
            r#"
proposition:
  kind: named
  statement: is a small even
  when_true: "{model} is a small even number"
  when_false: "{model} is not a small even number"
  operand:
    kind: and
    operands:
      - kind: check
        test: even
      - kind: check
        test: less_than
        value: 10
"#,
        );

        let result = spec.is_satisfied_by(&12).unwrap();
        assert_eq!(result.reason(), "12 is not a small even number");
        assert_eq!(result.sub_assertions(), ["!is less than 10"]);
        assert_eq!(spec.is_satisfied_by(&4).unwrap().reason(), "4 is a small even number");
        assert_eq!(
            spec.description().detailed(),
            "is a small even {\n    is even & is less than 10\n}"
        );
    }

    #[test]
    fn test_division_by_zero_fails_at_evaluation() {
        let spec = compile_each(
            r#"
proposition:
  kind: check
  test: divisible_by
  value: 0
"#,
        );

        let error = spec.is_satisfied_by(&7).unwrap_err();
        assert_eq!(error.proposition(), "is divisible by 0");
        assert!(error.to_string().contains("divisibility by zero"));
    }

    #[test]
    fn test_quantified_definition() {
        let definition = Definition::from_yaml(
            r#"
proposition:
  kind: check
  test: even
quantifier:
  kind: at_least
  count: 2
"#,
        )
        .unwrap();

        let Compiled::Collection(spec) = definition.compile().unwrap() else {
            panic!("expected a quantified definition");
        };
        let result = spec.is_satisfied_by(&[1, 2, 3]).unwrap();
        assert!(!result.satisfied());
        assert_eq!(result.reason(), "!at least 2 of the numbers match");
        assert_eq!(
            result.description().detailed(),
            "!at least 2 of the numbers match {\n    2x !is even\n}"
        );
    }

    #[test]
    fn test_validation_errors() {
        let missing_value = "proposition:\n  kind: check\n  test: greater_than\n";
        assert!(Definition::from_yaml(missing_value).is_err());

        let empty_operands = "proposition:\n  kind: and\n  operands: []\n";
        assert!(Definition::from_yaml(empty_operands).is_err());

        let half_explained =
            "proposition:\n  kind: check\n  test: even\n  when_true: even\n";
        assert!(Definition::from_yaml(half_explained).is_err());

        let missing_count =
            "proposition:\n  kind: check\n  test: even\nquantifier:\n  kind: exactly\n";
        assert!(Definition::from_yaml(missing_count).is_err());

        let unknown_kind = "proposition:\n  kind: maybe\n";
        assert!(Definition::from_yaml(unknown_kind).is_err());

        let zero_width = "proposition:\n  kind: check\n  test: odd\nrender:\n  max_line_width: 0\n";
        assert!(Definition::from_yaml(zero_width).is_err());

        let huge_indent =
            "proposition:\n  kind: check\n  test: odd\nrender:\n  indent_width: 18446744073709551615\n";
        assert!(Definition::from_yaml(huge_indent).is_err());
    }

    #[test]
    fn test_render_section() {
        let definition =
            Definition::from_yaml("proposition:\n  kind: check\n  test: zero\nrender:\n  max_line_width: 40\n")
                .unwrap();
        assert_eq!(definition.render.max_line_width, 40);
        assert_eq!(definition.render.indent_width, 4);
    }
}
