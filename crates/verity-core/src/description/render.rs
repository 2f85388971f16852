//! Compact and detailed rendering of expression trees.

use lazy_static::lazy_static;
use regex::Regex;

use crate::combinator::Operator;
use crate::config::RenderConfig;

use super::Expr;

lazy_static! {
    /// Punctuation that makes a negated statement ambiguous without brackets.
    static ref RESERVED_PUNCTUATION: Regex = Regex::new(r"[()!]").unwrap();
}

/// Check if a statement must be bracketed before it is negated.
pub(crate) fn needs_brackets(statement: &str) -> bool {
    RESERVED_PUNCTUATION.is_match(statement)
}

/// Negate a statement, bracketing it when it contains reserved punctuation.
pub(crate) fn negate_statement(statement: &str) -> String {
    if needs_brackets(statement) {
        format!("!({})", statement)
    } else {
        format!("!{}", statement)
    }
}

/// Render an expression on a single line.
pub(crate) fn compact(expr: &Expr) -> String {
    match expr {
        Expr::Atom { text, .. } => text.clone(),
        Expr::Group { operator, operands } => {
            let separator = format!(" {} ", operator.symbol());
            flatten(*operator, operands)
                .into_iter()
                .map(|operand| operand_text(*operator, operand))
                .collect::<Vec<_>>()
                .join(&separator)
        }
        Expr::Negate(operand) => negate(operand),
        Expr::Block { header, .. } => compact(header),
    }
}

fn negate(operand: &Expr) -> String {
    match operand {
        Expr::Atom {
            text,
            compound: false,
        } => negate_statement(text),
        Expr::Negate(_) => format!("!{}", compact(operand)),
        Expr::Block { header, .. } => negate(header),
        _ => format!("!({})", compact(operand)),
    }
}

fn operand_text(parent: Operator, operand: &Expr) -> String {
    let text = compact(operand);
    if needs_grouping(parent, operand) {
        format!("({})", text)
    } else {
        text
    }
}

fn needs_grouping(parent: Operator, operand: &Expr) -> bool {
    match operand {
        Expr::Atom { compound, .. } => *compound,
        Expr::Group { operator, .. } => operator.precedence() < parent.precedence(),
        Expr::Negate(_) => false,
        Expr::Block { header, .. } => needs_grouping(parent, header),
    }
}

/// Splice nested groups of the same operator into one operand list.
fn flatten(operator: Operator, operands: &[Expr]) -> Vec<&Expr> {
    let mut flat = Vec::with_capacity(operands.len());
    for operand in operands {
        match operand {
            Expr::Group {
                operator: nested,
                operands: inner,
            } if *nested == operator => flat.extend(flatten(operator, inner)),
            _ => flat.push(operand),
        }
    }
    flat
}

/// Render an expression as an indented multi-line block.
pub(crate) fn detailed(expr: &Expr, config: &RenderConfig) -> String {
    let mut lines = Vec::new();
    expand(expr, 0, config, &mut lines);
    lines.join("\n")
}

fn expand(expr: &Expr, depth: usize, config: &RenderConfig, lines: &mut Vec<String>) {
    let indent = config.indentation(depth);

    match expr {
        Expr::Atom { .. } => lines.push(format!("{}{}", indent, compact(expr))),
        Expr::Group { operator, operands } => {
            lines.push(format!("{}{}", indent, operator.label()));
            for operand in flatten(*operator, operands) {
                inline_or_expand(operand, depth + 1, config, lines);
            }
        }
        Expr::Negate(operand) => match operand.as_ref() {
            Expr::Group { .. } | Expr::Block { .. } => {
                lines.push(format!("{}NOT", indent));
                inline_or_expand(operand, depth + 1, config, lines);
            }
            _ => lines.push(format!("{}{}", indent, compact(expr))),
        },
        Expr::Block { header, body } => {
            if body.is_empty() {
                lines.push(format!("{}{}", indent, compact(header)));
                return;
            }
            lines.push(format!("{}{} {{", indent, compact(header)));
            for item in body {
                inline_or_expand(item, depth + 1, config, lines);
            }
            lines.push(format!("{}}}", indent));
        }
    }
}

fn inline_or_expand(expr: &Expr, depth: usize, config: &RenderConfig, lines: &mut Vec<String>) {
    let text = compact(expr);
    if matches!(expr, Expr::Atom { .. }) || text.chars().count() <= config.max_line_width {
        lines.push(format!("{}{}", config.indentation(depth), text));
    } else {
        expand(expr, depth, config, lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(text: &str) -> Expr {
        Expr::atom(text)
    }

    fn group(operator: Operator, operands: Vec<Expr>) -> Expr {
        Expr::Group { operator, operands }
    }

    #[test]
    fn test_reserved_punctuation() {
        assert!(needs_brackets("is true (with brackets)"));
        assert!(needs_brackets("wow!"));
        assert!(!needs_brackets("is even"));
        assert_eq!(negate_statement("is even"), "!is even");
        assert_eq!(negate_statement("is true (with brackets)"), "!(is true (with brackets))");
    }

    #[test]
    fn test_compound_atoms_are_bracketed_inside_groups() {
        let expr = group(
            Operator::Or,
            vec![Expr::assertions(&["a".to_string(), "b".to_string()]), atom("c")],
        );
        assert_eq!(compact(&expr), "(a, b) | c");
    }

    #[test]
    fn test_long_chain_has_no_nested_brackets() {
        let expr = group(
            Operator::Or,
            vec![
                group(Operator::Or, vec![group(Operator::Or, vec![atom("a"), atom("b")]), atom("c")]),
                atom("d"),
            ],
        );
        assert_eq!(compact(&expr), "a | b | c | d");
    }

    #[test]
    fn test_short_operands_stay_inline() {
        let expr = group(
            Operator::And,
            vec![group(Operator::Or, vec![atom("a"), atom("b")]), atom("c")],
        );
        assert_eq!(detailed(&expr, &RenderConfig::default()), "AND\n    a | b\n    c");
    }

    #[test]
    fn test_long_operands_are_expanded() {
        let expr = group(
            Operator::And,
            vec![
                group(Operator::Or, vec![atom("first long operand"), atom("second long operand")]),
                atom("c"),
            ],
        );
        let config = RenderConfig::with_max_line_width(20);
        assert_eq!(
            detailed(&expr, &config),
            "AND\n    OR\n        first long operand\n        second long operand\n    c"
        );
    }

    #[test]
    fn test_operand_at_the_width_limit_stays_inline() {
        // "abc | def" is 9 characters
        let expr = group(
            Operator::And,
            vec![group(Operator::Or, vec![atom("abc"), atom("def")]), atom("c")],
        );
        assert_eq!(
            detailed(&expr, &RenderConfig::with_max_line_width(9)),
            "AND\n    abc | def\n    c"
        );
    }

    #[test]
    fn test_operand_one_past_the_width_limit_is_expanded() {
        let expr = group(
            Operator::And,
            vec![group(Operator::Or, vec![atom("abc"), atom("def")]), atom("c")],
        );
        assert_eq!(
            detailed(&expr, &RenderConfig::with_max_line_width(8)),
            "AND\n    OR\n        abc\n        def\n    c"
        );
    }

    #[test]
    fn test_block_layout() {
        let expr = Expr::Block {
            header: Box::new(atom("all are true")),
            body: vec![atom("3x true")],
        };
        assert_eq!(compact(&expr), "all are true");
        assert_eq!(detailed(&expr, &RenderConfig::default()), "all are true {\n    3x true\n}");
    }

    #[test]
    fn test_rendering_is_repeatable() {
        let expr = group(
            Operator::Xor,
            vec![atom("a"), group(Operator::OrElse, vec![atom("b"), atom("c")])],
        );
        assert_eq!(compact(&expr), compact(&expr));
        assert_eq!(compact(&expr), "a ^ (b || c)");
    }
}
