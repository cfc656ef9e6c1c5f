//! Restricted `LHS OP RHS` condition evaluation.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::warn;

use crate::template::substitute;

/// Comparison operators accepted in workflow conditions.
///
/// Declaration order is the parse precedence: two-character operators come
/// before their one-character prefixes so `>=` is never read as `>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// `>=`
    GreaterOrEqual,
    /// `<=`
    LessOrEqual,
    /// `!=`
    NotEqual,
    /// `==`
    Equal,
    /// `>`
    Greater,
    /// `<`
    Less,
    /// `contains` — substring containment over string forms.
    Contains,
}

impl Comparator {
    /// All comparators in parse-precedence order, with their source tokens.
    const PRECEDENCE: [(&'static str, Self); 7] = [
        (">=", Self::GreaterOrEqual),
        ("<=", Self::LessOrEqual),
        ("!=", Self::NotEqual),
        ("==", Self::Equal),
        (">", Self::Greater),
        ("<", Self::Less),
        (" contains ", Self::Contains),
    ];

    /// Whether this comparator only makes sense on numbers.
    fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Greater | Self::Less | Self::GreaterOrEqual | Self::LessOrEqual
        )
    }
}

/// A side of a comparison after substitution and operand resolution.
#[derive(Debug, Clone, PartialEq)]
enum Operand {
    Number(f64),
    Text(String),
}

impl Operand {
    /// Resolve one side of a comparison.
    ///
    /// A bare identifier naming a variable resolves to that variable's
    /// value. Otherwise the side is a literal: numbers win, and anything
    /// else is a string with surrounding single or double quotes stripped.
    fn resolve(raw: &str, variables: &Map<String, Value>) -> Self {
        let trimmed = raw.trim();
        if let Some(value) = variables.get(trimmed) {
            return Self::from_value(value);
        }
        if let Ok(n) = trimmed.parse::<f64>() {
            return Self::Number(n);
        }
        Self::Text(strip_quotes(trimmed).to_string())
    }

    fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => n.as_f64().map_or_else(
                || Self::Text(n.to_string()),
                Self::Number,
            ),
            Value::String(s) => s
                .parse::<f64>()
                .map_or_else(|_| Self::Text(s.clone()), Self::Number),
            other => Self::Text(other.to_string()),
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    fn string_form(&self) -> String {
        match self {
            Self::Number(n) => {
                // Integral floats render without the trailing `.0` so that
                // `code contains 404` style checks see "404", not "404.0".
                if n.fract() == 0.0 && n.is_finite() {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            Self::Text(s) => s.clone(),
        }
    }
}

fn strip_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'\'' && last == b'\'') || (first == b'"' && last == b'"') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Characters a side of a comparison may contain after substitution.
///
/// This is the whole literal grammar: identifiers, numbers, quoted text
/// and a handful of punctuation common in emails, paths and timestamps.
/// Anything else (braces, parentheses, shell metacharacters) rejects the
/// expression outright.
static ALLOWED_OPERAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[A-Za-z0-9_ .,@:/'"+-]*$"#).unwrap());

/// Evaluate a `LHS OP RHS` condition against the given variables.
///
/// The expression is substituted first ([`substitute`]), then split on the
/// first operator found in precedence order. Each side that names a
/// variable resolves to its value; other sides parse as number or quoted
/// string literals. Numeric comparators require both sides to be numbers;
/// `==`/`!=` compare numerically when both sides are numbers and by
/// string otherwise; `contains` is substring containment over string
/// forms.
///
/// Never panics and never returns an error: malformed input, an unknown
/// operator, or characters outside the literal grammar all log a warning
/// and evaluate to `false`.
#[must_use]
pub fn evaluate_condition(expression: &str, variables: &Map<String, Value>) -> bool {
    let substituted = substitute(expression, variables);

    let Some((op, lhs_raw, rhs_raw)) = split_on_operator(&substituted) else {
        warn!(expression, substituted, "condition has no recognized operator");
        return false;
    };

    if !ALLOWED_OPERAND.is_match(lhs_raw) || !ALLOWED_OPERAND.is_match(rhs_raw) {
        warn!(
            expression,
            substituted, "condition operand contains characters outside the allowed grammar"
        );
        return false;
    }

    let lhs = Operand::resolve(lhs_raw, variables);
    let rhs = Operand::resolve(rhs_raw, variables);

    if op.is_numeric() {
        return match (lhs.as_number(), rhs.as_number()) {
            (Some(l), Some(r)) => match op {
                Comparator::Greater => l > r,
                Comparator::Less => l < r,
                Comparator::GreaterOrEqual => l >= r,
                Comparator::LessOrEqual => l <= r,
                _ => unreachable!("non-numeric comparator in numeric branch"),
            },
            _ => {
                warn!(
                    expression,
                    substituted, "numeric comparison on non-numeric operand"
                );
                false
            }
        };
    }

    match op {
        Comparator::Equal | Comparator::NotEqual => {
            let equal = match (lhs.as_number(), rhs.as_number()) {
                (Some(l), Some(r)) => l == r,
                _ => lhs.string_form() == rhs.string_form(),
            };
            (op == Comparator::NotEqual) != equal
        }
        Comparator::Contains => lhs.string_form().contains(&rhs.string_form()),
        _ => unreachable!("numeric comparator handled above"),
    }
}

/// Find the first operator in precedence order and split the expression
/// around its first occurrence.
fn split_on_operator(expression: &str) -> Option<(Comparator, &str, &str)> {
    for (token, op) in Comparator::PRECEDENCE {
        if let Some(idx) = expression.find(token) {
            let lhs = expression[..idx].trim();
            let rhs = expression[idx + token.len()..].trim();
            return Some((op, lhs, rhs));
        }
    }
    None
}
