//! `{{name}}` placeholder substitution over strings and JSON trees.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};

/// Placeholder pattern: `{{ <identifier> }}`, whitespace permitted on
/// either side of the identifier inside the braces.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap()
});

/// Render a variable value into template text.
///
/// Strings substitute their raw contents; every other value substitutes
/// its compact JSON form.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Replace every `{{name}}` placeholder in `template` with the matching
/// variable's string form. Placeholders without a matching variable are
/// left as literals.
#[must_use]
pub fn substitute(template: &str, variables: &Map<String, Value>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let key = &caps[1];
            match variables.get(key) {
                Some(value) => stringify(value),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Apply [`substitute`] recursively to a JSON value.
///
/// Strings are substituted, arrays and objects are walked, and all other
/// scalars pass through unchanged.
#[must_use]
pub fn substitute_value(value: &Value, variables: &Map<String, Value>) -> Value {
    match value {
        Value::String(s) => Value::String(substitute(s, variables)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| substitute_value(item, variables))
                .collect(),
        ),
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), substitute_value(v, variables)))
                .collect(),
        ),
        other => other.clone(),
    }
}
