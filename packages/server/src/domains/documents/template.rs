//! Variable substitution for format body templates.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

lazy_static! {
    // Non-greedy so "{{a}} and {{b}}" yields two tokens, not one.
    static ref TOKEN: Regex = Regex::new(r"\{\{(.*?)\}\}").unwrap();
}

/// Replace every `{{key}}` token in `template` with the string coercion of
/// `data[key]`.
///
/// Keys are whitespace-trimmed. Missing keys and JSON null collapse to the
/// empty string; a token never renders as literal `null` and never raises.
/// No recursive substitution, and no HTML escaping: template authors are
/// trusted, raw text passes through.
pub fn substitute(template: &str, data: &Map<String, Value>) -> String {
    TOKEN
        .replace_all(template, |caps: &Captures| {
            let key = caps[1].trim();
            match data.get(key) {
                None | Some(Value::Null) => String::new(),
                Some(value) => coerce(value),
            }
        })
        .into_owned()
}

fn coerce(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        // Compound values are tolerated extras; render compact JSON.
        other => other.to_string(),
    }
}
