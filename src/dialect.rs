//! Ready-made hook sets for target dialects

use crate::render::HookSet;
use serde_json::Value;

/// PostgreSQL quoting: keys as identifiers, values as literals
pub fn postgres() -> HookSet {
    HookSet::new()
        .with_render_key(|ctx| quote_identifier(&ctx.key))
        .with_render_value(|ctx| quote_literal(&ctx.value))
}

/// `"name"` with embedded double quotes doubled
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// SQL literal for a JSON value. Arrays become a parenthesized list, which
/// is what `in` / `not in` expect.
pub fn quote_literal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{}'", s.replace('\'', "''")),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(quote_literal).collect();
            format!("({})", items.join(","))
        }
        Value::Object(_) => format!("'{}'", value.to_string().replace('\'', "''")),
    }
}
