//! Record form of a condition and its JSON dump/restore
//!
//! A record slot's `joinOperator` is the join placed *after* that slot. When
//! a condition is rebuilt by replaying appends, slot `i` is therefore
//! appended with the join stored on slot `i - 1` (and the default join for
//! the first slot), never with its own.

use crate::condition::{Condition, JoinOperator};
use crate::error::{ConditionError, Result};
use crate::expression::ExpressionContext;
use crate::render::HookSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One serialized slot: exactly one of `expression` or `condition`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotRecord {
    /// Older dumps name this field `operator`
    #[serde(rename = "joinOperator", alias = "operator")]
    pub join_operator: JoinOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<ExpressionContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Vec<SlotRecord>>,
}

impl SlotRecord {
    pub fn from_expression(join_operator: JoinOperator, expression: ExpressionContext) -> Self {
        Self {
            join_operator,
            expression: Some(expression),
            condition: None,
        }
    }

    pub fn from_condition(join_operator: JoinOperator, condition: Vec<SlotRecord>) -> Self {
        Self {
            join_operator,
            expression: None,
            condition: Some(condition),
        }
    }
}

/// Compact JSON encoding of the condition's record form
pub fn dump(condition: &Condition) -> Result<String> {
    Ok(serde_json::to_string(&condition.to_record())?)
}

/// Indented JSON encoding of the condition's record form
pub fn dump_pretty(condition: &Condition) -> Result<String> {
    Ok(serde_json::to_string_pretty(&condition.to_record())?)
}

/// Rebuild a condition from its JSON encoding
///
/// `hooks` apply to every node created, nested ones included. The first
/// validation failure or malformed record aborts the whole restore.
pub fn restore(encoded: &str, hooks: Option<Arc<HookSet>>) -> Result<Condition> {
    let records: Vec<SlotRecord> = serde_json::from_str(encoded)?;
    restore_records(&records, hooks)
}

/// Rebuild a condition from already-decoded records
pub fn restore_records(records: &[SlotRecord], hooks: Option<Arc<HookSet>>) -> Result<Condition> {
    let hooks = hooks.unwrap_or_default();
    tracing::debug!(slots = records.len(), "restoring condition");

    let condition = replay(records, &hooks, 0)?;

    tracing::debug!(slots = condition.len(), "condition restored");
    Ok(condition)
}

fn replay(records: &[SlotRecord], hooks: &Arc<HookSet>, depth: usize) -> Result<Condition> {
    let mut condition = Condition::with_hooks(Arc::clone(hooks));
    let mut join = JoinOperator::default();

    for (index, record) in records.iter().enumerate() {
        match (&record.expression, &record.condition) {
            (Some(expression), None) => {
                condition.append_expression(expression.clone(), join)?;
            }
            (None, Some(nested)) => {
                let nested = replay(nested, hooks, depth + 1)?;
                condition.append_condition(nested, join);
            }
            (None, None) => {
                tracing::debug!(index, depth, "record has neither expression nor condition");
                return Err(ConditionError::MalformedEncoding(format!(
                    "neither 'condition' nor 'expression' found at index {index}"
                )));
            }
            (Some(_), Some(_)) => {
                tracing::debug!(index, depth, "record has both expression and condition");
                return Err(ConditionError::MalformedEncoding(format!(
                    "both 'condition' and 'expression' found at index {index}"
                )));
            }
        }
        join = record.join_operator;
    }

    // the trailing join is never rendered, but keep it for a stable record
    if let Some(last) = records.last() {
        condition.set_operator(records.len() - 1, last.join_operator)?;
    }

    Ok(condition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Operator;
    use serde_json::json;

    fn scenario() -> Condition {
        let mut inner = Condition::new();
        inner.and("i", "match", "j").unwrap().and("k", "nmatch", "l").unwrap();

        let mut middle = Condition::new();
        middle.and("e", "lt", "f").unwrap().and("g", "eq", "h").unwrap();
        middle.or_condition(inner);

        let mut c = Condition::new();
        c.and("a", "eq", "b").unwrap();
        c.or("c", "neq", "d").unwrap();
        c.or_condition(middle);
        c
    }

    #[test]
    fn test_end_to_end_round_trip() {
        let c = scenario();
        let expected = "a=b or c!=d or (e<f and g=h or (i~j and k!~l))";
        assert_eq!(c.to_string(), expected);

        let restored = restore(&dump(&c).unwrap(), None).unwrap();
        assert_eq!(restored.to_string(), expected);
        assert_eq!(restored.to_record(), c.to_record());
    }

    #[test]
    fn test_dump_shape() {
        let mut c = Condition::new();
        c.and("a", "eq", "b").unwrap().or("n", "gt", 3).unwrap();

        let value: serde_json::Value = serde_json::from_str(&dump(&c).unwrap()).unwrap();
        assert_eq!(
            value,
            json!([
                {"joinOperator": "or", "expression": {"key": "a", "operator": "eq", "value": "b"}},
                {"joinOperator": "or", "expression": {"key": "n", "operator": "gt", "value": 3}}
            ])
        );
    }

    #[test]
    fn test_empty_round_trip() {
        let c = Condition::new();
        assert_eq!(dump(&c).unwrap(), "[]");

        let restored = restore("[]", None).unwrap();
        assert!(restored.is_empty());
        assert_eq!(restored.to_string(), "");
    }

    #[test]
    fn test_join_taken_from_previous_record() {
        // and-then-or: the first record carries "or", the second is trailing
        let encoded = r#"[
            {"joinOperator": "or", "expression": {"key": "a", "operator": "eq", "value": 1}},
            {"joinOperator": "and", "expression": {"key": "b", "operator": "eq", "value": 2}},
            {"joinOperator": "and", "expression": {"key": "c", "operator": "eq", "value": 3}}
        ]"#;
        let restored = restore(encoded, None).unwrap();
        assert_eq!(restored.to_string(), "a=1 or b=2 and c=3");
    }

    #[test]
    fn test_trailing_join_is_preserved() {
        let mut c = Condition::new();
        c.or("a", "eq", 1).unwrap();

        let restored = restore(&dump(&c).unwrap(), None).unwrap();
        assert_eq!(restored.slots()[0].join_operator(), JoinOperator::Or);
        assert_eq!(dump(&restored).unwrap(), dump(&c).unwrap());
    }

    #[test]
    fn test_nested_first_slot_keeps_join() {
        let mut sub = Condition::new();
        sub.or("x", "eq", 1).unwrap();
        let mut c = Condition::new();
        c.and_condition(sub).and("y", "eq", 2).unwrap();

        let restored = restore(&dump(&c).unwrap(), None).unwrap();
        assert_eq!(restored.to_record(), c.to_record());
        assert_eq!(restored.to_string(), "(x=1) and y=2");
    }

    #[test]
    fn test_float_values_round_trip() {
        let values = [
            1.0715660391465826e-75,
            -1.81996730402717e-179,
            -1.603964615428183e143,
            -9.643915712060552e-234,
            0.1,
        ];
        let mut c = Condition::new();
        for (i, v) in values.iter().enumerate() {
            c.and(format!("f{i}"), "eq", *v).unwrap();
        }

        let restored = restore(&dump(&c).unwrap(), None).unwrap();
        assert_eq!(restored.to_record(), c.to_record());
        assert_eq!(restored.to_string(), c.to_string());
    }

    #[test]
    fn test_raw_known_operator_round_trip() {
        let mut c = Condition::new();
        c.and("a", Operator::Raw("eq".to_string()), 1).unwrap();

        let restored = restore(&dump(&c).unwrap(), None).unwrap();
        assert_eq!(restored.to_record(), c.to_record());
        assert_eq!(restored.to_string(), "a=1");
    }

    #[test]
    fn test_legacy_operator_key() {
        let encoded = r#"[
            {"operator": "or", "expression": {"key": "a", "operator": "eq", "value": "b"}},
            {"operator": "or", "expression": {"key": "c", "operator": "neq", "value": "d"}}
        ]"#;
        let restored = restore(encoded, None).unwrap();
        assert_eq!(restored.to_string(), "a=b or c!=d");
    }

    #[test]
    fn test_malformed_record_is_rejected() {
        let err = restore(r#"[{"joinOperator": "and"}]"#, None).unwrap_err();
        assert!(matches!(err, ConditionError::MalformedEncoding(_)));

        let nested = r#"[{"joinOperator": "and", "condition": [{"joinOperator": "or"}]}]"#;
        let err = restore(nested, None).unwrap_err();
        assert!(matches!(err, ConditionError::MalformedEncoding(_)));
    }

    #[test]
    fn test_record_with_both_payloads_is_rejected() {
        let encoded = r#"[{
            "joinOperator": "and",
            "expression": {"key": "a", "operator": "eq", "value": 1},
            "condition": []
        }]"#;
        let err = restore(encoded, None).unwrap_err();
        assert!(matches!(err, ConditionError::MalformedEncoding(_)));
    }

    #[test]
    fn test_invalid_json_is_deserialization_error() {
        let err = restore("{not json", None).unwrap_err();
        assert!(matches!(err, ConditionError::Deserialization(_)));
    }

    #[test]
    fn test_hooks_apply_to_nested_nodes() {
        let hooks = Arc::new(HookSet::new().with_render_key(|ctx| ctx.key.to_uppercase()));
        let restored = restore(&dump(&scenario()).unwrap(), Some(hooks)).unwrap();
        assert_eq!(
            restored.to_string(),
            "A=b or C!=d or (E<f and G=h or (I~j and K!~l))"
        );
    }

    #[test]
    fn test_validation_failure_aborts_restore() {
        let hooks = Arc::new(HookSet::new().with_validate(|ctx| {
            if ctx.key == "k" {
                Err(ConditionError::validation("k is forbidden"))
            } else {
                Ok(())
            }
        }));
        let err = restore(&dump(&scenario()).unwrap(), Some(hooks)).unwrap_err();
        assert!(matches!(err, ConditionError::Validation(_)));
    }

    #[test]
    fn test_dump_pretty_restores() {
        let c = scenario();
        let restored = restore(&dump_pretty(&c).unwrap(), None).unwrap();
        assert_eq!(restored.to_record(), c.to_record());
    }
}
