//! Condition tree: ordered slots joined by `and`/`or`

use crate::condition::ast::{JoinOperator, Payload, Slot};
use crate::error::{ConditionError, Result};
use crate::expression::{Expression, ExpressionContext, Operator};
use crate::render::{HookSet, RenderHooks};
use crate::serializer::{self, SlotRecord};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// High level structure combining expressions and nested conditions
///
/// Slots are append-only. Appending with join `J` rewrites the join of the
/// previous last slot to `J`, since a slot's join sits between it and its
/// successor.
#[derive(Debug, Clone, Default)]
pub struct Condition {
    slots: Vec<Slot>,
    hooks: Arc<HookSet>,
}

impl Condition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty condition whose expressions are validated and rendered with `hooks`
    pub fn with_hooks(hooks: impl Into<Arc<HookSet>>) -> Self {
        Self {
            slots: Vec::new(),
            hooks: hooks.into(),
        }
    }

    pub fn hooks(&self) -> &Arc<HookSet> {
        &self.hooks
    }

    /// Replace the hook set. Only slots appended afterwards are affected.
    pub fn set_hooks(&mut self, hooks: impl Into<Arc<HookSet>>) {
        self.hooks = hooks.into();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Adds data as a new expression joined with _and_
    pub fn and(
        &mut self,
        key: impl Into<String>,
        operator: impl Into<Operator>,
        value: impl Into<Value>,
    ) -> Result<&mut Self> {
        self.append_expression(context(key, operator, value), JoinOperator::And)
    }

    /// Adds data as a new expression joined with _or_
    pub fn or(
        &mut self,
        key: impl Into<String>,
        operator: impl Into<Operator>,
        value: impl Into<Value>,
    ) -> Result<&mut Self> {
        self.append_expression(context(key, operator, value), JoinOperator::Or)
    }

    /// Adds a nested condition joined with _and_
    pub fn and_condition(&mut self, condition: Condition) -> &mut Self {
        self.append_condition(condition, JoinOperator::And)
    }

    /// Adds a nested condition joined with _or_
    pub fn or_condition(&mut self, condition: Condition) -> &mut Self {
        self.append_condition(condition, JoinOperator::Or)
    }

    /// Build an expression with this condition's hooks and append it.
    ///
    /// Validation happens before any slot is touched, so a rejected
    /// expression leaves the condition unchanged.
    pub fn append_expression(
        &mut self,
        context: ExpressionContext,
        join: JoinOperator,
    ) -> Result<&mut Self> {
        let expression = Expression::from_context(context, Arc::clone(&self.hooks))?;
        Ok(self.append(Payload::Expression(expression), join))
    }

    /// Append a nested condition. The child's hook set is replaced by this
    /// condition's (last attacher wins); expressions it already holds keep
    /// the hooks they were built with.
    pub fn append_condition(&mut self, mut condition: Condition, join: JoinOperator) -> &mut Self {
        condition.hooks = Arc::clone(&self.hooks);
        self.append(Payload::Condition(condition), join)
    }

    fn append(&mut self, payload: Payload, join: JoinOperator) -> &mut Self {
        // fix up the predecessor's trailing join, then push
        if let Some(previous) = self.slots.last_mut() {
            previous.join = join;
        }
        self.slots.push(Slot { join, payload });

        tracing::trace!(slots = self.slots.len(), %join, "slot appended");
        self
    }

    /// Set the join stored on the slot at `index`
    pub fn set_operator(&mut self, index: usize, join: JoinOperator) -> Result<&mut Self> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(ConditionError::IndexOutOfRange { index, len })?;
        slot.join = join;
        Ok(self)
    }

    /// Canonical record form, including the unused trailing join
    pub fn to_record(&self) -> Vec<SlotRecord> {
        self.slots
            .iter()
            .map(|slot| match &slot.payload {
                Payload::Expression(e) => SlotRecord::from_expression(slot.join, e.to_record()),
                Payload::Condition(c) => SlotRecord::from_condition(slot.join, c.to_record()),
            })
            .collect()
    }

    /// Render to text. Nested conditions are always parenthesized and the
    /// last slot's join is dropped.
    pub fn render(&self, overrides: Option<&RenderHooks>) -> String {
        let mut out = String::new();
        let last = self.slots.len().saturating_sub(1);

        for (i, slot) in self.slots.iter().enumerate() {
            match &slot.payload {
                Payload::Expression(e) => out.push_str(&e.render(overrides)),
                Payload::Condition(c) => {
                    out.push('(');
                    out.push_str(&c.render(overrides));
                    out.push(')');
                }
            }
            if i < last {
                out.push(' ');
                out.push_str(slot.join.as_str());
                out.push(' ');
            }
        }

        out
    }

    /// Compact JSON encoding of [`Condition::to_record`]
    pub fn dump(&self) -> Result<String> {
        serializer::dump(self)
    }

    /// Inverse of [`Condition::dump`]
    pub fn restore(encoded: &str, hooks: Option<Arc<HookSet>>) -> Result<Self> {
        serializer::restore(encoded, hooks)
    }
}

fn context(
    key: impl Into<String>,
    operator: impl Into<Operator>,
    value: impl Into<Value>,
) -> ExpressionContext {
    ExpressionContext {
        key: key.into(),
        operator: operator.into(),
        value: value.into(),
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(None))
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}
