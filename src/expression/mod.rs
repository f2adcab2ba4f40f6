//! Leaf expressions: a single `key operator value` predicate
//!
//! An expression is validated exactly once, when it is constructed, against
//! the hook set it is created with. Rendering goes through the layered hook
//! resolution in [`crate::render`].

mod operator;

pub use operator::*;

use crate::error::{ConditionError, Result};
use crate::render::{HookSet, RenderHooks};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Core expression data, handed to every hook and used as the record form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionContext {
    pub key: String,
    pub operator: Operator,
    pub value: Value,
}

/// Base condition building block
#[derive(Debug, Clone)]
pub struct Expression {
    context: ExpressionContext,
    hooks: Arc<HookSet>,
}

impl Expression {
    /// Build and validate an expression with the given hook set
    pub fn new(
        key: impl Into<String>,
        operator: impl Into<Operator>,
        value: impl Into<Value>,
        hooks: Arc<HookSet>,
    ) -> Result<Self> {
        Self::from_context(
            ExpressionContext {
                key: key.into(),
                operator: operator.into(),
                value: value.into(),
            },
            hooks,
        )
    }

    /// Build from already-assembled data; validation runs here and only here
    pub fn from_context(mut context: ExpressionContext, hooks: Arc<HookSet>) -> Result<Self> {
        context.operator = context.operator.normalized();
        if context.operator.name().is_empty() {
            return Err(ConditionError::ContractViolation(format!(
                "missing operator for key '{}'",
                context.key
            )));
        }

        if let Err(err) = hooks.validate(&context) {
            tracing::debug!(
                key = %context.key,
                operator = %context.operator,
                error = %err,
                "expression rejected by validator"
            );
            return Err(err);
        }

        Ok(Self { context, hooks })
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.context.key
    }

    #[inline]
    pub fn operator(&self) -> &Operator {
        &self.context.operator
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.context.value
    }

    #[inline]
    pub fn context(&self) -> &ExpressionContext {
        &self.context
    }

    pub fn hooks(&self) -> &Arc<HookSet> {
        &self.hooks
    }

    /// Canonical snapshot, independent of hooks
    pub fn to_record(&self) -> ExpressionContext {
        self.context.clone()
    }

    /// Render with optional call-site overrides
    pub fn render(&self, overrides: Option<&RenderHooks>) -> String {
        self.hooks.render.render(&self.context, overrides)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(None))
    }
}
