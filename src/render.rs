//! Hook sets and layered render resolution
//!
//! Every hook is resolved per name as `call-site override -> node hook set ->
//! built-in default`. Nothing here is global: two trees with different hook
//! sets never observe each other.

use crate::error::Result;
use crate::expression::ExpressionContext;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Validates expression data at construction time
pub type Validator = Arc<dyn Fn(&ExpressionContext) -> Result<()> + Send + Sync>;

/// Renders one part (key, operator or value) of an expression
pub type Renderer = Arc<dyn Fn(&ExpressionContext) -> String + Send + Sync>;

/// Renders a whole expression; `None` or an empty string falls through to
/// the key/operator/value composition
pub type ExpressionRenderer = Arc<dyn Fn(&ExpressionContext) -> Option<String> + Send + Sync>;

/// Render-only hooks, usable as a call-site override
#[derive(Clone, Default)]
pub struct RenderHooks {
    pub render_key: Option<Renderer>,
    pub render_value: Option<Renderer>,
    pub render_operator: Option<Renderer>,
    pub render_expression: Option<ExpressionRenderer>,
}

impl RenderHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_render_key<F>(mut self, f: F) -> Self
    where
        F: Fn(&ExpressionContext) -> String + Send + Sync + 'static,
    {
        self.render_key = Some(Arc::new(f));
        self
    }

    pub fn with_render_value<F>(mut self, f: F) -> Self
    where
        F: Fn(&ExpressionContext) -> String + Send + Sync + 'static,
    {
        self.render_value = Some(Arc::new(f));
        self
    }

    pub fn with_render_operator<F>(mut self, f: F) -> Self
    where
        F: Fn(&ExpressionContext) -> String + Send + Sync + 'static,
    {
        self.render_operator = Some(Arc::new(f));
        self
    }

    pub fn with_render_expression<F>(mut self, f: F) -> Self
    where
        F: Fn(&ExpressionContext) -> Option<String> + Send + Sync + 'static,
    {
        self.render_expression = Some(Arc::new(f));
        self
    }

    /// Render `ctx`, consulting `overrides` before `self` and the built-in
    /// defaults last
    pub fn render(&self, ctx: &ExpressionContext, overrides: Option<&RenderHooks>) -> String {
        if let Some(render_expression) =
            resolve(overrides, self, |h| h.render_expression.as_ref())
        {
            match render_expression(ctx) {
                Some(rendered) if !rendered.is_empty() => return rendered,
                _ => {}
            }
        }

        let key = match resolve(overrides, self, |h| h.render_key.as_ref()) {
            Some(render_key) => render_key(ctx),
            None => default_key(ctx),
        };
        let operator = match resolve(overrides, self, |h| h.render_operator.as_ref()) {
            Some(render_operator) => render_operator(ctx),
            None => default_operator(ctx),
        };
        let value = match resolve(overrides, self, |h| h.render_value.as_ref()) {
            Some(render_value) => render_value(ctx),
            None => default_value(ctx),
        };

        let mut out = String::with_capacity(key.len() + operator.len() + value.len());
        out.push_str(&key);
        out.push_str(&operator);
        out.push_str(&value);
        out
    }
}

/// Validation plus rendering hooks attached to a node
#[derive(Clone, Default)]
pub struct HookSet {
    pub validate: Option<Validator>,
    pub render: RenderHooks,
}

impl HookSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&ExpressionContext) -> Result<()> + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(f));
        self
    }

    pub fn with_render_key<F>(mut self, f: F) -> Self
    where
        F: Fn(&ExpressionContext) -> String + Send + Sync + 'static,
    {
        self.render = self.render.with_render_key(f);
        self
    }

    pub fn with_render_value<F>(mut self, f: F) -> Self
    where
        F: Fn(&ExpressionContext) -> String + Send + Sync + 'static,
    {
        self.render = self.render.with_render_value(f);
        self
    }

    pub fn with_render_operator<F>(mut self, f: F) -> Self
    where
        F: Fn(&ExpressionContext) -> String + Send + Sync + 'static,
    {
        self.render = self.render.with_render_operator(f);
        self
    }

    pub fn with_render_expression<F>(mut self, f: F) -> Self
    where
        F: Fn(&ExpressionContext) -> Option<String> + Send + Sync + 'static,
    {
        self.render = self.render.with_render_expression(f);
        self
    }

    /// Run the validator, if any
    pub fn validate(&self, ctx: &ExpressionContext) -> Result<()> {
        match &self.validate {
            Some(validate) => validate(ctx),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for RenderHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderHooks")
            .field("render_key", &self.render_key.is_some())
            .field("render_value", &self.render_value.is_some())
            .field("render_operator", &self.render_operator.is_some())
            .field("render_expression", &self.render_expression.is_some())
            .finish()
    }
}

impl fmt::Debug for HookSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookSet")
            .field("validate", &self.validate.is_some())
            .field("render", &self.render)
            .finish()
    }
}

#[inline]
fn resolve<'a, T: ?Sized>(
    overrides: Option<&'a RenderHooks>,
    node: &'a RenderHooks,
    pick: impl Fn(&'a RenderHooks) -> Option<&'a T>,
) -> Option<&'a T> {
    overrides.and_then(&pick).or_else(|| pick(node))
}

fn default_key(ctx: &ExpressionContext) -> String {
    ctx.key.clone()
}

fn default_operator(ctx: &ExpressionContext) -> String {
    ctx.operator.symbol().to_string()
}

fn default_value(ctx: &ExpressionContext) -> String {
    stringify_value(&ctx.value)
}

/// Plain textual form of a value, without any quoting
pub fn stringify_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(stringify_value)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}
