//! Condition Builder - incremental and/or filter expressions
//!
//! Build nested boolean conditions out of `key operator value` expressions,
//! render them to text through pluggable hooks, and dump/restore them as a
//! JSON record form.
//!
//! ```
//! use condition_builder::Condition;
//!
//! let mut nested = Condition::new();
//! nested.and("e", "lt", "f")?.and("g", "eq", "h")?;
//!
//! let mut c = Condition::new();
//! c.and("a", "eq", "b")?.or("c", "neq", "d")?.or_condition(nested);
//! assert_eq!(c.to_string(), "a=b or c!=d or (e<f and g=h)");
//!
//! let restored = Condition::restore(&c.dump()?, None)?;
//! assert_eq!(restored.to_string(), c.to_string());
//! # Ok::<(), condition_builder::ConditionError>(())
//! ```

pub mod condition;
pub mod dialect;
pub mod error;
pub mod expression;
pub mod render;
pub mod serializer;

pub use crate::condition::{Condition, JoinOperator, Payload, Slot};
pub use crate::error::{ConditionError, Result};
pub use crate::expression::{Expression, ExpressionContext, Operator};
pub use crate::render::{HookSet, RenderHooks};
pub use crate::serializer::{dump, dump_pretty, restore, restore_records, SlotRecord};
