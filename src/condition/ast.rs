//! Slot structure of a condition tree

use crate::condition::Condition;
use crate::expression::Expression;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operator used to logically combine sibling slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinOperator {
    #[default]
    And,
    Or,
}

impl JoinOperator {
    /// Literal token placed between two rendered slots
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            JoinOperator::And => "and",
            JoinOperator::Or => "or",
        }
    }
}

impl fmt::Display for JoinOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content of a slot: a leaf or a whole sub-tree
#[derive(Debug, Clone)]
pub enum Payload {
    Expression(Expression),
    Condition(Condition),
}

/// One child of a condition plus the join rendered *after* it
///
/// The join of the last slot is never rendered; it is kept only so the
/// record form stays stable.
#[derive(Debug, Clone)]
pub struct Slot {
    pub(crate) join: JoinOperator,
    pub(crate) payload: Payload,
}

impl Slot {
    #[inline]
    pub fn join_operator(&self) -> JoinOperator {
        self.join
    }

    #[inline]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn expression(&self) -> Option<&Expression> {
        match &self.payload {
            Payload::Expression(e) => Some(e),
            Payload::Condition(_) => None,
        }
    }

    pub fn condition(&self) -> Option<&Condition> {
        match &self.payload {
            Payload::Condition(c) => Some(c),
            Payload::Expression(_) => None,
        }
    }
}
