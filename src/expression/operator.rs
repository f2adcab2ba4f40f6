//! Comparison operators and their default symbols
//!
//! Names and symbols follow the PostgREST operator vocabulary, targeting the
//! PostgreSQL dialect. Any name outside the table is carried as
//! [`Operator::Raw`] and rendered literally.

use ahash::AHashMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator of a leaf expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    /// Equal (=)
    Eq,
    /// Not equal (!=)
    Neq,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Gte,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Lte,
    /// Case-insensitive pattern match ( ilike )
    Like,
    /// Negated case-insensitive pattern match ( not ilike )
    NotLike,
    /// Regex match (~)
    Match,
    /// Negated regex match (!~)
    NotMatch,
    /// Case-insensitive regex match (~*)
    IMatch,
    /// Negated case-insensitive regex match (!~*)
    NotIMatch,
    /// Identity check ( is )
    Is,
    /// Negated identity check ( is not )
    IsNot,
    /// Membership ( in )
    In,
    /// Negated membership ( not in )
    NotIn,
    /// ltree path match (~)
    Ltree,
    /// Anything else, rendered as-is
    Raw(String),
}

/// Every operator with a table entry, in declaration order
pub const WELL_KNOWN: [Operator; 17] = [
    Operator::Eq,
    Operator::Neq,
    Operator::Gt,
    Operator::Gte,
    Operator::Lt,
    Operator::Lte,
    Operator::Like,
    Operator::NotLike,
    Operator::Match,
    Operator::NotMatch,
    Operator::IMatch,
    Operator::NotIMatch,
    Operator::Is,
    Operator::IsNot,
    Operator::In,
    Operator::NotIn,
    Operator::Ltree,
];

/// Name -> operator lookup, built once on first use
static OPERATOR_NAMES: Lazy<AHashMap<&'static str, Operator>> = Lazy::new(|| {
    let mut map = AHashMap::with_capacity(WELL_KNOWN.len());
    for op in WELL_KNOWN {
        map.insert(op.known_name(), op);
    }
    map
});

impl Operator {
    /// Resolve a name against the table; unknown names become `Raw`
    pub fn parse(name: &str) -> Self {
        OPERATOR_NAMES
            .get(name)
            .cloned()
            .unwrap_or_else(|| Operator::Raw(name.to_string()))
    }

    /// Name used in the serialized form
    pub fn name(&self) -> &str {
        match self {
            Operator::Raw(raw) => raw,
            known => known.known_name(),
        }
    }

    /// Default rendered symbol, falling back to the raw name
    pub fn symbol(&self) -> &str {
        match self {
            Operator::Raw(raw) => match OPERATOR_NAMES.get(raw.as_str()) {
                Some(op) => op.known_symbol(),
                None => raw,
            },
            known => known.known_symbol(),
        }
    }

    /// `Raw` spelling of a known name becomes the known variant
    pub fn normalized(self) -> Self {
        match self {
            Operator::Raw(raw) => Operator::from(raw),
            known => known,
        }
    }

    #[inline]
    pub fn is_raw(&self) -> bool {
        matches!(self, Operator::Raw(_))
    }

    fn known_name(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Like => "like",
            Operator::NotLike => "nlike",
            Operator::Match => "match",
            Operator::NotMatch => "nmatch",
            Operator::IMatch => "imatch",
            Operator::NotIMatch => "nimatch",
            Operator::Is => "is",
            Operator::IsNot => "nis",
            Operator::In => "in",
            Operator::NotIn => "nin",
            Operator::Ltree => "ltree",
            Operator::Raw(_) => "",
        }
    }

    fn known_symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Neq => "!=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Like => " ilike ",
            Operator::NotLike => " not ilike ",
            Operator::Match => "~",
            Operator::NotMatch => "!~",
            Operator::IMatch => "~*",
            Operator::NotIMatch => "!~*",
            Operator::Is => " is ",
            Operator::IsNot => " is not ",
            Operator::In => " in ",
            Operator::NotIn => " not in ",
            Operator::Ltree => "~",
            Operator::Raw(_) => "",
        }
    }
}

impl From<&str> for Operator {
    fn from(name: &str) -> Self {
        Operator::parse(name)
    }
}

impl From<String> for Operator {
    fn from(name: String) -> Self {
        match OPERATOR_NAMES.get(name.as_str()) {
            Some(op) => op.clone(),
            None => Operator::Raw(name),
        }
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        match op {
            Operator::Raw(raw) => raw,
            known => known.known_name().to_string(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
