//! Condition tree module
//!
//! This module holds the composite condition: an ordered sequence of slots,
//! each an expression or a nested condition, joined by `and`/`or`.

mod ast;
mod tree;


pub use ast::*;
pub use tree::*;
