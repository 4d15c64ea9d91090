//! EVAL grammar: keywords, parse-tree nodes and the rule builders

pub mod ast;
pub mod builders;
pub mod keywords;

pub use ast::{nodes::*, Node, Visitor};
pub use keywords::{is_reserved_keyword, Keyword};
