//! Parse tree for EVAL programs

pub mod nodes;
pub mod visitor;

pub use nodes::*;
pub use visitor::{walk, Node, NodeCounter, TreePrinter, Visitor};
