//! Shared source-location types and pattern helpers for the analyzers

pub mod patterns;
pub mod span;

pub use span::{Position, Span, Spanned};
