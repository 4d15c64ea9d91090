//! Lexical analysis for EVAL sources
//!
//! Produces the full token list, hidden whitespace and comments included, and
//! reports recognition errors through an [`ErrorListener`].

pub mod analyzer;

pub use analyzer::{LexerError, LexicalAnalyzer, LexicalMetrics};

use crate::syntax::listener::ErrorListener;
use crate::tokens::TokenStream;

/// Tokenize with preferences taken from the environment
pub fn tokenize(source: &str, listener: &mut dyn ErrorListener) -> TokenStream {
    let mut analyzer = LexicalAnalyzer::new();
    TokenStream::new(analyzer.tokenize(source, listener))
}
