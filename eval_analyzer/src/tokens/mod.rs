//! Token definitions and the parser-facing token stream

pub mod token;
pub mod token_stream;

pub use token::{classify_operator_symbol, classify_word, Token, TokenClass};
pub use token_stream::{SpannedToken, TokenStream, TokenStreamError};
