//! Editor language configuration for EVAL sources

use crate::config::constants::{LANGUAGE_ID, SOURCE_EXTENSION};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommentRule {
    pub line_comment: &'static str,
    pub block_comment: (&'static str, &'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharacterPair {
    pub open: char,
    pub close: char,
}

const fn pair(open: char, close: char) -> CharacterPair {
    CharacterPair { open, close }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageConfiguration {
    pub id: &'static str,
    pub extensions: Vec<String>,
    pub comments: CommentRule,
    pub brackets: Vec<CharacterPair>,
    pub auto_closing_pairs: Vec<CharacterPair>,
    pub surrounding_pairs: Vec<CharacterPair>,
}

pub fn language_configuration() -> LanguageConfiguration {
    let quoted_pairs = vec![pair('{', '}'), pair('(', ')'), pair('"', '"')];
    LanguageConfiguration {
        id: LANGUAGE_ID,
        extensions: vec![format!(".{}", SOURCE_EXTENSION)],
        comments: CommentRule {
            line_comment: "//",
            block_comment: ("/*", "*/"),
        },
        brackets: vec![pair('{', '}'), pair('(', ')')],
        auto_closing_pairs: quoted_pairs.clone(),
        surrounding_pairs: quoted_pairs,
    }
}
