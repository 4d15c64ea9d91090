//! Hover documentation for keywords, built-ins and operators

use crate::code_actions::Range;
use serde::Serialize;

// === DOC TABLES ===

const TYPE_DOCS: &[(&str, &str)] = &[
    ("int", "32-bit signed integer type used for whole numbers."),
    ("float", "Floating-point numeric type used for decimal values."),
    ("const", "Declares an immutable variable whose value cannot be reassigned."),
];

const FUNCTION_DOCS: &[(&str, &str)] = &[
    ("print", "Outputs one or more values to the standard output."),
    ("cast", "Explicitly converts a value from one type to another."),
    ("pow", "Raises a number to the power of another number."),
    ("sqrt", "Returns the square root of a numeric value."),
    ("min", "Returns the smaller of two numeric values."),
    ("max", "Returns the larger of two numeric values."),
    ("round", "Rounds a floating-point number to the nearest integer."),
];

const CONSTANT_DOCS: &[(&str, &str)] = &[
    (
        "PI",
        "Mathematical constant representing the ratio of a circle’s circumference to its diameter.",
    ),
    ("DAYS_IN_WEEK", "Constant representing the number of days in a week."),
    ("HOURS_IN_DAY", "Constant representing the number of hours in a day."),
    ("Year", "Current year value provided by the runtime environment."),
];

const CONTROL_FLOW_DOCS: &[(&str, &str)] = &[
    ("try", "Executes a block of code that may throw a runtime error."),
    ("catch", "Handles errors thrown inside a try block."),
];

const OPERATOR_DOCS: &[(&str, &str)] = &[
    ("+", "Adds two numeric values together."),
    ("-", "Subtracts one numeric value from another."),
    ("*", "Multiplies two numeric values."),
    ("/", "Divides one numeric value by another."),
    ("=", "Assigns a value to a variable."),
];

static DOC_TABLES: [&[(&str, &str)]; 5] = [
    TYPE_DOCS,
    FUNCTION_DOCS,
    CONSTANT_DOCS,
    CONTROL_FLOW_DOCS,
    OPERATOR_DOCS,
];

fn lookup(key: &str) -> Option<&'static str> {
    DOC_TABLES
        .iter()
        .flat_map(|table| table.iter())
        .find(|(word, _)| *word == key)
        .map(|(_, doc)| *doc)
}

/// Documentation for `word`, trying its lowercase form first
pub fn hover_doc(word: &str) -> Option<&'static str> {
    lookup(&word.to_lowercase()).or_else(|| lookup(word))
}

/// Every documented word
pub fn documented_words() -> impl Iterator<Item = &'static str> {
    DOC_TABLES
        .iter()
        .flat_map(|table| table.iter())
        .map(|(word, _)| *word)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hover {
    pub range: Range,
    pub contents: &'static str,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Hover for the word (or single operator) under 1-based `column` of `line_text`
pub fn hover_at(line: u32, line_text: &str, column: u32) -> Option<Hover> {
    let chars: Vec<char> = line_text.chars().collect();
    let index = (column as usize).checked_sub(1)?;

    // A cursor just past a word still hovers that word
    let anchor = if chars.get(index).copied().is_some_and(is_word_char) {
        index
    } else if index > 0 && chars.get(index - 1).copied().is_some_and(is_word_char) {
        index - 1
    } else {
        let c = *chars.get(index)?;
        let key = c.to_string();
        let contents = lookup(&key)?;
        return Some(Hover {
            range: Range::new(line, column, line, column + 1),
            contents,
        });
    };

    let start = chars[..anchor]
        .iter()
        .rposition(|c| !is_word_char(*c))
        .map_or(0, |p| p + 1);
    let end = chars[anchor..]
        .iter()
        .position(|c| !is_word_char(*c))
        .map_or(chars.len(), |p| anchor + p);

    let word: String = chars[start..end].iter().collect();
    let contents = hover_doc(&word)?;
    Some(Hover {
        range: Range::new(line, start as u32 + 1, line, end as u32 + 1),
        contents,
    })
}
