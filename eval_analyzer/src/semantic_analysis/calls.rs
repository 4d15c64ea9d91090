//! Bracket-aware argument splitting and call extraction over raw text

use crate::config::compile_time::semantic::MAX_CALL_EXTRACTION;
use crate::log_warning;
use crate::utils::patterns::cached;
use regex::Regex;
use std::sync::OnceLock;

/// A call found in expression text, arguments trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedCall {
    pub name: String,
    pub args: Vec<String>,
}

fn call_head() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"([a-zA-Z_]\w*)\s*\(")
}

/// Split on commas that are not nested inside `()` or `[]`
///
/// Pieces are trimmed. A trailing empty piece is dropped, but empty pieces
/// before a comma are kept: `"a,,b"` gives three arguments.
pub fn split_top_level_args(text: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut depth: i32 = 0;
    let mut current = String::new();

    for ch in text.chars() {
        match ch {
            '(' | '[' => {
                depth += 1;
                current.push(ch);
            }
            ')' | ']' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                args.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    let last = current.trim();
    if !last.is_empty() {
        args.push(last.to_string());
    }
    args
}

/// Every call in `expr`, outermost first, nested calls included
///
/// The argument text runs to the matching `)`. When the parentheses never
/// close, the last character of the input is left out of the arguments.
pub fn extract_all_calls(expr: &str) -> Vec<ExtractedCall> {
    let mut calls = Vec::new();

    for caps in call_head().captures_iter(expr) {
        if calls.len() >= MAX_CALL_EXTRACTION {
            log_warning!("Call extraction limit reached; remaining calls ignored",
                "limit" => MAX_CALL_EXTRACTION);
            break;
        }
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        let open = whole.end();
        let mut depth = 1usize;
        let mut close = None;
        for (offset, byte) in expr.as_bytes()[open..].iter().enumerate() {
            match byte {
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(open + offset);
                        break;
                    }
                }
                _ => {}
            }
        }

        let end = close.unwrap_or_else(|| last_char_start(expr).max(open));
        calls.push(ExtractedCall {
            name: name.as_str().to_string(),
            args: split_top_level_args(&expr[open..end]),
        });
    }

    calls
}

fn last_char_start(text: &str) -> usize {
    text.char_indices().last().map(|(index, _)| index).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_respects_nesting() {
        assert_eq!(split_top_level_args("cast(x, int), y"), vec!["cast(x, int)", "y"]);
        assert_eq!(split_top_level_args("a[1, 2], b"), vec!["a[1, 2]", "b"]);
        assert_eq!(split_top_level_args("  "), Vec::<String>::new());
    }

    #[test]
    fn test_split_keeps_inner_empty_pieces() {
        assert_eq!(split_top_level_args("a,,b"), vec!["a", "", "b"]);
        assert_eq!(split_top_level_args("a, "), vec!["a"]);
        assert_eq!(split_top_level_args(","), vec![""]);
    }

    #[test]
    fn test_extract_nested_calls_in_source_order() {
        let calls = extract_all_calls("print(cast(x, int))");
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].name, "print");
        assert_eq!(calls[0].args, vec!["cast(x, int)"]);
        assert_eq!(calls[1].name, "cast");
        assert_eq!(calls[1].args, vec!["x", "int"]);
    }

    #[test]
    fn test_extract_sibling_calls() {
        let calls = extract_all_calls("min(a, b) + sqrt(c)");
        let names: Vec<_> = calls.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["min", "sqrt"]);
    }

    #[test]
    fn test_unterminated_call_drops_last_char() {
        let calls = extract_all_calls("sqrt(xy");
        assert_eq!(calls[0].args, vec!["x"]);

        let calls = extract_all_calls("sqrt(");
        assert_eq!(calls[0].args, Vec::<String>::new());
    }

    #[test]
    fn test_no_calls() {
        assert!(extract_all_calls("x + 1").is_empty());
    }
}
