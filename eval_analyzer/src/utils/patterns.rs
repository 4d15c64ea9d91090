//! Lazily compiled regular expressions shared by the line-based analyzers

use regex::Regex;
use std::sync::OnceLock;

/// Compile `pattern` once into `cell`
///
/// Only for literal patterns written in this crate; a malformed literal is a
/// programming error caught by the unit tests of the owning module.
pub fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("valid regex"))
}

/// Compile a pattern that embeds user text, escaping every fragment in `parts`
///
/// `template` uses `{}` placeholders in order. Returns `None` when the result
/// does not compile.
pub fn with_escaped(template: &str, parts: &[&str]) -> Option<Regex> {
    let mut pattern = String::with_capacity(template.len());
    let mut pieces = template.split("{}");
    if let Some(first) = pieces.next() {
        pattern.push_str(first);
    }
    for (piece, part) in pieces.zip(parts.iter().chain(std::iter::repeat(&""))) {
        pattern.push_str(&regex::escape(part));
        pattern.push_str(piece);
    }
    Regex::new(&pattern).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_compiles_once() {
        static RE: OnceLock<Regex> = OnceLock::new();
        let first = cached(&RE, r"^\d+$") as *const Regex;
        let second = cached(&RE, r"^\d+$") as *const Regex;
        assert_eq!(first, second);
        assert!(cached(&RE, r"^\d+$").is_match("42"));
    }

    #[test]
    fn test_escaped_fragments_match_literally() {
        let re = with_escaped(r"\b{}\b\s*$", &["a.b"]).unwrap();
        assert!(re.is_match("x = a.b"));
        assert!(!re.is_match("x = axb"));
    }

    #[test]
    fn test_multiple_placeholders() {
        let re = with_escaped(r"^{}\s*\(([^)]+)\){}$", &["min", ";"]).unwrap();
        assert!(re.is_match("min(a, b);"));
    }
}
