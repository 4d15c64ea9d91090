//! Refactors offered for the cursor line regardless of diagnostics

use super::types::{CodeAction, Range};
use crate::utils::patterns::cached;
use regex::{NoExpand, Regex};
use std::sync::OnceLock;

fn plain_declaration() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^(\s*)(int|float|string|bool)\s+(\w+)\s*=\s*(.+)$")
}

fn int_with_dotted_value() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^\s*int\s+\w+\s*=\s*[\w.]+\.[\w.]+")
}

fn int_keyword() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"\bint\b")
}

/// Refactors for `line_text`, the content of 1-based line `line`
pub fn refactors_for_line(line: u32, line_text: &str, version: u64) -> Vec<CodeAction> {
    let mut actions = Vec::new();
    let range = Range::whole_line(line, line_text);

    if let Some(caps) = plain_declaration().captures(line_text) {
        if !line_text.trim_start().starts_with("const") {
            let text = format!("{}const {} {} = {}", &caps[1], &caps[2], &caps[3], &caps[4]);
            actions.push(
                CodeAction::refactor(format!("Make '{}' a constant (const)", &caps[3]))
                    .with_edit(range, text, version),
            );
        }
    }

    // Dotted tokens such as `1.5` or `a.b` hint at a float value
    if int_with_dotted_value().is_match(line_text) {
        let text = int_keyword()
            .replace(line_text, NoExpand("float"))
            .into_owned();
        actions.push(
            CodeAction::refactor("Change type from 'int' to 'float'").with_edit(range, text, version),
        );
    }

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code_actions::types::ActionKind;

    #[test]
    fn test_make_constant() {
        let actions = refactors_for_line(4, "  int total = a + b", 3);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].title, "Make 'total' a constant (const)");
        assert_eq!(actions[0].kind, ActionKind::Refactor);
        assert!(!actions[0].is_preferred);
        assert!(actions[0].diagnostics.is_empty());
        assert_eq!(actions[0].edits[0].text, "  const int total = a + b");
        assert_eq!(actions[0].edits[0].range, Range::new(4, 1, 4, 20));
        assert_eq!(actions[0].edits[0].version, 3);
    }

    #[test]
    fn test_const_line_is_not_offered_again() {
        assert!(refactors_for_line(1, "const int x = 1", 1).is_empty());
    }

    #[test]
    fn test_int_to_float() {
        let actions = refactors_for_line(1, "int ratio = 1.5", 1);
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[1].title, "Change type from 'int' to 'float'");
        assert_eq!(actions[1].edits[0].text, "float ratio = 1.5");
    }

    #[test]
    fn test_non_declaration_has_no_refactors() {
        assert!(refactors_for_line(1, "print(x)", 1).is_empty());
        assert!(refactors_for_line(1, "", 1).is_empty());
    }
}
