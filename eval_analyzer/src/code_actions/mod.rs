//! Quick fixes and refactors for validator diagnostics
//!
//! Actions are derived purely from diagnostic messages and the affected
//! line's text. Every edit is stamped with the document version it was
//! computed against; the caller decides whether it is still applicable.

pub mod quick_fixes;
pub mod refactors;
pub mod types;

pub use quick_fixes::FixBuilder;
pub use refactors::refactors_for_line;
pub use types::{
    apply_edits, position_to_offset, ActionKind, CodeAction, EditError, Range, TextEdit,
};

use crate::{
    config::compile_time::code_actions::*, config::runtime::AnalysisPreferences,
    diagnostics::Diagnostic, log_debug, log_success, log_warning, logging::codes,
};

/// Line `line` (1-based) of `text` without its line terminator
fn line_at(text: &str, line: u32) -> Option<&str> {
    let index = (line as usize).checked_sub(1)?;
    text.split('\n')
        .nth(index)
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
}

pub struct CodeActionGenerator {
    preferences: AnalysisPreferences,
}

impl CodeActionGenerator {
    pub fn new() -> Self {
        Self::with_preferences(AnalysisPreferences::default())
    }

    pub fn with_preferences(preferences: AnalysisPreferences) -> Self {
        Self { preferences }
    }

    /// Actions for `diagnostics` over `text`, plus refactors for `cursor_line`
    pub fn generate(
        &self,
        diagnostics: &[Diagnostic],
        text: &str,
        cursor_line: Option<u32>,
        version: u64,
    ) -> Vec<CodeAction> {
        let mut actions = Vec::new();
        let mut skipped = 0usize;

        for diagnostic in diagnostics {
            let Some(line) = line_at(text, diagnostic.line) else {
                log_debug!("Diagnostic line outside document, no actions offered",
                    "line" => diagnostic.line);
                skipped += 1;
                continue;
            };
            actions.extend(FixBuilder::new(diagnostic, line, version).build());
        }

        if self.preferences.include_refactors {
            if let Some(cursor) = cursor_line {
                if let Some(line) = line_at(text, cursor) {
                    actions.extend(refactors_for_line(cursor, line, version));
                }
            }
        }

        if actions.len() > MAX_ACTIONS_PER_REQUEST {
            log_warning!("Code action list truncated",
                "generated" => actions.len(),
                "limit" => MAX_ACTIONS_PER_REQUEST);
            actions.truncate(MAX_ACTIONS_PER_REQUEST);
        }

        log_success!(
            codes::success::CODE_ACTIONS_GENERATED,
            "Code actions generated",
            "diagnostics" => diagnostics.len(),
            "actions" => actions.len(),
            "skipped" => skipped,
            "version" => version
        );

        actions
    }
}

impl Default for CodeActionGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Quick fixes and cursor-line refactors with preferences from the environment
pub fn code_actions_for(
    diagnostics: &[Diagnostic],
    text: &str,
    cursor_line: Option<u32>,
    version: u64,
) -> Vec<CodeAction> {
    CodeActionGenerator::new().generate(diagnostics, text, cursor_line, version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic_analysis::analyze;

    fn generator(include_refactors: bool) -> CodeActionGenerator {
        CodeActionGenerator::with_preferences(AnalysisPreferences {
            include_refactors,
            log_analysis_summary: false,
        })
    }

    #[test]
    fn test_line_at() {
        let text = "a\r\nb\nc";
        assert_eq!(line_at(text, 1), Some("a"));
        assert_eq!(line_at(text, 3), Some("c"));
        assert_eq!(line_at(text, 0), None);
        assert_eq!(line_at(text, 4), None);
    }

    #[test]
    fn test_preferred_fix_round_trip() {
        let text = "int x";
        let diagnostics = analyze(text);
        assert_eq!(diagnostics.len(), 1);

        let actions = generator(false).generate(&diagnostics, text, None, 1);
        let preferred = actions
            .iter()
            .find(|a| a.is_preferred)
            .expect("preferred action");
        assert!(preferred.edits.iter().all(|e| e.version == 1));

        let fixed = apply_edits(text, &preferred.edits).unwrap();
        assert_eq!(fixed, "int x = 0");
        assert!(!analyze(&fixed)
            .iter()
            .any(|d| d.message.contains("never assigned")));
    }

    #[test]
    fn test_duplicate_removal_round_trip() {
        let text = "int x = 1\nint x = 2\nprint(x)";
        let diagnostics = analyze(text);
        let actions = generator(false).generate(&diagnostics, text, None, 4);
        assert_eq!(actions.len(), 1);
        let fixed = apply_edits(text, &actions[0].edits).unwrap();
        assert_eq!(fixed, "int x = 1\nprint(x)");
        assert!(analyze(&fixed).is_empty());
    }

    #[test]
    fn test_division_fix_round_trip() {
        let text = "int r = 100 / 0";
        let diagnostics = analyze(text);
        let actions = generator(false).generate(&diagnostics, text, None, 1);
        assert_eq!(actions.len(), 1);
        let fixed = apply_edits(text, &actions[0].edits).unwrap();
        assert!(fixed.starts_with("try {\n    int r = 100 / 0\n} catch (e) {"));
        assert!(analyze(&fixed).is_empty());
    }

    #[test]
    fn test_out_of_range_diagnostic_is_skipped() {
        let diagnostics = vec![Diagnostic::warning(9, "Variable 'x' declared but never assigned")];
        assert!(generator(false)
            .generate(&diagnostics, "int x", None, 1)
            .is_empty());
    }

    #[test]
    fn test_refactors_follow_preference() {
        let text = "int total = 1\n";
        assert!(generator(false).generate(&[], text, Some(1), 1).is_empty());

        let actions = generator(true).generate(&[], text, Some(1), 1);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, ActionKind::Refactor);
        assert!(generator(true).generate(&[], text, Some(5), 1).is_empty());
    }

    #[test]
    fn test_quick_fixes_precede_refactors() {
        let text = "int x = 1\nint x = 2";
        let diagnostics = analyze(text);
        let actions = generator(true).generate(&diagnostics, text, Some(2), 1);
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].kind, ActionKind::QuickFix);
        assert_eq!(actions[1].kind, ActionKind::Refactor);
    }

    #[test]
    fn test_action_cap() {
        let text = "int = 1\n".repeat(MAX_ACTIONS_PER_REQUEST + 5);
        let diagnostics = analyze(&text);
        let actions = generator(false).generate(&diagnostics, &text, None, 1);
        assert_eq!(actions.len(), MAX_ACTIONS_PER_REQUEST);
    }
}
