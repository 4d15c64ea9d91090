//! Code actions, their text edits and edit application

use crate::diagnostics::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 1-based character range; the end position is exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Range {
    pub fn new(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// The whole content of `line`, excluding its line break
    pub fn whole_line(line: u32, line_text: &str) -> Self {
        Self::new(line, 1, line, line_text.chars().count() as u32 + 1)
    }

    /// `line` including its line break
    pub fn line_with_break(line: u32) -> Self {
        Self::new(line, 1, line + 1, 1)
    }

    /// Empty range at the start of `line`
    pub fn line_start(line: u32) -> Self {
        Self::new(line, 1, line, 1)
    }

    pub fn is_empty(&self) -> bool {
        self.start_line == self.end_line && self.start_column == self.end_column
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start_line, self.start_column, self.end_line, self.end_column
        )
    }
}

/// Replacement of `range` by `text`, valid only for document `version`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub range: Range,
    pub text: String,
    pub version: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    #[serde(rename = "quickfix")]
    QuickFix,
    Refactor,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QuickFix => "quickfix",
            Self::Refactor => "refactor",
        }
    }
}

/// A proposed fix or refactor
///
/// Quick fixes reference the diagnostic they address; refactors reference
/// none. An action without edits is informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeAction {
    pub title: String,
    pub diagnostics: Vec<Diagnostic>,
    pub kind: ActionKind,
    pub edits: Vec<TextEdit>,
    pub is_preferred: bool,
}

impl CodeAction {
    pub fn quick_fix(title: impl Into<String>, diagnostic: &Diagnostic) -> Self {
        Self {
            title: title.into(),
            diagnostics: vec![diagnostic.clone()],
            kind: ActionKind::QuickFix,
            edits: Vec::new(),
            is_preferred: false,
        }
    }

    pub fn refactor(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            diagnostics: Vec::new(),
            kind: ActionKind::Refactor,
            edits: Vec::new(),
            is_preferred: false,
        }
    }

    pub fn with_edit(mut self, range: Range, text: impl Into<String>, version: u64) -> Self {
        self.edits.push(TextEdit {
            range,
            text: text.into(),
            version,
        });
        self
    }

    pub fn preferred(mut self, is_preferred: bool) -> Self {
        self.is_preferred = is_preferred;
        self
    }

    pub fn has_edits(&self) -> bool {
        !self.edits.is_empty()
    }
}

// ============================================================================
// EDIT APPLICATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("Position {line}:{column} lies outside the document")]
    PositionOutOfBounds { line: u32, column: u32 },

    #[error("Edit range {range} ends before it starts")]
    InvertedRange { range: Range },

    #[error("Edits overlap at {range}")]
    OverlappingEdits { range: Range },
}

/// Byte offset of a 1-based (line, column) position
///
/// The position just past the last line is accepted so that a range may
/// swallow the final line even without a trailing newline.
pub fn position_to_offset(text: &str, line: u32, column: u32) -> Result<usize, EditError> {
    let out_of_bounds = EditError::PositionOutOfBounds { line, column };
    if line == 0 || column == 0 {
        return Err(out_of_bounds);
    }

    let mut line_start = 0usize;
    for current in 1..line {
        match text[line_start..].find('\n') {
            Some(index) => line_start += index + 1,
            None if column == 1 && current + 1 == line => return Ok(text.len()),
            None => return Err(out_of_bounds),
        }
    }

    let line_text = match text[line_start..].find('\n') {
        Some(index) => &text[line_start..line_start + index],
        None => &text[line_start..],
    };

    let wanted = (column - 1) as usize;
    if wanted == 0 {
        return Ok(line_start);
    }
    line_text
        .char_indices()
        .map(|(index, _)| index)
        .chain(std::iter::once(line_text.len()))
        .nth(wanted)
        .map(|index| line_start + index)
        .ok_or(out_of_bounds)
}

/// Apply `edits` to `text`, last edit in the document first
pub fn apply_edits(text: &str, edits: &[TextEdit]) -> Result<String, EditError> {
    let mut resolved = Vec::with_capacity(edits.len());
    for edit in edits {
        let start = position_to_offset(text, edit.range.start_line, edit.range.start_column)?;
        let end = position_to_offset(text, edit.range.end_line, edit.range.end_column)?;
        if end < start {
            return Err(EditError::InvertedRange { range: edit.range });
        }
        resolved.push((start, end, edit));
    }

    resolved.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));
    for pair in resolved.windows(2) {
        let (later, earlier) = (&pair[0], &pair[1]);
        if earlier.1 > later.0 {
            return Err(EditError::OverlappingEdits {
                range: later.2.range,
            });
        }
    }

    let mut result = text.to_string();
    for (start, end, edit) in resolved {
        result.replace_range(start..end, &edit.text);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn edit(range: Range, text: &str) -> TextEdit {
        TextEdit {
            range,
            text: text.to_string(),
            version: 1,
        }
    }

    #[test]
    fn test_range_helpers() {
        assert_eq!(Range::whole_line(3, "int x"), Range::new(3, 1, 3, 6));
        assert_eq!(Range::line_with_break(2), Range::new(2, 1, 3, 1));
        assert!(Range::line_start(4).is_empty());
        assert_eq!(Range::new(1, 2, 3, 4).to_string(), "1:2-3:4");
    }

    #[test]
    fn test_position_to_offset() {
        let text = "ab\ncdé\nf";
        assert_eq!(position_to_offset(text, 1, 1), Ok(0));
        assert_eq!(position_to_offset(text, 1, 3), Ok(2));
        assert_eq!(position_to_offset(text, 2, 3), Ok(text.find('é').unwrap()));
        assert_eq!(position_to_offset(text, 2, 4), Ok(text.find('\n').unwrap() + 5));
        assert_matches!(position_to_offset(text, 2, 5), Err(_));
        assert_eq!(position_to_offset(text, 4, 1), Ok(text.len()));
        assert_matches!(
            position_to_offset(text, 1, 5),
            Err(EditError::PositionOutOfBounds { line: 1, column: 5 })
        );
        assert_matches!(position_to_offset(text, 5, 1), Err(_));
        assert_matches!(position_to_offset(text, 0, 1), Err(_));
    }

    #[test]
    fn test_apply_line_replacement() {
        let text = "int x\nprint(x)";
        let result = apply_edits(text, &[edit(Range::whole_line(1, "int x"), "int x = 0")]);
        assert_eq!(result.unwrap(), "int x = 0\nprint(x)");
    }

    #[test]
    fn test_apply_line_removal_and_insertion() {
        let text = "int x = 1\nint x = 2\n";
        let removed = apply_edits(text, &[edit(Range::line_with_break(2), "")]).unwrap();
        assert_eq!(removed, "int x = 1\n");

        let inserted = apply_edits("y = 1", &[edit(Range::line_start(1), "int y = 0\n")]).unwrap();
        assert_eq!(inserted, "int y = 0\ny = 1");
    }

    #[test]
    fn test_removing_last_line_without_newline() {
        let result = apply_edits("a\nb", &[edit(Range::line_with_break(2), "")]).unwrap();
        assert_eq!(result, "a\n");
    }

    #[test]
    fn test_edits_apply_bottom_up() {
        let text = "a\nb\nc";
        let edits = [
            edit(Range::whole_line(1, "a"), "first"),
            edit(Range::whole_line(3, "c"), "third"),
        ];
        assert_eq!(apply_edits(text, &edits).unwrap(), "first\nb\nthird");
    }

    #[test]
    fn test_overlapping_edits_are_rejected() {
        let edits = [
            edit(Range::new(1, 1, 1, 4), "x"),
            edit(Range::new(1, 2, 1, 3), "y"),
        ];
        assert_matches!(
            apply_edits("abcd", &edits),
            Err(EditError::OverlappingEdits { .. })
        );
    }

    #[test]
    fn test_action_kind_serialization() {
        let json = serde_json::to_string(&ActionKind::QuickFix).unwrap();
        assert_eq!(json, "\"quickfix\"");
        let json = serde_json::to_string(&ActionKind::Refactor).unwrap();
        assert_eq!(json, "\"refactor\"");
    }
}
