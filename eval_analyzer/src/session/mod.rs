//! Open documents, version-checked edits and ordered analysis results
//!
//! A [`Workspace`] owns every open document and hands out [`DocumentId`]
//! handles. All analysis goes through a handle; there is no implicit
//! "current" document. Log events emitted while serving a request carry the
//! document's uri and version.

pub mod document;
pub mod error;
pub mod sequencer;

pub use document::{Document, DocumentId};
pub use error::{SessionError, SessionResult};
pub use sequencer::{AnalysisSequencer, Ticket};

use crate::code_actions::{apply_edits, CodeAction, CodeActionGenerator};
use crate::config::compile_time::session::MAX_OPEN_DOCUMENTS;
use crate::config::runtime::RuntimeConfig;
use crate::diagnostics::{to_markers, Diagnostic, EditorMarker};
use crate::logging::{codes, with_document_context};
use crate::pipeline::AnalysisPipeline;
use crate::syntax::SyntaxDiagnostic;
use crate::{log_debug, log_error, log_success};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Diagnostics for one document version
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSnapshot {
    pub document: DocumentId,
    pub version: u64,
    pub syntax_diagnostics: Vec<SyntaxDiagnostic>,
    pub semantic_diagnostics: Vec<Diagnostic>,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisSnapshot {
    pub fn markers(&self) -> Vec<EditorMarker> {
        to_markers(&self.syntax_diagnostics, &self.semantic_diagnostics)
    }

    pub fn diagnostic_count(&self) -> usize {
        self.syntax_diagnostics.len() + self.semantic_diagnostics.len()
    }
}

pub struct Workspace {
    documents: BTreeMap<DocumentId, Document>,
    next_id: u64,
    pipeline: AnalysisPipeline,
    actions: CodeActionGenerator,
}

impl Workspace {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        let actions = CodeActionGenerator::with_preferences(config.analysis.clone());
        Self {
            documents: BTreeMap::new(),
            next_id: 0,
            pipeline: AnalysisPipeline::with_config(config),
            actions,
        }
    }

    pub fn open(&mut self, uri: &str, text: &str) -> SessionResult<DocumentId> {
        if self.documents.len() >= MAX_OPEN_DOCUMENTS {
            let error = SessionError::DocumentLimitExceeded {
                uri: uri.to_string(),
                limit: MAX_OPEN_DOCUMENTS,
            };
            log_error!(error.error_code(), &error.to_string());
            return Err(error);
        }

        self.next_id += 1;
        let id = DocumentId::new(self.next_id);
        self.documents.insert(id, Document::new(id, uri, text));

        log_success!(codes::success::DOCUMENT_OPENED, "Document opened",
            "document" => id,
            "uri" => uri,
            "open_documents" => self.documents.len());
        Ok(id)
    }

    /// Replace the full text and return the new version
    pub fn update(&mut self, id: DocumentId, text: &str) -> SessionResult<u64> {
        let document = self.document_mut(id)?;
        let version = document.set_text(text);
        log_debug!("Document text replaced", "document" => id, "version" => version);
        Ok(version)
    }

    pub fn close(&mut self, id: DocumentId) -> SessionResult<Document> {
        let document = self
            .documents
            .remove(&id)
            .ok_or(SessionError::UnknownDocument { document: id })?;
        log_debug!("Document closed", "document" => id, "uri" => document.uri);
        Ok(document)
    }

    pub fn get(&self, id: DocumentId) -> SessionResult<&Document> {
        self.documents
            .get(&id)
            .ok_or(SessionError::UnknownDocument { document: id })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn document_ids(&self) -> impl Iterator<Item = DocumentId> + '_ {
        self.documents.keys().copied()
    }

    fn document_mut(&mut self, id: DocumentId) -> SessionResult<&mut Document> {
        self.documents
            .get_mut(&id)
            .ok_or(SessionError::UnknownDocument { document: id })
    }

    /// Lex, parse and validate the current text of `id`
    pub fn analyze(&self, id: DocumentId) -> SessionResult<AnalysisSnapshot> {
        let document = self.get(id)?;
        let report = with_document_context(&document.uri, document.version, || {
            self.pipeline.run(&document.text)
        });

        Ok(AnalysisSnapshot {
            document: id,
            version: document.version,
            syntax_diagnostics: report.syntax_diagnostics,
            semantic_diagnostics: report.semantic_diagnostics,
            analyzed_at: Utc::now(),
        })
    }

    /// Actions for the current text, stamped with the current version
    pub fn code_actions(
        &self,
        id: DocumentId,
        cursor_line: Option<u32>,
    ) -> SessionResult<Vec<CodeAction>> {
        let snapshot = self.analyze(id)?;
        let document = self.get(id)?;
        Ok(with_document_context(&document.uri, document.version, || {
            self.actions.generate(
                &snapshot.semantic_diagnostics,
                &document.text,
                cursor_line,
                document.version,
            )
        }))
    }

    /// Apply every edit of `action` and return the new version
    ///
    /// Edits computed against any other version are rejected untouched.
    pub fn apply_action(&mut self, id: DocumentId, action: &CodeAction) -> SessionResult<u64> {
        let document = self.document_mut(id)?;

        if let Some(stale) = action.edits.iter().find(|e| e.version != document.version) {
            let error = SessionError::StaleEdit {
                document: id,
                edit_version: stale.version,
                current_version: document.version,
            };
            log_error!(error.error_code(), &error.to_string(), "action" => action.title);
            return Err(error);
        }
        if action.edits.is_empty() {
            return Ok(document.version);
        }

        let text = apply_edits(&document.text, &action.edits).map_err(|source| {
            SessionError::InvalidEditRange {
                document: id,
                source,
            }
        })?;
        let version = document.set_text(text);

        log_success!(codes::success::EDIT_APPLIED, "Code action applied",
            "document" => id,
            "action" => action.title,
            "version" => version);
        Ok(version)
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code_actions::{ActionKind, Range};
    use assert_matches::assert_matches;

    fn workspace() -> Workspace {
        let mut config = RuntimeConfig::default();
        config.analysis.include_refactors = true;
        Workspace::with_config(config)
    }

    #[test]
    fn test_open_update_close() {
        let mut ws = workspace();
        let id = ws.open("mem://a.evl", "int x = 1").unwrap();
        assert_eq!(ws.get(id).unwrap().version, 1);
        assert_eq!(ws.update(id, "int x = 2").unwrap(), 2);
        assert_eq!(ws.get(id).unwrap().text, "int x = 2");

        let closed = ws.close(id).unwrap();
        assert_eq!(closed.uri, "mem://a.evl");
        assert!(ws.is_empty());
        assert_matches!(ws.get(id), Err(SessionError::UnknownDocument { .. }));
        assert_matches!(ws.close(id), Err(SessionError::UnknownDocument { .. }));
    }

    #[test]
    fn test_handles_are_unique() {
        let mut ws = workspace();
        let a = ws.open("mem://a.evl", "").unwrap();
        ws.close(a).unwrap();
        let b = ws.open("mem://a.evl", "").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_document_limit() {
        let mut ws = workspace();
        for i in 0..MAX_OPEN_DOCUMENTS {
            ws.open(&format!("mem://{}.evl", i), "").unwrap();
        }
        assert_matches!(
            ws.open("mem://overflow.evl", ""),
            Err(SessionError::DocumentLimitExceeded { .. })
        );
    }

    #[test]
    fn test_analyze_snapshot() {
        let mut ws = workspace();
        let id = ws.open("mem://a.evl", "int r = 100 / 0").unwrap();
        let snapshot = ws.analyze(id).unwrap();
        assert_eq!(snapshot.document, id);
        assert_eq!(snapshot.version, 1);
        assert!(snapshot.syntax_diagnostics.is_empty());
        assert_eq!(snapshot.semantic_diagnostics.len(), 1);
        assert_eq!(snapshot.markers().len(), 1);
    }

    #[test]
    fn test_apply_preferred_fix() {
        let mut ws = workspace();
        let id = ws.open("mem://a.evl", "int x\nprint(x)").unwrap();
        let actions = ws.code_actions(id, None).unwrap();
        let fix = actions.iter().find(|a| a.is_preferred).unwrap();

        assert_eq!(ws.apply_action(id, fix).unwrap(), 2);
        assert_eq!(ws.get(id).unwrap().text, "int x = 0\nprint(x)");
        assert!(ws.analyze(id).unwrap().semantic_diagnostics.is_empty());
    }

    #[test]
    fn test_stale_action_is_rejected() {
        let mut ws = workspace();
        let id = ws.open("mem://a.evl", "int x").unwrap();
        let actions = ws.code_actions(id, None).unwrap();
        ws.update(id, "int x = 5").unwrap();

        assert_matches!(
            ws.apply_action(id, &actions[0]),
            Err(SessionError::StaleEdit {
                edit_version: 1,
                current_version: 2,
                ..
            })
        );
        assert_eq!(ws.get(id).unwrap().text, "int x = 5");
    }

    #[test]
    fn test_informational_action_leaves_document_alone() {
        let mut ws = workspace();
        let id = ws.open("mem://a.evl", "float r = sqrt()").unwrap();
        let actions = ws.code_actions(id, None).unwrap();
        let info = actions.iter().find(|a| !a.has_edits()).unwrap();
        assert_eq!(ws.apply_action(id, info).unwrap(), 1);
    }

    #[test]
    fn test_invalid_range_is_reported() {
        let mut ws = workspace();
        let id = ws.open("mem://a.evl", "int x").unwrap();
        let action =
            CodeAction::refactor("bogus").with_edit(Range::new(9, 1, 9, 2), "y", 1);
        assert_eq!(action.kind, ActionKind::Refactor);
        assert_matches!(
            ws.apply_action(id, &action),
            Err(SessionError::InvalidEditRange { .. })
        );
        assert_eq!(ws.get(id).unwrap().version, 1);
    }

    #[test]
    fn test_cursor_refactors_are_stamped() {
        let mut ws = workspace();
        let id = ws.open("mem://a.evl", "int total = 1").unwrap();
        ws.update(id, "int total = 2").unwrap();
        let actions = ws.code_actions(id, Some(1)).unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].edits[0].version, 2);

        ws.apply_action(id, &actions[0]).unwrap();
        assert_eq!(ws.get(id).unwrap().text, "const int total = 2");
    }
}
