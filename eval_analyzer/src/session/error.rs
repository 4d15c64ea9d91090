//! Errors raised by document and workspace operations

use super::document::DocumentId;
use crate::code_actions::EditError;
use crate::logging::{codes, Code};

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Edit computed for version {edit_version} but {document} is at version {current_version}")]
    StaleEdit {
        document: DocumentId,
        edit_version: u64,
        current_version: u64,
    },

    #[error("Unknown document {document}")]
    UnknownDocument { document: DocumentId },

    #[error("Cannot open '{uri}': {limit} documents already open")]
    DocumentLimitExceeded { uri: String, limit: usize },

    #[error("Invalid edit for {document}: {source}")]
    InvalidEditRange {
        document: DocumentId,
        #[source]
        source: EditError,
    },
}

impl SessionError {
    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::StaleEdit { .. } => codes::session::STALE_EDIT,
            Self::UnknownDocument { .. } => codes::session::UNKNOWN_DOCUMENT,
            Self::DocumentLimitExceeded { .. } => codes::session::DOCUMENT_LIMIT_EXCEEDED,
            Self::InvalidEditRange { .. } => codes::session::INVALID_EDIT_RANGE,
        }
    }

    /// Stale edits are recomputed by the caller against the newer text
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::StaleEdit { .. })
    }

    pub fn description(&self) -> &'static str {
        codes::get_description(self.error_code().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code_actions::Range;

    #[test]
    fn test_error_codes() {
        let stale = SessionError::StaleEdit {
            document: DocumentId::new(1),
            edit_version: 1,
            current_version: 2,
        };
        assert_eq!(stale.error_code().as_str(), "E300");
        assert!(stale.is_recoverable());
        assert_eq!(
            stale.to_string(),
            "Edit computed for version 1 but doc#1 is at version 2"
        );

        let invalid = SessionError::InvalidEditRange {
            document: DocumentId::new(3),
            source: EditError::InvertedRange {
                range: Range::new(2, 1, 1, 1),
            },
        };
        assert_eq!(invalid.error_code().as_str(), "E303");
        assert!(!invalid.is_recoverable());
        assert!(std::error::Error::source(&invalid).is_some());
    }
}
