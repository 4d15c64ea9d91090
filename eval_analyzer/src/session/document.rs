//! Open documents and their handles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle issued by a workspace when a document is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(u64);

impl DocumentId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// Text of one open document
///
/// `version` starts at 1 and grows by one on every text change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub uri: String,
    pub text: String,
    pub version: u64,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn new(id: DocumentId, uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            uri: uri.into(),
            text: text.into(),
            version: 1,
            updated_at: Utc::now(),
        }
    }

    /// Replace the text and return the new version
    pub fn set_text(&mut self, text: impl Into<String>) -> u64 {
        self.text = text.into();
        self.version += 1;
        self.updated_at = Utc::now();
        self.version
    }

    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    /// 1-based line without its terminator
    pub fn line(&self, line: u32) -> Option<&str> {
        let index = (line as usize).checked_sub(1)?;
        self.text
            .split('\n')
            .nth(index)
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
    }
}
