//! Ordering guard for analysis results computed off the editing thread
//!
//! Every analysis request takes a ticket. When the result comes back, only
//! the newest outstanding ticket of its document is accepted; anything older
//! was superseded while it ran and is dropped.

use super::document::DocumentId;
use crate::config::compile_time::session::MAX_PENDING_TICKETS;
use crate::logging::codes;
use crate::{log_debug, log_warning};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticket {
    pub document: DocumentId,
    pub version: u64,
    pub sequence: u64,
}

#[derive(Debug, Default)]
pub struct AnalysisSequencer {
    next_sequence: u64,
    /// Newest unresolved sequence per document
    outstanding: HashMap<DocumentId, u64>,
    discarded: usize,
}

impl AnalysisSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&mut self, document: DocumentId, version: u64) -> Ticket {
        self.next_sequence += 1;
        let sequence = self.next_sequence;

        if !self.outstanding.contains_key(&document)
            && self.outstanding.len() >= MAX_PENDING_TICKETS
        {
            self.evict_oldest();
        }
        self.outstanding.insert(document, sequence);

        log_debug!("Analysis ticket issued",
            "document" => document,
            "version" => version,
            "sequence" => sequence);

        Ticket {
            document,
            version,
            sequence,
        }
    }

    /// Whether the result for `ticket` may be applied
    ///
    /// Accepting resolves the ticket, so a second call for it returns false.
    pub fn accept(&mut self, ticket: &Ticket) -> bool {
        let newest = self.outstanding.get(&ticket.document).copied();
        if newest == Some(ticket.sequence) {
            self.outstanding.remove(&ticket.document);
            return true;
        }

        self.discarded += 1;
        log_warning!(code = codes::session::STALE_RESULT_DISCARDED,
            "Discarding superseded analysis result",
            "document" => ticket.document,
            "sequence" => ticket.sequence,
            "newest" => newest.map_or_else(|| "none".to_string(), |s| s.to_string()));
        false
    }

    /// Drop any outstanding ticket for a closed document
    pub fn forget(&mut self, document: DocumentId) {
        self.outstanding.remove(&document);
    }

    pub fn pending(&self) -> usize {
        self.outstanding.len()
    }

    pub fn discarded(&self) -> usize {
        self.discarded
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .outstanding
            .iter()
            .min_by_key(|(_, sequence)| **sequence)
            .map(|(document, _)| *document);
        if let Some(document) = oldest {
            self.outstanding.remove(&document);
            log_warning!("Pending ticket limit reached, oldest ticket evicted",
                "document" => document,
                "limit" => MAX_PENDING_TICKETS);
        }
    }
}
