// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Import diagnostics sink.
//!
//! Every report becomes a structured `tracing` event and a [`LogEntry`] kept
//! for inspection. A message is recorded once per entity.

use rustc_hash::FxHashSet;

/// One recorded diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub entity_id: u32,
    pub message: String,
    pub fatal: bool,
}

/// Warnings and errors collected during an import session
#[derive(Debug, Default)]
pub struct ImportLog {
    entries: Vec<LogEntry>,
    seen: FxHashSet<(u32, String)>,
}

impl ImportLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic for `entity_id`.
    ///
    /// Returns false when the same message was already reported for that
    /// entity.
    pub fn report(&mut self, entity_id: u32, message: impl Into<String>, fatal: bool) -> bool {
        let message = message.into();
        if !self.seen.insert((entity_id, message.clone())) {
            return false;
        }

        if fatal {
            tracing::error!(entity_id, fatal, "{}", message);
        } else {
            tracing::warn!(entity_id, fatal, "{}", message);
        }

        self.entries.push(LogEntry {
            entity_id,
            message,
            fatal,
        });
        true
    }

    #[inline]
    pub fn warn(&mut self, entity_id: u32, message: impl Into<String>) -> bool {
        self.report(entity_id, message, false)
    }

    #[inline]
    pub fn error(&mut self, entity_id: u32, message: impl Into<String>) -> bool {
        self.report(entity_id, message, true)
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn warnings(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(|e| !e.fatal)
    }

    pub fn errors(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(|e| e.fatal)
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// Entries reported for one entity
    pub fn for_entity(&self, entity_id: u32) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |e| e.entity_id == entity_id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.seen.clear();
    }
}
