//! In-memory store of the current known state of all monitored sites.

use std::collections::HashMap;

use super::site::{Health, Site, SiteId};

/// Holds the last known `Site` value per id, preserving the order in which
/// ids were first seen.
///
/// The store is rebuilt from the first successful poll of each session and
/// never persisted. An id is only ever removed through [`SiteStore::remove`],
/// which backs the explicit delete path; reconciliation never removes
/// entries (sites missing from a snapshot are treated as a non-event).
#[derive(Debug, Clone, Default)]
pub struct SiteStore {
    entries: HashMap<SiteId, Site>,
    order: Vec<SiteId>,
}

impl SiteStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a site by id.
    pub fn get(&self, id: SiteId) -> Option<&Site> {
        self.entries.get(&id)
    }

    /// Insert a site or replace all mutable fields of an existing entry.
    ///
    /// Replacement is wholesale: status and response_time can never be
    /// updated independently of each other.
    pub fn upsert(&mut self, site: Site) {
        if self.entries.insert(site.id, site.clone()).is_none() {
            self.order.push(site.id);
        }
    }

    /// Remove a site. Only the explicit delete path calls this.
    pub fn remove(&mut self, id: SiteId) -> Option<Site> {
        let removed = self.entries.remove(&id);
        if removed.is_some() {
            self.order.retain(|&existing| existing != id);
        }
        removed
    }

    /// All sites in first-seen order.
    pub fn all(&self) -> Vec<&Site> {
        self.order.iter().filter_map(|id| self.entries.get(id)).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Aggregate counters (total, up, down), recomputed from the full store
    /// so a threshold or rule change can never leave them drifted.
    pub fn counts(&self) -> (usize, usize, usize) {
        let total = self.entries.len();
        let up = self
            .entries
            .values()
            .filter(|s| s.health() == Health::Up)
            .count();
        (total, up, total - up)
    }
}
