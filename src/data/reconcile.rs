//! Snapshot reconciliation.
//!
//! Applies an incoming snapshot (or a single re-checked site) to the store
//! and computes the minimal set of change notifications. Repeated identical
//! polls produce zero events, so the UI sees no churn when nothing changed.

use super::site::Site;
use super::store::SiteStore;

/// A per-site change produced by one reconcile pass.
#[derive(Debug, Clone, PartialEq)]
pub enum SiteEvent {
    /// The site was not previously known to the store.
    Added(Site),
    /// An existing site's check result changed.
    Changed { previous: Site, current: Site },
}

impl SiteEvent {
    pub fn site(&self) -> &Site {
        match self {
            SiteEvent::Added(site) => site,
            SiteEvent::Changed { current, .. } => current,
        }
    }
}

/// Apply a snapshot to the store, returning one event per materially
/// changed site.
///
/// For each incoming site: an unknown id is inserted and reported as
/// [`SiteEvent::Added`]; a known id is compared on the (status,
/// response_time) pair plus last_checked and upserted wholesale when any
/// differ. Sites in the store but absent from the snapshot are left
/// untouched — a partial snapshot is a non-event for them, never a
/// deletion. Removal happens only through the explicit delete path.
pub fn apply(store: &mut SiteStore, snapshot: impl IntoIterator<Item = Site>) -> Vec<SiteEvent> {
    let mut events = Vec::new();

    for incoming in snapshot {
        match store.get(incoming.id) {
            None => {
                store.upsert(incoming.clone());
                events.push(SiteEvent::Added(incoming));
            }
            Some(existing) => {
                let changed = existing.status != incoming.status
                    || existing.response_time != incoming.response_time
                    || existing.last_checked != incoming.last_checked;
                if changed {
                    let previous = existing.clone();
                    store.upsert(incoming.clone());
                    events.push(SiteEvent::Changed {
                        previous,
                        current: incoming,
                    });
                }
            }
        }
    }

    if !events.is_empty() {
        tracing::debug!(events = events.len(), "reconciled snapshot");
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::site::SiteId;

    fn site(id: SiteId, status: &str, response_time: u64) -> Site {
        Site {
            id,
            url: format!("https://site-{}.test", id),
            name: format!("Site {}", id),
            check_interval: 60,
            status: status.to_string(),
            response_time,
            last_checked: Some("2024-05-01T12:00:00".to_string()),
            uptime_percentage: None,
        }
    }

    #[test]
    fn test_insert_then_idempotent_then_changed() {
        let mut store = SiteStore::new();

        // First application inserts
        let events = apply(&mut store, vec![site(1, "OK", 120)]);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], SiteEvent::Added(_)));

        // Same snapshot again is a no-op
        let events = apply(&mut store, vec![site(1, "OK", 120)]);
        assert!(events.is_empty());

        // A changed pair produces exactly one Changed event
        let events = apply(&mut store, vec![site(1, "DOWN", 5000)]);
        assert_eq!(events.len(), 1);
        match &events[0] {
            SiteEvent::Changed { previous, current } => {
                assert_eq!(previous.status, "OK");
                assert_eq!(previous.response_time, 120);
                assert_eq!(current.status, "DOWN");
                assert_eq!(current.response_time, 5000);
            }
            other => panic!("expected Changed, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_sites_are_not_deleted() {
        let mut store = SiteStore::new();
        apply(&mut store, vec![site(1, "OK", 100), site(2, "OK", 200)]);

        // Snapshot missing id 1: id 1 keeps its last known values
        let events = apply(&mut store, vec![site(2, "Error", 0)]);
        assert_eq!(events.len(), 1);
        assert_eq!(store.len(), 2);

        let kept = store.get(1).unwrap();
        assert_eq!(kept.status, "OK");
        assert_eq!(kept.response_time, 100);
    }

    #[test]
    fn test_status_and_response_time_update_together() {
        let mut store = SiteStore::new();
        apply(&mut store, vec![site(1, "OK", 100)]);

        apply(&mut store, vec![site(1, "Error (500)", 2500)]);
        let current = store.get(1).unwrap();

        // Wholesale upsert: never a status from one check paired with a
        // response time from another
        assert_eq!(
            (current.status.as_str(), current.response_time),
            ("Error (500)", 2500)
        );
    }

    #[test]
    fn test_last_checked_alone_triggers_change() {
        let mut store = SiteStore::new();
        apply(&mut store, vec![site(1, "OK", 100)]);

        let mut refreshed = site(1, "OK", 100);
        refreshed.last_checked = Some("2024-05-01T12:01:00".to_string());

        let events = apply(&mut store, vec![refreshed]);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_single_site_snapshot_path() {
        // A manual re-check reconciles as a one-element snapshot
        let mut store = SiteStore::new();
        apply(&mut store, vec![site(1, "OK", 100), site(2, "OK", 200)]);

        let events = apply(&mut store, vec![site(2, "OK", 450)]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].site().id, 2);
        assert_eq!(store.get(1).unwrap().response_time, 100);
    }
}
