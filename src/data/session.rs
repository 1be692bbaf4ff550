//! Detail view session tracking.
//!
//! At most one site's detail view is open at a time. The session owns that
//! pointer explicitly (no ambient global) and keeps the open view live as
//! reconcile events arrive for the targeted site.

use super::reconcile::SiteEvent;
use super::site::{SiteDetail, SiteId};

/// State of the single detail view.
///
/// `Closed --open--> Loading --loaded--> Open`; a fetch failure parks the
/// attempt in `Failed` until the user retries or closes; `close` from any
/// state returns to `Closed`, so a stale pane is never shown for a site
/// that is no longer selected.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailsSession {
    #[default]
    Closed,
    Loading(SiteId),
    Open { id: SiteId, detail: SiteDetail },
    Failed { id: SiteId, error: String },
}

impl DetailsSession {
    /// Open the detail view for a site, replacing any previous session
    /// unconditionally. The caller is expected to fire the detail fetch.
    pub fn open(&mut self, id: SiteId) {
        *self = DetailsSession::Loading(id);
    }

    /// Close the view and return to the loading-placeholder state.
    pub fn close(&mut self) {
        *self = DetailsSession::Closed;
    }

    /// The id of the site this session targets, in any non-closed state.
    pub fn current_id(&self) -> Option<SiteId> {
        match self {
            DetailsSession::Closed => None,
            DetailsSession::Loading(id)
            | DetailsSession::Open { id, .. }
            | DetailsSession::Failed { id, .. } => Some(*id),
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, DetailsSession::Closed)
    }

    /// Accept a completed detail fetch.
    ///
    /// A response for a site other than the current target is dropped: the
    /// session may have been replaced or closed while the fetch was in
    /// flight, and the stale result must not resurrect it.
    pub fn loaded(&mut self, detail: SiteDetail) {
        if self.current_id() == Some(detail.site.id) {
            *self = DetailsSession::Open {
                id: detail.site.id,
                detail,
            };
        }
    }

    /// Record a failed detail fetch. Terminal for this attempt; the user
    /// must retry.
    pub fn fetch_failed(&mut self, id: SiteId, error: String) {
        if self.current_id() == Some(id) {
            *self = DetailsSession::Failed { id, error };
        }
    }

    /// Feed a reconcile event into the open view.
    ///
    /// Only an event for the open site updates it; the last fetched history
    /// is retained since periodic snapshots do not carry history.
    pub fn on_event(&mut self, event: &SiteEvent) {
        if let DetailsSession::Open { id, detail } = self {
            let site = event.site();
            if site.id == *id {
                detail.site = site.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::site::{HistoryEntry, Site};

    fn site(id: SiteId, status: &str) -> Site {
        Site {
            id,
            url: format!("https://site-{}.test", id),
            name: format!("Site {}", id),
            check_interval: 60,
            status: status.to_string(),
            response_time: 150,
            last_checked: None,
            uptime_percentage: None,
        }
    }

    fn detail(id: SiteId, status: &str) -> SiteDetail {
        SiteDetail {
            site: site(id, status),
            history: vec![HistoryEntry {
                timestamp: "2024-05-01T12:00:00".to_string(),
                status: status.to_string(),
                response_time: 150,
            }],
        }
    }

    #[test]
    fn test_open_load_close() {
        let mut session = DetailsSession::default();
        assert!(!session.is_open());

        session.open(1);
        assert_eq!(session, DetailsSession::Loading(1));

        session.loaded(detail(1, "OK (200)"));
        assert!(matches!(session, DetailsSession::Open { id: 1, .. }));

        session.close();
        assert_eq!(session, DetailsSession::Closed);
        assert_eq!(session.current_id(), None);
    }

    #[test]
    fn test_open_replaces_previous_session() {
        let mut session = DetailsSession::default();
        session.open(1);
        session.loaded(detail(1, "OK (200)"));

        session.open(2);
        assert_eq!(session, DetailsSession::Loading(2));

        // The late result for site 1 must not resurrect the old session
        session.loaded(detail(1, "OK (200)"));
        assert_eq!(session, DetailsSession::Loading(2));
    }

    #[test]
    fn test_fetch_failure_is_terminal_for_attempt() {
        let mut session = DetailsSession::default();
        session.open(1);
        session.fetch_failed(1, "connection refused".to_string());
        assert!(matches!(session, DetailsSession::Failed { id: 1, .. }));

        // Failure for some other id is ignored
        session.open(2);
        session.fetch_failed(1, "late error".to_string());
        assert_eq!(session, DetailsSession::Loading(2));
    }

    #[test]
    fn test_event_for_open_site_updates_in_place() {
        let mut session = DetailsSession::default();
        session.open(1);
        session.loaded(detail(1, "OK (200)"));

        let event = SiteEvent::Changed {
            previous: site(1, "OK (200)"),
            current: site(1, "Error (503)"),
        };
        session.on_event(&event);

        match &session {
            DetailsSession::Open { detail, .. } => {
                assert_eq!(detail.site.status, "Error (503)");
                // History from the last fetch is retained
                assert_eq!(detail.history.len(), 1);
            }
            other => panic!("expected Open, got {:?}", other),
        }
    }

    #[test]
    fn test_event_for_other_site_is_ignored() {
        let mut session = DetailsSession::default();
        session.open(1);
        let before = detail(1, "OK (200)");
        session.loaded(before.clone());

        let event = SiteEvent::Added(site(2, "Error (500)"));
        session.on_event(&event);

        assert_eq!(
            session,
            DetailsSession::Open {
                id: 1,
                detail: before
            }
        );
    }
}
