//! Application state and update application.

use std::time::Instant;

use tokio::sync::mpsc;

use crate::data::{reconcile, DetailsSession, Site, SiteEvent, SiteId, SiteStore};
use crate::poll::{PollUpdate, Poller};
use crate::ui::Theme;

/// The current view/tab in the TUI.
///
/// Site detail is shown as an overlay (owned by [`DetailsSession`]) rather
/// than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Table of all monitored sites.
    Sites,
    /// Response-time bar chart.
    Chart,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Sites => View::Chart,
            View::Chart => View::Sites,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Sites => "Sites",
            View::Chart => "Chart",
        }
    }
}

/// Main application state.
///
/// Owns the store, the detail session, and the poller; between renders the
/// event loop calls [`App::drain_updates`] to apply completed network
/// operations in arrival order.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    pub store: SiteStore,
    pub session: DetailsSession,
    poller: Poller,
    updates: mpsc::UnboundedReceiver<PollUpdate>,

    /// Set once the first snapshot has been applied this session.
    pub loaded: bool,
    pub last_error: Option<String>,
    pub last_updated: Option<Instant>,

    // Navigation state
    pub selected_index: usize,

    /// Site with a manual check in flight, for the spinner marker. Always
    /// cleared when the result or the failure arrives.
    pub checking: Option<SiteId>,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App around a poller and its update channel.
    pub fn new(poller: Poller, updates: mpsc::UnboundedReceiver<PollUpdate>) -> Self {
        Self {
            running: true,
            current_view: View::Sites,
            show_help: false,
            store: SiteStore::new(),
            session: DetailsSession::default(),
            poller,
            updates,
            loaded: false,
            last_error: None,
            last_updated: None,
            selected_index: 0,
            checking: None,
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Start (or restart) the periodic fetch-all timer.
    pub fn start_polling(&mut self, interval: std::time::Duration) {
        self.poller.start_periodic(interval);
    }

    /// Apply every completed network operation waiting on the channel.
    ///
    /// Returns true if anything was applied. Completions are applied in
    /// arrival order; each one runs to completion before the next, so the
    /// store is never observed mid-update.
    pub fn drain_updates(&mut self) -> bool {
        let mut any = false;
        while let Ok(update) = self.updates.try_recv() {
            self.apply_update(update);
            any = true;
        }
        any
    }

    pub(crate) fn apply_update(&mut self, update: PollUpdate) {
        match update {
            PollUpdate::Snapshot(snapshot) => {
                let events = reconcile::apply(&mut self.store, snapshot);
                self.loaded = true;
                self.last_error = None;
                self.last_updated = Some(Instant::now());
                self.notify_status_flips(&events);
                for event in &events {
                    self.session.on_event(event);
                }
                self.clamp_selection();
            }
            PollUpdate::SiteChecked(site) => {
                self.checking = None;
                let name = site.name.clone();
                let events = reconcile::apply(&mut self.store, vec![site]);
                self.last_updated = Some(Instant::now());
                self.notify_status_flips(&events);
                for event in &events {
                    self.session.on_event(event);
                }
                self.set_status_message(format!("Checked {}", name));
            }
            PollUpdate::DetailLoaded(detail) => {
                self.session.loaded(detail);
            }
            PollUpdate::DetailFailed { id, error } => {
                self.session.fetch_failed(id, error);
            }
            PollUpdate::SiteDeleted(id) => {
                if let Some(site) = self.store.remove(id) {
                    self.set_status_message(format!("Deleted {}", site.name));
                }
                if self.session.current_id() == Some(id) {
                    self.session.close();
                }
                self.clamp_selection();
            }
            PollUpdate::Failed(message) => {
                // A lost check must not leave the spinner stuck
                self.checking = None;
                self.last_error = Some(message.clone());
                self.set_status_message(message);
            }
        }
    }

    /// Surface a transient notice for every site whose health flipped.
    fn notify_status_flips(&mut self, events: &[SiteEvent]) {
        for event in events {
            if let SiteEvent::Changed { previous, current } = event {
                if previous.health() != current.health() {
                    tracing::info!(
                        site = %current.name,
                        from = %previous.status,
                        to = %current.status,
                        "site status changed"
                    );
                    self.set_status_message(format!(
                        "{}: {} -> {}",
                        current.name, previous.status, current.status
                    ));
                }
            }
        }
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// The site under the cursor, in store (first-seen) order.
    pub fn selected_site(&self) -> Option<&Site> {
        self.store.all().get(self.selected_index).copied()
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.store.len().saturating_sub(1);
        self.selected_index = (self.selected_index + n).min(max);
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_index = self.selected_index.saturating_sub(n);
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        self.selected_index = self.store.len().saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        if self.selected_index >= self.store.len() {
            self.selected_index = self.store.len().saturating_sub(1);
        }
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Open the detail overlay for the selected site and fire its fetch.
    pub fn open_selected_detail(&mut self) {
        if let Some(site) = self.selected_site() {
            let id = site.id;
            self.session.open(id);
            self.poller.fetch_detail(id);
        }
    }

    /// Retry the detail fetch after a failure.
    pub fn retry_detail(&mut self) {
        if let Some(id) = self.session.current_id() {
            self.session.open(id);
            self.poller.fetch_detail(id);
        }
    }

    /// Close the detail overlay.
    pub fn close_detail(&mut self) {
        self.session.close();
    }

    /// Force a re-check of one site, with a spinner marker until the
    /// result (or failure) arrives.
    pub fn check_site(&mut self, id: SiteId) {
        if self.checking.is_some() {
            return;
        }
        self.checking = Some(id);
        self.poller.check_site(id);
    }

    /// Check the open detail site if any, otherwise the selected row.
    pub fn check_current(&mut self) {
        let target = self
            .session
            .current_id()
            .or_else(|| self.selected_site().map(|s| s.id));
        if let Some(id) = target {
            self.check_site(id);
        }
    }

    /// Fetch the full site list now, outside the periodic cadence.
    pub fn refresh_now(&mut self) {
        self.poller.refresh_now();
        self.set_status_message("Refreshing...".to_string());
    }

    /// Request deletion of the selected site. The store entry is removed
    /// only once the backend confirms.
    pub fn delete_selected(&mut self) {
        if let Some(site) = self.selected_site() {
            self.poller.delete_site(site.id);
        }
    }

    /// Navigate back: close overlays before quitting contexts.
    pub fn go_back(&mut self) {
        if self.show_help {
            self.show_help = false;
        } else if self.session.is_open() {
            self.close_detail();
        }
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;

    fn test_app() -> App {
        let client = ApiClient::builder().endpoint("http://127.0.0.1:9").build();
        let (poller, rx) = Poller::new(client);
        App::new(poller, rx)
    }

    fn site(id: SiteId, status: &str, response_time: u64) -> Site {
        Site {
            id,
            url: format!("https://site-{}.test", id),
            name: format!("Site {}", id),
            check_interval: 60,
            status: status.to_string(),
            response_time,
            last_checked: None,
            uptime_percentage: None,
        }
    }

    #[test]
    fn test_snapshot_populates_store() {
        let mut app = test_app();
        assert!(!app.loaded);

        app.apply_update(PollUpdate::Snapshot(vec![
            site(1, "OK (200)", 100),
            site(2, "Error (500)", 0),
        ]));

        assert!(app.loaded);
        assert_eq!(app.store.counts(), (2, 1, 1));
        assert!(app.last_error.is_none());
    }

    #[test]
    fn test_failed_update_retains_store_and_clears_spinner() {
        let mut app = test_app();
        app.apply_update(PollUpdate::Snapshot(vec![site(1, "OK (200)", 100)]));
        app.checking = Some(1);

        app.apply_update(PollUpdate::Failed("Failed to check site".to_string()));

        // Prior state retained, spinner cleared, error surfaced
        let kept = app.store.get(1).unwrap();
        assert_eq!(kept.status, "OK (200)");
        assert_eq!(kept.response_time, 100);
        assert!(app.checking.is_none());
        assert!(app.last_error.is_some());
    }

    #[test]
    fn test_status_flip_sets_notice() {
        let mut app = test_app();
        app.apply_update(PollUpdate::Snapshot(vec![site(1, "OK (200)", 100)]));
        app.status_message = None;

        app.apply_update(PollUpdate::Snapshot(vec![site(1, "Error (503)", 0)]));

        let notice = app.get_status_message().unwrap();
        assert!(notice.contains("OK (200)"));
        assert!(notice.contains("Error (503)"));
    }

    #[test]
    fn test_unchanged_snapshot_sets_no_notice() {
        let mut app = test_app();
        app.apply_update(PollUpdate::Snapshot(vec![site(1, "OK (200)", 100)]));
        app.status_message = None;

        app.apply_update(PollUpdate::Snapshot(vec![site(1, "OK (200)", 100)]));
        assert!(app.get_status_message().is_none());
    }

    #[test]
    fn test_checked_site_feeds_reconciler_and_session() {
        let mut app = test_app();
        app.apply_update(PollUpdate::Snapshot(vec![site(1, "OK (200)", 100)]));
        app.session.open(1);
        app.apply_update(PollUpdate::DetailLoaded(crate::data::SiteDetail {
            site: site(1, "OK (200)", 100),
            history: vec![],
        }));
        app.checking = Some(1);

        app.apply_update(PollUpdate::SiteChecked(site(1, "OK (200)", 900)));

        assert!(app.checking.is_none());
        assert_eq!(app.store.get(1).unwrap().response_time, 900);
        match &app.session {
            DetailsSession::Open { detail, .. } => {
                assert_eq!(detail.site.response_time, 900)
            }
            other => panic!("expected Open, got {:?}", other),
        }
    }

    #[test]
    fn test_delete_confirmation_removes_and_closes_session() {
        let mut app = test_app();
        app.apply_update(PollUpdate::Snapshot(vec![
            site(1, "OK", 100),
            site(2, "OK", 100),
        ]));
        app.selected_index = 1;
        app.session.open(2);

        app.apply_update(PollUpdate::SiteDeleted(2));

        assert!(app.store.get(2).is_none());
        assert_eq!(app.session, DetailsSession::Closed);
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_selection_bounds() {
        let mut app = test_app();
        app.apply_update(PollUpdate::Snapshot(vec![
            site(1, "OK", 100),
            site(2, "OK", 100),
            site(3, "OK", 100),
        ]));

        app.select_last();
        assert_eq!(app.selected_index, 2);
        app.select_next();
        assert_eq!(app.selected_index, 2);
        app.select_prev_n(10);
        assert_eq!(app.selected_index, 0);
    }
}
