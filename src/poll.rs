//! Timer-driven polling of the uptime backend.
//!
//! The [`Poller`] owns the polling cadence and manual triggers. Every
//! network completion is pushed into a single channel and applied by the
//! consumer in arrival order, not issue order: overlapping requests are not
//! serialized or cancelled, so a slow response that lands after a newer one
//! overwrites it with stale data. That weak-consistency trade-off is
//! accepted for simplicity.
//!
//! A failed request becomes an update on the same channel and never stops
//! the timer loop; the next scheduled tick still fires.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::ApiClient;
use crate::data::{Site, SiteDetail, SiteId, Snapshot};

/// A completed network operation, delivered in arrival order.
#[derive(Debug)]
pub enum PollUpdate {
    /// Result of a fetch-all (periodic tick or manual refresh).
    Snapshot(Snapshot),
    /// Result of a forced single-site re-check; reconciled as a
    /// one-element snapshot.
    SiteChecked(Site),
    /// Result of a detail fetch for the open session.
    DetailLoaded(SiteDetail),
    /// A detail fetch failed; the session shows the error until retried.
    DetailFailed { id: SiteId, error: String },
    /// The backend confirmed removal of a site.
    SiteDeleted(SiteId),
    /// Any other failed operation. The prior store state is retained and
    /// the error surfaced as a transient notice.
    Failed(String),
}

/// Issues backend requests on a fixed cadence and on demand.
#[derive(Debug)]
pub struct Poller {
    client: Arc<ApiClient>,
    tx: mpsc::UnboundedSender<PollUpdate>,
    periodic: Option<JoinHandle<()>>,
}

impl Poller {
    /// Create a poller and the channel its updates arrive on.
    pub fn new(client: ApiClient) -> (Self, mpsc::UnboundedReceiver<PollUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let poller = Self {
            client: Arc::new(client),
            tx,
            periodic: None,
        };
        (poller, rx)
    }

    /// Schedule a recurring fetch-all.
    ///
    /// Only one periodic timer is ever active: re-calling replaces the
    /// previous timer rather than stacking a second one. The first fetch
    /// fires immediately.
    pub fn start_periodic(&mut self, interval: Duration) {
        if let Some(handle) = self.periodic.take() {
            handle.abort();
        }

        let client = self.client.clone();
        let tx = self.tx.clone();
        self.periodic = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let update = match client.fetch_sites().await {
                    Ok(snapshot) => PollUpdate::Snapshot(snapshot),
                    Err(e) => {
                        tracing::warn!(error = %e, "periodic poll failed");
                        PollUpdate::Failed(format!("Failed to fetch sites: {}", e))
                    }
                };
                if tx.send(update).is_err() {
                    break;
                }
            }
        }));
    }

    /// Whether a periodic timer is currently scheduled.
    pub fn periodic_active(&self) -> bool {
        self.periodic.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Fetch the full site list once, outside the periodic cadence.
    pub fn refresh_now(&self) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let update = match client.fetch_sites().await {
                Ok(snapshot) => PollUpdate::Snapshot(snapshot),
                Err(e) => PollUpdate::Failed(format!("Failed to fetch sites: {}", e)),
            };
            let _ = tx.send(update);
        });
    }

    /// Force a re-check of one site.
    ///
    /// Runs independently of any in-flight periodic fetch; both results
    /// reconcile on arrival, last applied wins.
    pub fn check_site(&self, id: SiteId) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let update = match client.check_site(id).await {
                Ok(site) => PollUpdate::SiteChecked(site),
                Err(e) => {
                    tracing::warn!(site = id, error = %e, "manual check failed");
                    PollUpdate::Failed(format!("Failed to check site: {}", e))
                }
            };
            let _ = tx.send(update);
        });
    }

    /// Fetch a site's detail (including history) for the open session.
    pub fn fetch_detail(&self, id: SiteId) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let update = match client.fetch_site(id).await {
                Ok(detail) => PollUpdate::DetailLoaded(detail),
                Err(e) => PollUpdate::DetailFailed {
                    id,
                    error: e.to_string(),
                },
            };
            let _ = tx.send(update);
        });
    }

    /// Ask the backend to remove a site. The local store entry is only
    /// dropped once the backend confirms.
    pub fn delete_site(&self, id: SiteId) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let update = match client.delete_site(id).await {
                Ok(()) => PollUpdate::SiteDeleted(id),
                Err(e) => PollUpdate::Failed(format!("Failed to delete site: {}", e)),
            };
            let _ = tx.send(update);
        });
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        if let Some(handle) = self.periodic.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Nothing listens here; requests fail fast with connection refused.
    fn unreachable_client() -> ApiClient {
        ApiClient::builder()
            .endpoint("http://127.0.0.1:9")
            .timeout(Duration::from_millis(500))
            .build()
    }

    async fn recv(rx: &mut mpsc::UnboundedReceiver<PollUpdate>) -> PollUpdate {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for update")
            .expect("channel closed")
    }

    #[tokio::test]
    async fn test_failed_check_surfaces_as_update() {
        let (poller, mut rx) = Poller::new(unreachable_client());
        poller.check_site(1);

        match recv(&mut rx).await {
            PollUpdate::Failed(msg) => assert!(msg.contains("Failed to check site")),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_detail_fetch_carries_site_id() {
        let (poller, mut rx) = Poller::new(unreachable_client());
        poller.fetch_detail(7);

        match recv(&mut rx).await {
            PollUpdate::DetailFailed { id, .. } => assert_eq!(id, 7),
            other => panic!("expected DetailFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_periodic_failure_does_not_stop_timer() {
        let (mut poller, mut rx) = Poller::new(unreachable_client());
        poller.start_periodic(Duration::from_millis(10));

        // Two consecutive failures prove the loop survives the first one
        assert!(matches!(recv(&mut rx).await, PollUpdate::Failed(_)));
        assert!(matches!(recv(&mut rx).await, PollUpdate::Failed(_)));
        assert!(poller.periodic_active());
    }

    #[tokio::test]
    async fn test_restarting_periodic_replaces_previous_timer() {
        let (mut poller, mut rx) = Poller::new(unreachable_client());
        poller.start_periodic(Duration::from_secs(3600));
        poller.start_periodic(Duration::from_millis(10));
        assert!(poller.periodic_active());

        // Manual triggers still work alongside the periodic timer
        poller.check_site(1);
        assert!(matches!(recv(&mut rx).await, PollUpdate::Failed(_)));
    }
}
