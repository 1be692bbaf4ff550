//! Data models and reconciliation for uptime snapshots.
//!
//! ## Submodules
//!
//! - [`site`]: Wire-format types and the classification rules (health from
//!   status prefix, severity from response-time thresholds)
//! - [`store`]: In-memory [`SiteStore`] of last known per-site state
//! - [`reconcile`]: Diffs incoming snapshots against the store and emits
//!   minimal [`SiteEvent`]s
//! - [`session`]: [`DetailsSession`] state machine for the single open
//!   detail view
//! - [`timefmt`]: Timestamp parsing and friendly/relative display formats
//!
//! ## Data Flow
//!
//! ```text
//! Snapshot (raw JSON from a poll)
//!        │
//!        ▼
//! reconcile::apply(store, snapshot)
//!        │
//!        ├──▶ SiteStore updated (wholesale upsert per changed site)
//!        │
//!        └──▶ Vec<SiteEvent> ──▶ UI patches + DetailsSession::on_event
//! ```

pub mod reconcile;
pub mod session;
pub mod site;
pub mod store;
pub mod timefmt;

pub use reconcile::SiteEvent;
pub use session::DetailsSession;
pub use site::{
    Health, HistoryEntry, NewSite, Severity, Site, SiteDetail, SiteId, Snapshot, RECENT_HISTORY,
};
pub use store::SiteStore;
