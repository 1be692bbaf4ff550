// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # sitewatch
//!
//! A terminal dashboard and client library for an uptime-monitoring
//! backend.
//!
//! This crate polls a REST backend that checks websites on a schedule and
//! renders the fleet in an interactive terminal UI: per-site status,
//! response times, check history, and uptime. It can also register and
//! remove sites from the command line.
//!
//! ## Architecture
//!
//! The crate is organized into five main modules:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Application                           │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐  │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│  │
//! │  │ (state) │    │ (store)  │    │(rendering)   │         │  │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘  │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  ┌─────────┐         ┌─────────┐                             │
//! │  │  poll   │────────▶│   api   │──── HTTP ───▶ backend       │
//! │  │ (timer) │         │ (REST)  │                             │
//! │  └─────────┘         └─────────┘                             │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, and user interaction logic
//! - **[`poll`]**: The periodic fetch timer and on-demand triggers; every
//!   completed request becomes a [`poll::PollUpdate`] applied in arrival order
//! - **[`api`]**: REST client for the backend (fetch, check, create, delete)
//! - **[`data`]**: The site store, snapshot reconciliation, the detail
//!   session, and timestamp formatting
//! - **[`ui`]**: Terminal rendering using ratatui - the sites table, the
//!   response-time chart, the detail overlay, and theme support
//!
//! ## Features
//!
//! - **Sites view**: All monitored sites with status and response times
//! - **Chart view**: Response-time bars colored by severity
//! - **Detail overlay**: Per-site history, uptime, and status badge
//! - **Manual control**: Force checks, refresh, add and delete sites
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a local backend
//! sitewatch --endpoint http://localhost:5000
//!
//! # Register a site and exit
//! sitewatch --add https://example.com --name "Example" --interval 120
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use sitewatch::{ApiClient, App, Poller};
//!
//! # tokio_test::block_on(async {
//! let client = ApiClient::builder()
//!     .endpoint("http://localhost:5000")
//!     .build();
//! let (poller, updates) = Poller::new(client);
//! let mut app = App::new(poller, updates);
//! app.start_polling(std::time::Duration::from_secs(30));
//! # });
//! ```

pub mod api;
pub mod app;
pub mod data;
pub mod events;
pub mod poll;
pub mod ui;

// Re-export main types for convenience
pub use api::{ApiClient, ApiError};
pub use app::App;
pub use data::{
    DetailsSession, Health, HistoryEntry, NewSite, Severity, Site, SiteDetail, SiteId, SiteStore,
    Snapshot,
};
pub use poll::{PollUpdate, Poller};
