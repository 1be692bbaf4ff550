//! Site model and classification rules.
//!
//! These types match the JSON produced by the uptime backend. Classification
//! (health from the status string, severity from response time) is computed
//! on demand from the raw values and never cached on the entity.

use serde::{Deserialize, Serialize};

/// Stable identifier assigned to a site by the backend.
pub type SiteId = u64;

/// Response time above which a site is classified as slow.
pub const SLOW_THRESHOLD_MS: u64 = 1000;

/// Response time above which a site is classified as medium.
pub const MEDIUM_THRESHOLD_MS: u64 = 500;

/// Number of history entries shown in the detail overlay.
pub const RECENT_HISTORY: usize = 4;

/// A monitored site as returned by the backend.
///
/// Identity is `id`; every other field is replaced wholesale when a fresh
/// check result arrives, so `status` and `response_time` always form a pair
/// that co-occurred server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,
    pub url: String,
    pub name: String,
    /// Backend re-check cadence in seconds.
    pub check_interval: u64,
    /// Free-form status string; prefix "OK" means healthy.
    pub status: String,
    /// Last measured response time in milliseconds.
    pub response_time: u64,
    /// ISO-8601 timestamp of the last check, absent before the first check.
    #[serde(default)]
    pub last_checked: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime_percentage: Option<f64>,
}

/// One full poll result: an ordered sequence of sites, no duplicate ids.
pub type Snapshot = Vec<Site>;

/// A single check result in a site's history, supplied by the server
/// newest-first. Immutable once recorded; the client only displays a
/// bounded prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub status: String,
    pub response_time: u64,
}

/// A site plus its check history, as returned by the single-site endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteDetail {
    #[serde(flatten)]
    pub site: Site,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// Request body for creating a site.
#[derive(Debug, Clone, Serialize)]
pub struct NewSite {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub check_interval: u64,
}

/// Up/down classification from the status string prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Health {
    Up,
    Down,
}

impl Health {
    /// A site is healthy iff its status string starts with "OK".
    pub fn of(status: &str) -> Self {
        if status.starts_with("OK") {
            Health::Up
        } else {
            Health::Down
        }
    }

    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Health::Up => "UP",
            Health::Down => "DOWN",
        }
    }
}

/// Response-time severity band.
///
/// Ordered so that `max()` across a set yields the worst band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Normal,
    Medium,
    Slow,
}

impl Severity {
    /// Classify a response time in milliseconds.
    ///
    /// Boundary values belong to the lower band: exactly 500ms is normal,
    /// exactly 1000ms is medium.
    pub fn of(response_time_ms: u64) -> Self {
        if response_time_ms > SLOW_THRESHOLD_MS {
            Severity::Slow
        } else if response_time_ms > MEDIUM_THRESHOLD_MS {
            Severity::Medium
        } else {
            Severity::Normal
        }
    }

    /// Returns the display label for this band.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Normal => "Fast",
            Severity::Medium => "Medium",
            Severity::Slow => "Slow",
        }
    }
}

impl Site {
    pub fn health(&self) -> Health {
        Health::of(&self.status)
    }

    pub fn severity(&self) -> Severity {
        Severity::of(self.response_time)
    }

    /// Shields.io badge URL for embedding in a README.
    ///
    /// Parentheses are stripped from the status and spaces percent-encoded;
    /// color follows the same "OK"-prefix rule as everywhere else.
    pub fn badge_url(&self) -> String {
        let color = match self.health() {
            Health::Up => "green",
            Health::Down => "red",
        };
        let status = self
            .status
            .replace(['(', ')'], "")
            .replace(' ', "%20");
        format!("https://img.shields.io/badge/status-{}-{}", status, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_boundaries() {
        let cases = [
            (0, Severity::Normal),
            (499, Severity::Normal),
            (500, Severity::Normal),
            (501, Severity::Medium),
            (1000, Severity::Medium),
            (1001, Severity::Slow),
        ];
        for (ms, expected) in cases {
            assert_eq!(Severity::of(ms), expected, "for {}ms", ms);
        }
    }

    #[test]
    fn test_health_prefix_rule() {
        assert_eq!(Health::of("OK (200)"), Health::Up);
        assert_eq!(Health::of("OK"), Health::Up);
        assert_eq!(Health::of("DOWN (Timeout)"), Health::Down);
        assert_eq!(Health::of("ERROR"), Health::Down);
        assert_eq!(Health::of("Unknown"), Health::Down);
    }

    #[test]
    fn test_badge_url() {
        let site = sample_site("OK (200)");
        assert_eq!(
            site.badge_url(),
            "https://img.shields.io/badge/status-OK%20200-green"
        );

        let site = sample_site("Error (500)");
        assert_eq!(
            site.badge_url(),
            "https://img.shields.io/badge/status-Error%20500-red"
        );
    }

    #[test]
    fn test_deserialize_site() {
        let json = r#"{
            "id": 1,
            "url": "https://example.com",
            "name": "Example",
            "check_interval": 60,
            "status": "OK (200)",
            "response_time": 123,
            "last_checked": "2024-05-01T12:00:00"
        }"#;

        let site: Site = serde_json::from_str(json).unwrap();
        assert_eq!(site.id, 1);
        assert_eq!(site.response_time, 123);
        assert_eq!(site.last_checked.as_deref(), Some("2024-05-01T12:00:00"));
        assert!(site.uptime_percentage.is_none());
    }

    #[test]
    fn test_deserialize_detail_with_history() {
        let json = r#"{
            "id": 2,
            "url": "https://example.org",
            "name": "Example Org",
            "check_interval": 30,
            "status": "Error (503)",
            "response_time": 0,
            "last_checked": null,
            "uptime_percentage": 87.5,
            "history": [
                {"timestamp": "2024-05-01T12:00:00", "status": "Error (503)", "response_time": 0},
                {"timestamp": "2024-05-01T11:59:00", "status": "OK (200)", "response_time": 210}
            ]
        }"#;

        let detail: SiteDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.site.id, 2);
        assert_eq!(detail.site.uptime_percentage, Some(87.5));
        assert_eq!(detail.history.len(), 2);
        assert_eq!(detail.history[1].response_time, 210);
    }

    pub(crate) fn sample_site(status: &str) -> Site {
        Site {
            id: 1,
            url: "https://example.com".to_string(),
            name: "Example".to_string(),
            check_interval: 60,
            status: status.to_string(),
            response_time: 120,
            last_checked: Some("2024-05-01T12:00:00".to_string()),
            uptime_percentage: None,
        }
    }
}
