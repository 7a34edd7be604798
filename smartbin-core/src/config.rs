//! Compiled-in defaults for the live status monitor.

use std::time::Duration;

/// Bin-status endpoint of the local development backend.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/api/iot/bins/all-status";

/// Time between two polls of the backend.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, PartialEq, Eq)]
/// Where and how often the monitor polls.
pub struct MonitorConfig {
    /// Full URL of the bin-status endpoint.
    pub endpoint: String,
    /// Period of the polling timer.
    pub poll_interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}
