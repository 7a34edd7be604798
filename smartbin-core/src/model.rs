//! Domain data structures for bins, their reported status, and fill severity.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Identifier for a bin as reported by the backend.
pub struct BinId(pub String);

impl fmt::Display for BinId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Latest sensor snapshot for a single bin.
pub struct BinStatus {
    /// Unique identifier.
    pub bin_id: BinId,
    /// Human-readable location label.
    #[serde(default, deserialize_with = "null_as_default")]
    pub area: String,
    /// Fill percentage, expected in `[0, 100]` but not clamped.
    pub fill_level: f64,
    /// Classification string supplied by the backend.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    /// Timestamp of the last sensor reading, as sent by the backend.
    #[serde(default)]
    pub last_update: Option<String>,
    /// Latitude of the bin, when known.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude of the bin, when known.
    #[serde(default)]
    pub longitude: Option<f64>,
}

// The backend sends `null` for unset nullable columns.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl BinStatus {
    /// Severity derived locally from the fill level.
    #[must_use]
    pub fn severity(&self) -> FillSeverity {
        FillSeverity::classify(self.fill_level)
    }

    /// Status label reported by the backend.
    #[must_use]
    pub fn reported_status(&self) -> ReportedStatus {
        ReportedStatus::from(self.status.as_str())
    }

    /// Time of day of the last sensor reading, if the backend sent a parseable timestamp.
    ///
    /// Accepts RFC 3339 as well as the offset-less ISO form the backend emits.
    #[must_use]
    pub fn last_update_time(&self) -> Option<NaiveTime> {
        let raw = self.last_update.as_deref()?.trim();
        if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
            return Some(stamp.time());
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|stamp| stamp.time())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
/// Body returned by the all-status endpoint.
pub struct BinStatusResponse {
    /// Whether the backend considers the request successful.
    #[serde(default)]
    pub success: Option<bool>,
    /// All active bins; `None` when the field is absent or `null`.
    #[serde(default)]
    pub bins: Option<Vec<BinStatus>>,
    /// Number of bins the backend counted.
    #[serde(default)]
    pub total_bins: Option<usize>,
    /// Backend clock at the time of the response.
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Error message accompanying `success: false`.
    #[serde(default)]
    pub error: Option<String>,
}

impl BinStatusResponse {
    /// Take the bin list out of the payload, treating a missing list as empty.
    #[must_use]
    pub fn into_bins(self) -> Vec<BinStatus> {
        self.bins.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Visual urgency tier computed from a fill level.
pub enum FillSeverity {
    /// 90 % and above (red).
    Critical,
    /// 70 % up to 90 % (orange).
    High,
    /// 50 % up to 70 % (yellow).
    Moderate,
    /// Below 50 % (green).
    Low,
}

impl FillSeverity {
    /// Lower bound of [`FillSeverity::Critical`].
    pub const CRITICAL_THRESHOLD: f64 = 90.0;
    /// Lower bound of [`FillSeverity::High`].
    pub const HIGH_THRESHOLD: f64 = 70.0;
    /// Lower bound of [`FillSeverity::Moderate`].
    pub const MODERATE_THRESHOLD: f64 = 50.0;

    /// Classify a fill level. Thresholds are checked from the top, first match wins.
    #[must_use]
    pub fn classify(fill_level: f64) -> Self {
        if fill_level >= Self::CRITICAL_THRESHOLD {
            Self::Critical
        } else if fill_level >= Self::HIGH_THRESHOLD {
            Self::High
        } else if fill_level >= Self::MODERATE_THRESHOLD {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Color name used when rendering this tier.
    #[must_use]
    pub fn color_name(self) -> &'static str {
        match self {
            Self::Critical => "red",
            Self::High => "orange",
            Self::Moderate => "yellow",
            Self::Low => "green",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Classification label reported by the backend for a bin.
pub enum ReportedStatus {
    /// `critical`
    Critical,
    /// `needs_collection`
    NeedsCollection,
    /// `moderate`
    Moderate,
    /// Any other label, including an empty one.
    Nominal(String),
}

impl From<&str> for ReportedStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "critical" => Self::Critical,
            "needs_collection" => Self::NeedsCollection,
            "moderate" => Self::Moderate,
            other => Self::Nominal(other.to_owned()),
        }
    }
}

impl ReportedStatus {
    /// Status icon shown next to the bin identifier.
    #[must_use]
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Critical => "🔴",
            Self::NeedsCollection => "🟠",
            Self::Moderate => "🟡",
            Self::Nominal(_) => "🟢",
        }
    }
}

/// Icon for a raw backend status string.
#[must_use]
pub fn status_icon(status: &str) -> &'static str {
    ReportedStatus::from(status).icon()
}

/// Width of a percentage bar for the given fill level, e.g. `"90%"`.
///
/// The value is not clamped, so out-of-range levels produce widths beyond `100%`.
#[must_use]
pub fn bar_width(fill_level: f64) -> String {
    format!("{fill_level}%")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Number of bins in each fill severity tier.
pub struct SeveritySummary {
    /// Bins at or above 90 %.
    pub critical: usize,
    /// Bins from 70 % up to 90 %.
    pub needs_collection: usize,
    /// Bins from 50 % up to 70 %.
    pub moderate: usize,
    /// Bins below 50 %.
    pub good: usize,
}

impl SeveritySummary {
    /// Count the bins of a set by fill severity.
    #[must_use]
    pub fn from_bins(bins: &[BinStatus]) -> Self {
        bins.iter().fold(Self::default(), |mut summary, bin| {
            match bin.severity() {
                FillSeverity::Critical => summary.critical += 1,
                FillSeverity::High => summary.needs_collection += 1,
                FillSeverity::Moderate => summary.moderate += 1,
                FillSeverity::Low => summary.good += 1,
            }
            summary
        })
    }

    /// Total number of bins counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.critical + self.needs_collection + self.moderate + self.good
    }
}
