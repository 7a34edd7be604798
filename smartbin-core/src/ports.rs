//! Trait describing the bin-status backend and its error type.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;

use crate::model::BinStatusResponse;

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to the bin-status backend.
pub enum PortError {
    /// Transport failed, the status was not a success, or the body did not decode.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// Internal provider error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[async_trait]
/// Source of the current status of all bins.
pub trait BinStatusPort: Send + Sync {
    /// Human-readable description of where the data comes from.
    fn source(&self) -> &str;

    /// Fetch the status payload for every active bin.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the backend request fails.
    async fn all_status(&self) -> Result<BinStatusResponse, PortError>;
}
