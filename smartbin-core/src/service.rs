//! High-level service facade over the bin-status backend.

use std::sync::Arc;

use crate::model::BinStatus;
use crate::ports::{BinStatusPort, PortError};

/// Public entry point for reading bin status.
pub struct SmartBinService {
    port: Arc<dyn BinStatusPort>,
}

impl SmartBinService {
    /// Create a new service bound to the provided port.
    #[must_use]
    pub fn new(port: Arc<dyn BinStatusPort>) -> Self {
        Self { port }
    }

    /// Description of the backend this service reads from.
    #[must_use]
    pub fn source(&self) -> &str {
        self.port.source()
    }

    /// Load the current set of bins.
    ///
    /// A payload without a bin list yields an empty set. A payload flagged
    /// `success: false` is logged and still replaces the set with whatever it carries.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the request fails.
    pub async fn bins(&self) -> Result<Vec<BinStatus>, PortError> {
        let response = self.port.all_status().await?;
        if response.success == Some(false) {
            tracing::warn!(
                source = self.source(),
                error = response.error.as_deref().unwrap_or("unspecified"),
                "backend reported an unsuccessful bin status request"
            );
        }
        Ok(response.into_bins())
    }
}
