//! In-memory port implementation for tests of the monitor and its consumers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::model::{BinId, BinStatus, BinStatusResponse};
use crate::ports::{BinStatusPort, PortError};

type Responder = Box<dyn Fn(usize) -> Result<BinStatusResponse, PortError> + Send + Sync>;
type Delay = Box<dyn Fn(usize) -> Duration + Send + Sync>;

/// Port that answers from a closure and counts how often it was called.
pub struct ScriptedPort {
    responder: Responder,
    delay: Option<Delay>,
    calls: AtomicUsize,
}

impl ScriptedPort {
    /// Answer each call with `responder(call_index)`, starting at zero.
    #[must_use]
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(usize) -> Result<BinStatusResponse, PortError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Answer every call the same way.
    #[must_use]
    pub fn always<F>(responder: F) -> Self
    where
        F: Fn() -> Result<BinStatusResponse, PortError> + Send + Sync + 'static,
    {
        Self::new(move |_call| responder())
    }

    /// Sleep for `delay` before answering every call.
    #[must_use]
    pub fn with_delay(self, delay: Duration) -> Self {
        self.with_delays(move |_call| delay)
    }

    /// Sleep for `delay(call_index)` before answering.
    #[must_use]
    pub fn with_delays<F>(mut self, delay: F) -> Self
    where
        F: Fn(usize) -> Duration + Send + Sync + 'static,
    {
        self.delay = Some(Box::new(delay));
        self
    }

    /// Number of requests started so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BinStatusPort for ScriptedPort {
    fn source(&self) -> &str {
        "scripted"
    }

    async fn all_status(&self) -> Result<BinStatusResponse, PortError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = &self.delay {
            tokio::time::sleep(delay(call)).await;
        }
        (self.responder)(call)
    }
}

/// Bin with the given id and fill level and a status matching the level.
#[must_use]
pub fn bin(id: &str, fill_level: f64) -> BinStatus {
    let status = match fill_level {
        level if level >= 90.0 => "critical",
        level if level >= 70.0 => "needs_collection",
        level if level >= 50.0 => "moderate",
        _ => "good",
    };
    BinStatus {
        bin_id: BinId(id.to_owned()),
        area: String::from("Test Area"),
        fill_level,
        status: status.to_owned(),
        last_update: None,
        latitude: None,
        longitude: None,
    }
}

/// Successful payload carrying `bins`.
#[must_use]
pub fn response(bins: Vec<BinStatus>) -> BinStatusResponse {
    BinStatusResponse {
        success: Some(true),
        total_bins: Some(bins.len()),
        bins: Some(bins),
        ..BinStatusResponse::default()
    }
}
