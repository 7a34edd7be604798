//! Core types, classifiers, and the live status monitor for the smartbin dashboard.

/// Compiled-in defaults for endpoint and polling period.
pub mod config;
/// Bin data model and severity classification.
pub mod model;
/// Polling lifecycle and the state it renders from.
pub mod monitor;
/// Trait describing the bin-status backend.
pub mod ports;
/// High-level service facade used by clients.
pub mod service;
/// Scripted port and fixtures for tests.
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::*;
pub use model::*;
pub use monitor::*;
pub use ports::*;
pub use service::*;
