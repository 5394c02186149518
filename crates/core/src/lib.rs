// crates/core/src/lib.rs
//! Plate lookup client core: backend transport, configuration and the
//! job tracker that follows a lookup to its result.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod lookup;
pub mod plate;
pub mod tracker;

pub use api::*;
pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::*;
pub use lookup::PlateLookup;
pub use plate::normalize_plate;
pub use tracker::{JobTracker, TrackerOptions, TrackerPhase, TrackerState};
