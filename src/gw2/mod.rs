//! Guild Wars 2 API access.
//!
//! [`client::Gw2Client`] talks to the public REST API, [`models`] holds the
//! response payloads, and [`snapshot::Snapshot`] flattens them into the counters
//! a play session tracks.

/// HTTP client for the GW2 REST API
pub mod client;
/// Response payloads
pub mod models;
/// Flattened account state used by sessions
pub mod snapshot;

pub use client::Gw2Client;
pub use snapshot::{CharacterDeaths, Snapshot};
