//! Persistence gateways.
//!
//! A gateway stores and retrieves the whole link collection as one unit.
//! There are no partial writes and no versioning: every `replace_all`
//! overwrites what was there, and the last write to complete wins.

pub mod local;
pub mod memory;
pub mod remote;

use async_trait::async_trait;
use tracing::warn;

use crate::types::errors::GatewayError;
use crate::types::link::Link;

pub use local::LocalSlotGateway;
pub use memory::MemoryGateway;
pub use remote::RemoteGateway;

/// Durable read/write of the full link collection.
///
/// Abstracted as a trait so the store can be driven by a fake backend in tests.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Reads the stored collection. A backend with nothing stored yet returns `Ok(vec![])`.
    async fn try_fetch_all(&self) -> Result<Vec<Link>, GatewayError>;

    /// Replaces the stored collection with `links`.
    async fn replace_all(&self, links: &[Link]) -> Result<(), GatewayError>;

    /// Short backend description for logs and status output.
    fn describe(&self) -> String;

    /// Reads the stored collection, treating any failure as "no data".
    async fn fetch_all(&self) -> Vec<Link> {
        match self.try_fetch_all().await {
            Ok(links) => links,
            Err(e) => {
                warn!(backend = %self.describe(), error = %e, "fetching links failed; using empty collection");
                Vec::new()
            }
        }
    }
}

/// Serializes a collection into the JSON array stored by every backend.
pub(crate) fn encode_links(links: &[Link]) -> Result<String, GatewayError> {
    serde_json::to_string(links).map_err(|e| GatewayError::Encode(e.to_string()))
}

/// Parses a JSON array of links.
pub(crate) fn decode_links(raw: &str) -> Result<Vec<Link>, GatewayError> {
    serde_json::from_str(raw).map_err(|e| GatewayError::Decode(e.to_string()))
}
