//! Local device storage gateway.
//!
//! The collection lives as a JSON array in one named slot of the SQLite
//! slot database. SQLite calls are blocking, so each operation runs on
//! tokio's blocking pool.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;

use super::{decode_links, encode_links, PersistenceGateway};
use crate::database::Database;
use crate::types::errors::GatewayError;
use crate::types::link::Link;

/// Default slot name for the link collection.
pub const DEFAULT_SLOT: &str = "pocket-links";

pub struct LocalSlotGateway {
    db: Arc<Mutex<Database>>,
    slot: String,
}

impl LocalSlotGateway {
    /// Opens (or creates) the slot database at `path`.
    pub fn open<P: AsRef<Path>>(path: P, slot: &str) -> Result<Self, GatewayError> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    GatewayError::Io(format!("Failed to create data directory: {}", e))
                })?;
            }
        }
        let db = Database::open(path)?;
        Ok(Self::from_database(db, slot))
    }

    /// Uses a throwaway in-memory database.
    pub fn in_memory(slot: &str) -> Result<Self, GatewayError> {
        Ok(Self::from_database(Database::open_in_memory()?, slot))
    }

    pub fn from_database(db: Database, slot: &str) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            slot: slot.to_string(),
        }
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Runs `f` against the database on the blocking pool.
    async fn with_db<T, F>(&self, f: F) -> Result<T, GatewayError>
    where
        T: Send + 'static,
        F: FnOnce(&Database, &str) -> Result<T, GatewayError> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        let slot = self.slot.clone();
        tokio::task::spawn_blocking(move || {
            let guard = db
                .lock()
                .map_err(|e| GatewayError::Unavailable(e.to_string()))?;
            f(&*guard, slot.as_str())
        })
        .await
        .map_err(|e| GatewayError::Unavailable(format!("slot task failed: {}", e)))?
    }
}

#[async_trait]
impl PersistenceGateway for LocalSlotGateway {
    async fn try_fetch_all(&self) -> Result<Vec<Link>, GatewayError> {
        let raw = self.with_db(|db, slot| Ok(db.read_slot(slot)?)).await?;
        match raw {
            Some(raw) => {
                let links = decode_links(&raw)?;
                debug!(slot = %self.slot, count = links.len(), "read links from slot");
                Ok(links)
            }
            None => Ok(Vec::new()),
        }
    }

    async fn replace_all(&self, links: &[Link]) -> Result<(), GatewayError> {
        let encoded = encode_links(links)?;
        let count = links.len();
        self.with_db(move |db, slot| Ok(db.write_slot(slot, &encoded)?))
            .await?;
        debug!(slot = %self.slot, count, "wrote links to slot");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("local slot '{}'", self.slot)
    }
}
