//! App core for pocketlinks.
//!
//! Wires configuration, the selected persistence gateway and the bookmark
//! store together, and runs the startup/shutdown sequence.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

use crate::config::{AppConfig, Backend};
use crate::gateway::{LocalSlotGateway, MemoryGateway, PersistenceGateway, RemoteGateway};
use crate::managers::bookmark_store::{BookmarkStore, StoreEvent};
use crate::types::errors::GatewayError;

/// Builds the gateway named by `config.backend`.
pub fn build_gateway(config: &AppConfig) -> Result<Arc<dyn PersistenceGateway>, GatewayError> {
    let gateway: Arc<dyn PersistenceGateway> = match config.backend {
        Backend::Local => Arc::new(LocalSlotGateway::open(config.db_path(), &config.slot)?),
        Backend::Remote => Arc::new(RemoteGateway::new(
            &config.endpoint,
            config.request_timeout(),
            config.connect_timeout(),
        )?),
        Backend::Memory => Arc::new(MemoryGateway::new()),
    };
    Ok(gateway)
}

pub struct App {
    pub config: AppConfig,
    pub store: BookmarkStore,
}

impl App {
    /// Creates the app with the gateway selected by `config`.
    ///
    /// Must run inside a tokio runtime. Returns the store's notification channel.
    pub fn new(
        config: AppConfig,
    ) -> Result<(Self, UnboundedReceiver<StoreEvent>), Box<dyn std::error::Error + Send + Sync>> {
        let gateway = build_gateway(&config)?;
        Self::with_gateway(config, gateway)
    }

    /// Creates the app around an already built gateway.
    pub fn with_gateway(
        config: AppConfig,
        gateway: Arc<dyn PersistenceGateway>,
    ) -> Result<(Self, UnboundedReceiver<StoreEvent>), Box<dyn std::error::Error + Send + Sync>> {
        let (store, events) = BookmarkStore::new(gateway)?;
        Ok((Self { config, store }, events))
    }

    /// Startup sequence: load the stored collection.
    pub async fn startup(&mut self) {
        info!(backend = %self.store.backend(), "starting pocketlinks");
        self.store.load().await;
    }

    /// Shutdown sequence: wait for outstanding writes.
    pub async fn shutdown(&mut self) {
        self.store.flush().await;
        info!("pocketlinks stopped");
    }
}
