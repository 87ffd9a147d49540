//! In-memory gateway.
//!
//! Keeps the serialized collection in a `Mutex<Option<String>>`, so reads
//! and writes go through the same JSON encoding as the durable backends.
//! Reads and writes can be switched to fail, which is how tests exercise
//! the store's error paths.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{decode_links, encode_links, PersistenceGateway};
use crate::types::errors::GatewayError;
use crate::types::link::Link;

#[derive(Default)]
pub struct MemoryGateway {
    blob: Mutex<Option<String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `links` already stored.
    pub fn with_links(links: &[Link]) -> Result<Self, GatewayError> {
        let gateway = Self::new();
        *gateway.lock_blob()? = Some(encode_links(links)?);
        Ok(gateway)
    }

    /// Starts with an arbitrary raw payload, e.g. a corrupt one.
    pub fn with_raw(raw: &str) -> Self {
        let gateway = Self::new();
        if let Ok(mut blob) = gateway.blob.lock() {
            *blob = Some(raw.to_string());
        }
        gateway
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `replace_all` calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// The raw stored payload, if anything was written.
    pub fn raw(&self) -> Option<String> {
        self.blob.lock().ok().and_then(|blob| blob.clone())
    }

    fn lock_blob(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>, GatewayError> {
        self.blob
            .lock()
            .map_err(|e| GatewayError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn try_fetch_all(&self) -> Result<Vec<Link>, GatewayError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("reads disabled".to_string()));
        }
        let raw = self.lock_blob()?.clone();
        match raw {
            Some(raw) => decode_links(&raw),
            None => Ok(Vec::new()),
        }
    }

    async fn replace_all(&self, links: &[Link]) -> Result<(), GatewayError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("writes disabled".to_string()));
        }
        let encoded = encode_links(links)?;
        *self.lock_blob()? = Some(encoded);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
