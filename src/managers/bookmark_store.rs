//! Bookmark Store for pocketlinks.
//!
//! Holds the in-memory link collection (newest first) and is the only place
//! it can be mutated. Every successful mutation spawns a detached task that
//! writes a full snapshot through the injected [`PersistenceGateway`]; the
//! mutation itself never waits for it. Outcomes, including persist failures,
//! are reported as [`StoreEvent`]s on the channel returned by
//! [`BookmarkStore::new`]. A failed persist is not rolled back or retried.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::gateway::PersistenceGateway;
use crate::types::errors::StoreError;
use crate::types::link::{normalize_url, Link};

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        }
    }
}

/// Notification emitted by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    LinkAdded { id: String },
    LinkUpdated { id: String },
    LinkDeleted { id: String },
    /// The initial load failed; the collection was left empty.
    LoadFailed { reason: String },
    /// A background write failed; memory and storage may now differ.
    PersistFailed { reason: String },
    /// A background write of `count` links completed.
    Persisted { count: usize },
}

impl StoreEvent {
    /// Stable machine-readable name.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreEvent::LinkAdded { .. } => "link_added",
            StoreEvent::LinkUpdated { .. } => "link_updated",
            StoreEvent::LinkDeleted { .. } => "link_deleted",
            StoreEvent::LoadFailed { .. } => "load_failed",
            StoreEvent::PersistFailed { .. } => "persist_failed",
            StoreEvent::Persisted { .. } => "persisted",
        }
    }

    pub fn level(&self) -> NoticeLevel {
        match self {
            StoreEvent::LinkAdded { .. } | StoreEvent::LinkUpdated { .. } | StoreEvent::LinkDeleted { .. } => {
                NoticeLevel::Success
            }
            StoreEvent::Persisted { .. } => NoticeLevel::Info,
            StoreEvent::LoadFailed { .. } | StoreEvent::PersistFailed { .. } => NoticeLevel::Error,
        }
    }

    /// User-facing text.
    pub fn message(&self) -> String {
        match self {
            StoreEvent::LinkAdded { .. } => "Link added".to_string(),
            StoreEvent::LinkUpdated { .. } => "Link updated".to_string(),
            StoreEvent::LinkDeleted { .. } => "Link deleted".to_string(),
            StoreEvent::LoadFailed { reason } => format!("Could not load saved links: {}", reason),
            StoreEvent::PersistFailed { reason } => format!("Could not save links: {}", reason),
            StoreEvent::Persisted { count } => format!("Saved {} links", count),
        }
    }
}

/// The consumer-facing contract: the only mutation entry points plus read access.
pub trait BookmarkStoreTrait {
    /// Adds a link at the front of the collection and returns it.
    fn add_link(&mut self, url: &str, title: &str, description: &str) -> Result<Link, StoreError>;
    /// Replaces url/title/description of the link `id`.
    ///
    /// An unknown id leaves the collection as it is but still persists and
    /// notifies; the return value tells whether a link matched.
    fn update_link(&mut self, id: &str, url: &str, title: &str, description: &str) -> Result<bool, StoreError>;
    /// Removes the link `id`. Returns `false` if no link matched; the
    /// collection is persisted and `LinkDeleted` emitted either way.
    fn delete_link(&mut self, id: &str) -> bool;
    fn links(&self) -> &[Link];
    fn is_loading(&self) -> bool;
}

/// Owned link collection with an injected persistence gateway.
pub struct BookmarkStore {
    links: Vec<Link>,
    loading: bool,
    gateway: Arc<dyn PersistenceGateway>,
    events: UnboundedSender<StoreEvent>,
    runtime: Handle,
    in_flight: Vec<JoinHandle<()>>,
}

impl BookmarkStore {
    /// Creates an empty store in the loading state.
    ///
    /// Must be called from within a tokio runtime; persist tasks are spawned
    /// on that runtime. Returns the receiving end of the notification channel.
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Result<(Self, UnboundedReceiver<StoreEvent>), StoreError> {
        let runtime = Handle::try_current().map_err(|e| StoreError::NoRuntime(e.to_string()))?;
        let (events, rx) = mpsc::unbounded_channel();
        let store = Self {
            links: Vec::new(),
            loading: true,
            gateway,
            events,
            runtime,
            in_flight: Vec::new(),
        };
        Ok((store, rx))
    }

    /// Fetches the stored collection and replaces the in-memory one with it.
    ///
    /// On failure the collection is left empty and `LoadFailed` is emitted.
    /// Either way the loading flag is cleared.
    pub async fn load(&mut self) {
        self.loading = true;
        match self.gateway.try_fetch_all().await {
            Ok(links) => {
                info!(backend = %self.gateway.describe(), count = links.len(), "loaded links");
                self.links = links;
            }
            Err(e) => {
                warn!(backend = %self.gateway.describe(), error = %e, "loading links failed");
                self.links.clear();
                self.notify(StoreEvent::LoadFailed { reason: e.to_string() });
            }
        }
        self.loading = false;
    }

    /// Looks up a single link by id.
    pub fn link(&self, id: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.id == id)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn backend(&self) -> String {
        self.gateway.describe()
    }

    /// Waits for every persist issued so far to finish.
    pub async fn flush(&mut self) {
        for handle in self.in_flight.drain(..) {
            if let Err(e) = handle.await {
                warn!(error = %e, "persist task did not complete");
            }
        }
    }

    fn notify(&self, event: StoreEvent) {
        // A dropped receiver just means nobody is listening.
        let _ = self.events.send(event);
    }

    /// Spawns a detached write of the current collection.
    fn persist(&mut self) {
        let snapshot = self.links.clone();
        let gateway = Arc::clone(&self.gateway);
        let events = self.events.clone();

        self.in_flight.retain(|h| !h.is_finished());
        let handle = self.runtime.spawn(async move {
            match gateway.replace_all(&snapshot).await {
                Ok(()) => {
                    debug!(backend = %gateway.describe(), count = snapshot.len(), "persisted links");
                    let _ = events.send(StoreEvent::Persisted { count: snapshot.len() });
                }
                Err(e) => {
                    error!(backend = %gateway.describe(), error = %e, "persisting links failed");
                    let _ = events.send(StoreEvent::PersistFailed { reason: e.to_string() });
                }
            }
        });
        self.in_flight.push(handle);
    }
}

/// Rejects an empty url. Anything else is accepted as typed.
fn checked_url(url: &str) -> Result<&str, StoreError> {
    if url.is_empty() {
        return Err(StoreError::EmptyUrl);
    }
    Ok(url)
}

impl BookmarkStoreTrait for BookmarkStore {
    fn add_link(&mut self, url: &str, title: &str, description: &str) -> Result<Link, StoreError> {
        let url = checked_url(url)?;
        let link = Link::new(url, title, description);
        self.links.insert(0, link.clone());
        debug!(id = %link.id, url = %link.url, "added link");

        self.notify(StoreEvent::LinkAdded { id: link.id.clone() });
        self.persist();
        Ok(link)
    }

    fn update_link(&mut self, id: &str, url: &str, title: &str, description: &str) -> Result<bool, StoreError> {
        let url = checked_url(url)?;
        let found = match self.links.iter_mut().find(|l| l.id == id) {
            Some(link) => {
                link.url = normalize_url(url);
                link.title = title.to_string();
                link.description = description.to_string();
                debug!(id, "updated link");
                true
            }
            None => {
                debug!(id, "update matched no link");
                false
            }
        };

        self.notify(StoreEvent::LinkUpdated { id: id.to_string() });
        self.persist();
        Ok(found)
    }

    fn delete_link(&mut self, id: &str) -> bool {
        let before = self.links.len();
        self.links.retain(|l| l.id != id);
        let found = self.links.len() != before;
        if found {
            debug!(id, "deleted link");
        } else {
            debug!(id, "delete matched no link");
        }

        self.notify(StoreEvent::LinkDeleted { id: id.to_string() });
        self.persist();
        found
    }

    fn links(&self) -> &[Link] {
        &self.links
    }

    fn is_loading(&self) -> bool {
        self.loading
    }
}
