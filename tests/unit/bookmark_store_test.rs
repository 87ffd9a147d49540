//! Unit tests for the BookmarkStore public API.
//!
//! The store is driven through `BookmarkStoreTrait` against an in-memory
//! gateway, plus a gated gateway that holds writes until released.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Semaphore;

use pocketlinks::gateway::{MemoryGateway, PersistenceGateway};
use pocketlinks::managers::bookmark_store::{BookmarkStore, BookmarkStoreTrait, StoreEvent};
use pocketlinks::types::errors::{GatewayError, StoreError};
use pocketlinks::types::link::Link;

/// Helper: a loaded store over a fresh in-memory gateway.
async fn setup() -> (BookmarkStore, UnboundedReceiver<StoreEvent>, Arc<MemoryGateway>) {
    let gateway = Arc::new(MemoryGateway::new());
    let (mut store, events) = BookmarkStore::new(gateway.clone()).expect("store should build");
    store.load().await;
    (store, events, gateway)
}

/// Collects every event currently queued.
fn drain(events: &mut UnboundedReceiver<StoreEvent>) -> Vec<StoreEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

#[tokio::test]
async fn test_new_store_is_loading_until_load_completes() {
    let gateway = Arc::new(MemoryGateway::new());
    let (mut store, _events) = BookmarkStore::new(gateway).unwrap();
    assert!(store.is_loading());
    assert!(store.links().is_empty());

    store.load().await;
    assert!(!store.is_loading());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_load_replaces_collection_with_stored_links() {
    let stored = vec![Link::new("https://a.io", "A", ""), Link::new("https://b.io", "B", "")];
    let gateway = Arc::new(MemoryGateway::with_links(&stored).unwrap());
    let (mut store, mut events) = BookmarkStore::new(gateway).unwrap();

    store.load().await;
    assert_eq!(store.links(), stored.as_slice());
    assert!(drain(&mut events).is_empty(), "a successful load emits nothing");
}

#[tokio::test]
async fn test_load_failure_leaves_empty_collection_and_reports() {
    let gateway = Arc::new(MemoryGateway::with_links(&[Link::new("a.io", "", "")]).unwrap());
    gateway.set_fail_reads(true);
    let (mut store, mut events) = BookmarkStore::new(gateway).unwrap();
    assert!(store.is_loading());

    store.load().await;

    assert!(!store.is_loading());
    assert!(store.is_empty());
    let events = drain(&mut events);
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], StoreEvent::LoadFailed { .. }));
}

#[tokio::test]
async fn test_load_of_corrupt_data_reports_failure() {
    let gateway = Arc::new(MemoryGateway::with_raw("not json"));
    let (mut store, mut events) = BookmarkStore::new(gateway).unwrap();
    store.load().await;
    assert!(store.is_empty());
    assert!(matches!(drain(&mut events).as_slice(), [StoreEvent::LoadFailed { .. }]));
}

#[tokio::test]
async fn test_add_update_remove_scenario() {
    let (mut store, _events, gateway) = setup().await;

    let added = store.add_link("example.com", "Ex", "desc").unwrap();
    assert_eq!(store.len(), 1);
    let link = &store.links()[0];
    assert_eq!(link.url, "http://example.com");
    assert_eq!(link.title, "Ex");
    assert_eq!(link.description, "desc");

    let updated = store
        .update_link(&added.id, "https://example.com", "Ex2", "")
        .unwrap();
    assert!(updated);
    let link = store.link(&added.id).unwrap();
    assert_eq!(link.url, "https://example.com");
    assert_eq!(link.title, "Ex2");
    assert_eq!(link.description, "");
    assert_eq!(link.created_at, added.created_at);

    assert!(store.delete_link(&added.id));
    assert!(store.is_empty());

    store.flush().await;
    assert!(gateway.try_fetch_all().await.unwrap().is_empty());
    assert_eq!(gateway.write_count(), 3);
}

#[tokio::test]
async fn test_add_prepends_newest_first() {
    let (mut store, _events, _gateway) = setup().await;
    let first = store.add_link("one.io", "", "").unwrap();
    let second = store.add_link("two.io", "", "").unwrap();
    let third = store.add_link("three.io", "", "").unwrap();

    let ids: Vec<&str> = store.links().iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec![third.id.as_str(), second.id.as_str(), first.id.as_str()]);
}

#[tokio::test]
async fn test_add_keeps_existing_scheme() {
    let (mut store, _events, _gateway) = setup().await;
    assert_eq!(store.add_link("https://a.io", "", "").unwrap().url, "https://a.io");
    assert_eq!(store.add_link("http://b.io", "", "").unwrap().url, "http://b.io");
    assert_eq!(store.add_link("  c.io  ", "", "").unwrap().url, "http://  c.io  ");
}

#[tokio::test]
async fn test_empty_url_is_rejected_silently() {
    let (mut store, mut events, gateway) = setup().await;

    assert_eq!(store.add_link("", "T", "D"), Err(StoreError::EmptyUrl));
    assert!(store.is_empty());

    store.flush().await;
    assert_eq!(gateway.write_count(), 0);
    assert!(drain(&mut events).is_empty());
}

#[tokio::test]
async fn test_whitespace_url_is_accepted_as_typed() {
    let (mut store, mut events, gateway) = setup().await;

    let blank = store.add_link("   ", "T", "D").unwrap();
    assert_eq!(blank.url, "http://   ");
    let padded = store.add_link(" a.io", "", "").unwrap();
    assert_eq!(padded.url, "http:// a.io");
    assert_eq!(store.len(), 2);

    store.flush().await;
    assert_eq!(gateway.write_count(), 2);
    let added = drain(&mut events)
        .into_iter()
        .filter(|e| matches!(e, StoreEvent::LinkAdded { .. }))
        .count();
    assert_eq!(added, 2);
}

#[tokio::test]
async fn test_update_with_empty_url_changes_nothing() {
    let (mut store, mut events, _gateway) = setup().await;
    let link = store.add_link("a.io", "A", "").unwrap();
    store.flush().await;
    drain(&mut events);

    assert_eq!(store.update_link(&link.id, "", "B", "x"), Err(StoreError::EmptyUrl));
    assert_eq!(store.link(&link.id), Some(&link));
    assert!(drain(&mut events).is_empty());
}

#[tokio::test]
async fn test_update_touches_only_the_matching_link() {
    let (mut store, _events, _gateway) = setup().await;
    let a = store.add_link("a.io", "A", "a").unwrap();
    let b = store.add_link("b.io", "B", "b").unwrap();
    let c = store.add_link("c.io", "C", "c").unwrap();

    assert!(store.update_link(&b.id, "bee.io", "Bee", "buzz").unwrap());

    let links = store.links();
    assert_eq!(links[0], c);
    assert_eq!(links[2], a);
    assert_eq!(links[1].id, b.id);
    assert_eq!(links[1].created_at, b.created_at);
    assert_eq!(links[1].url, "http://bee.io");
    assert_eq!(links[1].title, "Bee");
    assert_eq!(links[1].description, "buzz");
}

#[tokio::test]
async fn test_unknown_id_leaves_links_but_persists_and_notifies() {
    let (mut store, mut events, gateway) = setup().await;
    store.add_link("a.io", "A", "").unwrap();
    store.flush().await;
    let before = store.links().to_vec();
    let writes = gateway.write_count();
    drain(&mut events);

    assert_eq!(store.update_link("missing", "b.io", "B", ""), Ok(false));
    assert!(!store.delete_link("missing"));

    store.flush().await;
    assert_eq!(store.links(), before.as_slice());
    assert_eq!(gateway.write_count(), writes + 2);
    assert_eq!(gateway.try_fetch_all().await.unwrap(), before);

    let notices: Vec<StoreEvent> = drain(&mut events)
        .into_iter()
        .filter(|e| !matches!(e, StoreEvent::Persisted { .. }))
        .collect();
    assert_eq!(
        notices,
        vec![
            StoreEvent::LinkUpdated { id: "missing".to_string() },
            StoreEvent::LinkDeleted { id: "missing".to_string() },
        ]
    );
}

#[tokio::test]
async fn test_delete_keeps_relative_order_of_others() {
    let (mut store, _events, _gateway) = setup().await;
    let a = store.add_link("a.io", "", "").unwrap();
    let b = store.add_link("b.io", "", "").unwrap();
    let c = store.add_link("c.io", "", "").unwrap();

    assert!(store.delete_link(&b.id));
    assert_eq!(store.links(), [c, a].as_slice());
}

#[tokio::test]
async fn test_mutation_events_come_before_persist_results() {
    let (mut store, mut events, _gateway) = setup().await;
    let link = store.add_link("a.io", "", "").unwrap();
    store.flush().await;

    assert_eq!(
        drain(&mut events),
        vec![
            StoreEvent::LinkAdded { id: link.id.clone() },
            StoreEvent::Persisted { count: 1 },
        ]
    );
}

#[tokio::test]
async fn test_persist_failure_is_reported_without_rollback() {
    let (mut store, mut events, gateway) = setup().await;
    gateway.set_fail_writes(true);

    let link = store.add_link("a.io", "A", "").unwrap();
    store.flush().await;

    assert_eq!(store.links(), [link.clone()].as_slice());
    assert!(gateway.try_fetch_all().await.unwrap().is_empty(), "storage should be unchanged");

    let events = drain(&mut events);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0], StoreEvent::LinkAdded { id: link.id });
    assert!(matches!(&events[1], StoreEvent::PersistFailed { .. }));
    assert!(events[1].message().starts_with("Could not save links"));
}

#[tokio::test]
async fn test_persisted_snapshot_matches_memory() {
    let (mut store, _events, gateway) = setup().await;
    for i in 0..5 {
        store.add_link(&format!("site{}.io", i), "", "").unwrap();
    }
    let first = store.links()[0].id.clone();
    store.delete_link(&first);
    store.flush().await;

    assert_eq!(gateway.try_fetch_all().await.unwrap(), store.links());
}

#[tokio::test]
async fn test_dropped_receiver_does_not_break_mutations() {
    let (mut store, events, gateway) = setup().await;
    drop(events);
    store.add_link("a.io", "", "").unwrap();
    store.flush().await;
    assert_eq!(gateway.write_count(), 1);
}

/// Gateway whose writes wait for a permit, so tests can observe in-flight persists.
struct GatedGateway {
    gate: Semaphore,
    writes: AtomicUsize,
}

#[async_trait]
impl PersistenceGateway for GatedGateway {
    async fn try_fetch_all(&self) -> Result<Vec<Link>, GatewayError> {
        Ok(Vec::new())
    }

    async fn replace_all(&self, _links: &[Link]) -> Result<(), GatewayError> {
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;
        permit.forget();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "gated".to_string()
    }
}

#[tokio::test]
async fn test_mutations_do_not_wait_for_persistence() {
    let gateway = Arc::new(GatedGateway {
        gate: Semaphore::new(0),
        writes: AtomicUsize::new(0),
    });
    let (mut store, mut events) = BookmarkStore::new(gateway.clone()).unwrap();
    store.load().await;

    let a = store.add_link("a.io", "", "").unwrap();
    store.add_link("b.io", "", "").unwrap();
    store.delete_link(&a.id);

    assert_eq!(store.len(), 1);
    assert_eq!(gateway.writes.load(Ordering::SeqCst), 0);
    let success: Vec<&str> = drain(&mut events).iter().map(|e| e.kind()).collect();
    assert_eq!(success, vec!["link_added", "link_added", "link_deleted"]);

    gateway.gate.add_permits(3);
    store.flush().await;
    assert_eq!(gateway.writes.load(Ordering::SeqCst), 3);
}
