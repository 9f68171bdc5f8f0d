//! SQLite quote store integration tests.

mod common;

use quotecache::adapters::medium::MemoryMedium;
use quotecache::{BackingStore, Namespace, Quote, ReadThroughCache, StoreError};

use common::setup_quote_store;

#[tokio::test]
async fn test_add_get_and_list() {
    let (pool, store) = setup_quote_store().await;

    store
        .add(&Quote::new("2", "Second.").with_author("B"))
        .await
        .unwrap();
    store.add(&Quote::new("1", "First.")).await.unwrap();

    let fetched = store.get("2").await.unwrap().unwrap();
    assert_eq!(fetched.text, "Second.");
    assert_eq!(fetched.author.as_deref(), Some("B"));
    assert!(store.get("3").await.unwrap().is_none());

    let ids: Vec<_> = store.list().await.unwrap().into_iter().map(|q| q.id).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&"1".to_string()) && ids.contains(&"2".to_string()));

    pool.close().await;
}

#[tokio::test]
async fn test_duplicate_id_rejected() {
    let (pool, store) = setup_quote_store().await;

    store.add(&Quote::new("1", "Original.")).await.unwrap();
    let err = store.add(&Quote::new("1", "Impostor.")).await.unwrap_err();

    assert!(matches!(err, StoreError::Duplicate(ref id) if id == "1"));
    assert_eq!(store.lookup("1").await.unwrap(), "Original.");

    pool.close().await;
}

#[tokio::test]
async fn test_lookup_missing_is_not_found() {
    let (pool, store) = setup_quote_store().await;

    assert!(matches!(store.lookup("nope").await, Err(StoreError::NotFound(_))));

    pool.close().await;
}

#[tokio::test]
async fn test_cache_keeps_first_value_after_store_changes() {
    let (pool, store) = setup_quote_store().await;
    store.add(&Quote::new("1", "Before.")).await.unwrap();

    let cache = ReadThroughCache::new(Namespace::new("quote").unwrap(), MemoryMedium::new());
    assert_eq!(cache.fetch("1", &store).await.unwrap().value, "Before.");

    sqlx::query("UPDATE quotes SET text = 'After.' WHERE id = '1'")
        .execute(&pool)
        .await
        .unwrap();

    let fetched = cache.fetch("1", &store).await.unwrap();
    assert!(fetched.is_cached());
    assert_eq!(fetched.value, "Before.");

    pool.close().await;
}
