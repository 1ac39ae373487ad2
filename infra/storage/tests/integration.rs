use envstore_storage::*;
use std::collections::BTreeSet;

#[tokio::test]
async fn test_absent_key_is_not_found() {
    let storage = MockStorage::new();

    assert!(!storage.contains("missing").await.unwrap());
    assert_eq!(storage.get("missing").await.unwrap(), None);
}

#[tokio::test]
async fn test_store_get_roundtrip() {
    let storage = MockStorage::new();

    storage.store("binary", &[0, 159, 146, 150]).await.unwrap();
    storage.store_string("text", "test_value").await.unwrap();

    assert!(storage.contains("binary").await.unwrap());
    assert_eq!(storage.get("binary").await.unwrap(), Some(vec![0, 159, 146, 150]));
    assert_eq!(storage.get("text").await.unwrap(), Some(b"test_value".to_vec()));
}

#[tokio::test]
async fn test_store_overwrites() {
    let storage = MockStorage::new();

    storage.store_string("k", "first").await.unwrap();
    storage.store_string("k", "second").await.unwrap();

    assert_eq!(storage.get("k").await.unwrap(), Some(b"second".to_vec()));
    assert_eq!(storage.keys().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let storage = MockStorage::new();
    storage.store_string("k", "v").await.unwrap();

    assert!(storage.delete("k").await.unwrap());
    assert!(!storage.contains("k").await.unwrap());
    assert!(!storage.delete("k").await.unwrap());
}

#[tokio::test]
async fn test_keys_empty_store() {
    let storage = MockStorage::new();
    assert!(storage.keys().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_keys_strip_structural_prefix() {
    let storage = MockStorage::new();
    let policy = KeyPolicy::default();
    let env_key = policy.environment_key("environment_location");

    for key in ["test_key1", "test_key2", "test_key3", env_key.as_str()] {
        storage.store_string(key, "value").await.unwrap();
    }

    let keys: BTreeSet<String> = storage.keys().await.unwrap().into_iter().collect();
    let expected: BTreeSet<String> =
        ["test_key1", "test_key2", "test_key3", "ekara_environment_location"]
            .into_iter()
            .map(str::to_owned)
            .collect();
    assert_eq!(keys, expected);
    assert!(keys.iter().all(|k| !k.starts_with(STORAGE_PREFIX)));
}

#[tokio::test]
async fn test_clean_removes_only_matching_prefix() {
    let storage = MockStorage::new();
    for key in ["ekara_a", "ekara_b", "other"] {
        storage.store_string(key, "v").await.unwrap();
    }

    storage.clean(EKARA_PREFIX).await.unwrap();
    assert_eq!(storage.keys().await.unwrap(), vec!["other".to_owned()]);

    storage.clean(EKARA_PREFIX).await.unwrap();
    assert_eq!(storage.keys().await.unwrap(), vec!["other".to_owned()]);

    storage.clean("").await.unwrap();
    storage.clean("").await.unwrap();
    assert!(storage.keys().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_custom_policy_isolates_namespaces() {
    let shared = MockStorage::new();
    shared.store_string("k", "default").await.unwrap();

    let other = MockStorage::with_policy(KeyPolicy::new("tenant_", "env_").unwrap());
    other.store_string("k", "tenant").await.unwrap();

    assert_eq!(other.policy().structural(), "tenant_");
    assert_eq!(shared.get("k").await.unwrap(), Some(b"default".to_vec()));
    assert_eq!(other.get("k").await.unwrap(), Some(b"tenant".to_vec()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writers() {
    let storage: SharedStorage = std::sync::Arc::new(MockStorage::new());

    let tasks: Vec<_> = (0..64)
        .map(|i| {
            let storage = storage.clone();
            tokio::spawn(async move {
                storage.store_string(&format!("key_{i}"), &i.to_string()).await.unwrap();
                storage.store_string("shared", &i.to_string()).await.unwrap();
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    let keys = storage.keys().await.unwrap();
    assert_eq!(keys.len(), 65);

    let last = storage.get("shared").await.unwrap().unwrap();
    let last: u32 = String::from_utf8(last).unwrap().parse().unwrap();
    assert!(last < 64);
}
