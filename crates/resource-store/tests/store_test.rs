use std::sync::Arc;

use resource_store::mock::{MockProvider, ProviderCall};
use resource_store::{
    Link, Resource, ResourceStore, StorageConfig, StorageError, StoreState,
};
use serde_json::json;

fn named(kind: &str, id: &str, name: &str) -> Resource {
    let mut resource = Resource::new(kind, id);
    resource.set_property("name", name);
    resource
}

#[tokio::test]
async fn test_create_then_get() {
    let store = ResourceStore::new(StorageConfig::memory());
    let resource = named("test", "123", "Test Resource");
    store.create_resource(&resource).await.unwrap();

    let found = store.get_resource("test", "123").await.unwrap().unwrap();
    assert_eq!(found.kind(), "test");
    assert_eq!(found.id(), "123");
    assert_eq!(found.properties(), resource.properties());
    assert_eq!(found.property("name"), Some(json!("Test Resource")));

    assert!(store.get_resource("test", "missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_is_idempotent_upsert() {
    let store = ResourceStore::new(StorageConfig::memory());
    let mut resource = named("task", "1", "Draft");
    resource.add_link("self", Link::new("/tasks/1"));

    // Update on a missing resource creates it.
    store.update_resource(&resource).await.unwrap();
    assert!(store.get_resource("task", "1").await.unwrap().is_some());

    resource.set_property("name", "Final");
    resource.set_state("done");
    store.update_resource(&resource).await.unwrap();
    let once = store.get_resource("task", "1").await.unwrap();
    store.update_resource(&resource).await.unwrap();
    let twice = store.get_resource("task", "1").await.unwrap();

    assert_eq!(once, twice);
    assert_eq!(twice.unwrap().state(), Some("done"));
    assert_eq!(store.list_resources("task").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete() {
    let store = ResourceStore::new(StorageConfig::memory());
    store.create_resource(&Resource::new("task", "1")).await.unwrap();

    assert!(store.delete_resource("task", "1").await.unwrap());
    assert!(store.get_resource("task", "1").await.unwrap().is_none());
    assert!(!store.delete_resource("task", "1").await.unwrap());
}

#[tokio::test]
async fn test_list_by_type() {
    let store = ResourceStore::new(StorageConfig::memory());
    for id in ["1", "2", "3"] {
        store.create_resource(&Resource::new("item", id)).await.unwrap();
    }
    store.create_resource(&Resource::new("other", "1")).await.unwrap();
    store.create_resource(&Resource::new("items", "9")).await.unwrap();

    let items = store.list_resources("item").await.unwrap();
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|r| r.kind() == "item"));
    assert_eq!(store.list_resources("other").await.unwrap().len(), 1);
    assert!(store.list_resources("nothing").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_embedded_survives_store() {
    let store = ResourceStore::new(StorageConfig::memory());
    let mut parent = Resource::new("parent", "p1");
    parent.add_embedded("children", Resource::new("child", "c1"));
    store.create_resource(&parent).await.unwrap();

    let found = store.get_resource("parent", "p1").await.unwrap().unwrap();
    let children = found.embedded("children").unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id(), "c1");
}

#[tokio::test]
async fn test_lifecycle_states() {
    let store = ResourceStore::new(StorageConfig::memory());
    assert_eq!(store.state().await, StoreState::Uninitialized);

    // Closing a store that never opened is a no-op.
    store.close().await.unwrap();
    assert_eq!(store.state().await, StoreState::Uninitialized);

    store.create_resource(&Resource::new("task", "1")).await.unwrap();
    assert_eq!(store.state().await, StoreState::Initialized);

    store.close().await.unwrap();
    assert_eq!(store.state().await, StoreState::Closed);
    store.close().await.unwrap();

    // Operations after close re-open the backend.
    let found = store.get_resource("task", "1").await.unwrap();
    assert!(found.is_some());
    assert_eq!(store.state().await, StoreState::Initialized);
}

#[tokio::test]
async fn test_memory_namespaces_are_per_store() {
    let left = ResourceStore::new(StorageConfig::Memory {
        namespace: Some("left".into()),
    });
    let right = ResourceStore::new(StorageConfig::memory());
    left.create_resource(&Resource::new("task", "1")).await.unwrap();

    assert!(right.get_resource("task", "1").await.unwrap().is_none());
    assert_eq!(left.list_resources("task").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_custom_provider_receives_keys() {
    let mock = Arc::new(MockProvider::new());
    mock.expect_create("task:1").return_ok(());
    mock.expect_list("task:").return_ok(vec![Resource::new("task", "1")]);
    mock.expect_delete("task:1").return_ok(false);

    let store = ResourceStore::new(StorageConfig::custom(mock.clone()));
    store.initialize().await.unwrap();
    store.create_resource(&Resource::new("task", "1")).await.unwrap();
    assert_eq!(store.list_resources("task").await.unwrap().len(), 1);
    assert!(!store.delete_resource("task", "1").await.unwrap());
    store.close().await.unwrap();

    mock.verify();
    assert_eq!(
        mock.calls(),
        vec![
            ProviderCall::Init,
            ProviderCall::Create("task:1".into()),
            ProviderCall::List("task:".into()),
            ProviderCall::Delete("task:1".into()),
            ProviderCall::Close,
        ]
    );
}

#[tokio::test]
async fn test_provider_errors_propagate() {
    let mock = Arc::new(MockProvider::new());
    mock.expect_update("task:1")
        .return_err(StorageError::Backend("write failed".into()));

    let store = ResourceStore::new(StorageConfig::custom(mock.clone()));
    let err = store.update_resource(&Resource::new("task", "1")).await.unwrap_err();
    assert!(matches!(err, StorageError::Backend(msg) if msg == "write failed"));

    // The failed call did not trigger a retry.
    assert_eq!(mock.calls(), vec![ProviderCall::Init, ProviderCall::Update("task:1".into())]);
}

#[tokio::test]
async fn test_init_failure_leaves_store_uninitialized() {
    let mock = Arc::new(MockProvider::new());
    mock.fail_init(StorageError::NotInitialized { backend: "mock" });
    mock.expect_get("task:1").return_ok(None);

    let store = ResourceStore::new(StorageConfig::custom(mock.clone()));
    let err = store.get_resource("task", "1").await.unwrap_err();
    assert!(matches!(err, StorageError::NotInitialized { .. }));
    assert_eq!(store.state().await, StoreState::Uninitialized);

    // The next call initializes again and succeeds.
    assert!(store.get_resource("task", "1").await.unwrap().is_none());
    assert_eq!(
        mock.calls(),
        vec![ProviderCall::Init, ProviderCall::Init, ProviderCall::Get("task:1".into())]
    );
}
