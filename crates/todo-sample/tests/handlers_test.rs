use std::sync::Arc;

use resource_store::mock::MockProvider;
use resource_store::{ResourceStore, StorageConfig, StorageError};
use serde_json::{json, Value};
use todo_sample::handlers::{
    create_resource, delete_resource, dispatch, get_resource, list_resources, tool_descriptors,
    update_resource, CreateInput, ListInput, ResourceRef, ToolResult, UpdateInput,
};

fn payload(result: &ToolResult) -> Value {
    assert!(!result.is_error, "unexpected error: {}", result.text());
    serde_json::from_str(&result.text()).unwrap()
}

fn create_input(value: Value) -> CreateInput {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn test_crud_round_trip() {
    let store = ResourceStore::new(StorageConfig::memory());

    let created = create_resource(
        &store,
        create_input(json!({
            "type": "task",
            "id": "1",
            "properties": { "title": "Write docs" },
            "links": { "self": { "href": "/tasks/1" } }
        })),
    )
    .await;
    assert_eq!(payload(&created)["properties"]["title"], json!("Write docs"));

    let fetched = get_resource(&store, ResourceRef { kind: "task".into(), id: "1".into() }).await;
    assert_eq!(payload(&fetched)["_links"]["self"]["href"], json!("/tasks/1"));

    let update: UpdateInput = serde_json::from_value(json!({
        "type": "task",
        "id": "1",
        "properties": { "done": true },
        "links": { "self": { "href": "/tasks/1" }, "archive": { "href": "/tasks/1/archive", "method": "POST" } },
        "state": "done"
    }))
    .unwrap();
    let updated = payload(&update_resource(&store, update).await);
    assert_eq!(updated["properties"]["title"], json!("Write docs"));
    assert_eq!(updated["properties"]["done"], json!(true));
    assert_eq!(updated["_links"]["archive"]["method"], json!("POST"));
    assert_eq!(updated["state"], json!("done"));

    let listed = list_resources(&store, ListInput { kind: "task".into() }).await;
    assert_eq!(payload(&listed).as_array().unwrap().len(), 1);

    let deleted = delete_resource(&store, ResourceRef { kind: "task".into(), id: "1".into() }).await;
    assert_eq!(payload(&deleted), json!({ "deleted": "task:1" }));
}

#[tokio::test]
async fn test_not_found_and_duplicates_are_errors() {
    let store = ResourceStore::new(StorageConfig::memory());
    let missing = || ResourceRef { kind: "task".into(), id: "404".into() };

    let result = get_resource(&store, missing()).await;
    assert!(result.is_error);
    assert!(result.text().contains("task:404"));
    assert!(delete_resource(&store, missing()).await.is_error);

    let update: UpdateInput =
        serde_json::from_value(json!({ "type": "task", "id": "404", "state": "done" })).unwrap();
    assert!(update_resource(&store, update).await.is_error);
    // The failed update did not create anything.
    assert!(store.get_resource("task", "404").await.unwrap().is_none());

    let input = json!({ "type": "task", "id": "1" });
    assert!(!create_resource(&store, create_input(input.clone())).await.is_error);
    let duplicate = create_resource(&store, create_input(input)).await;
    assert!(duplicate.is_error);
    assert!(duplicate.text().contains("already exists"));
}

#[tokio::test]
async fn test_validation_happens_before_storage() {
    // Any storage call on this mock would fail the test with an unexpected-call error.
    let mock = Arc::new(MockProvider::new());
    let store = ResourceStore::new(StorageConfig::custom(mock.clone()));

    let bad_href = create_input(json!({
        "type": "task",
        "id": "1",
        "links": { "self": { "href": "not a url" } }
    }));
    let result = create_resource(&store, bad_href).await;
    assert!(result.is_error);
    assert!(result.text().contains("invalid href"));

    let empty_kind = list_resources(&store, ListInput { kind: "".into() }).await;
    assert!(empty_kind.is_error);

    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_type_with_separator_cannot_alias_other_types() {
    let store = ResourceStore::new(StorageConfig::memory());

    let created = dispatch(&store, "create_resource", json!({ "type": "item", "id": "1" })).await;
    assert!(!created.is_error);
    let aliased = dispatch(&store, "create_resource", json!({ "type": "item:sub", "id": "1" })).await;
    assert!(aliased.is_error);
    assert!(aliased.text().contains("must not contain ':'"));

    // An id containing the separator is stored under its own type.
    let nested = dispatch(&store, "create_resource", json!({ "type": "doc", "id": "a:b" })).await;
    assert!(!nested.is_error);

    let items = dispatch(&store, "list_resources", json!({ "type": "item" })).await;
    assert_eq!(payload(&items).as_array().unwrap().len(), 1);
    assert!(dispatch(&store, "list_resources", json!({ "type": "doc:a" })).await.is_error);
}

#[tokio::test]
async fn test_storage_errors_become_error_results() {
    let mock = Arc::new(MockProvider::new());
    mock.expect_list("task:")
        .return_err(StorageError::Backend("disk unavailable".into()));
    let store = ResourceStore::new(StorageConfig::custom(mock.clone()));

    let result = list_resources(&store, ListInput { kind: "task".into() }).await;
    assert!(result.is_error);
    assert!(result.text().contains("disk unavailable"));
    mock.verify();
}

#[tokio::test]
async fn test_dispatch_routes_by_name() {
    let store = ResourceStore::new(StorageConfig::memory());

    let created = dispatch(
        &store,
        "create_resource",
        json!({ "type": "note", "id": "n1", "properties": { "text": "hi" } }),
    )
    .await;
    assert_eq!(payload(&created)["id"], json!("n1"));

    let fetched = dispatch(&store, "get_resource", json!({ "type": "note", "id": "n1" })).await;
    assert_eq!(payload(&fetched)["properties"]["text"], json!("hi"));

    let unknown = dispatch(&store, "drop_table", json!({})).await;
    assert!(unknown.is_error);
    assert!(unknown.text().contains("Unknown tool"));

    let malformed = dispatch(&store, "get_resource", json!({ "type": "note" })).await;
    assert!(malformed.is_error);
    assert!(malformed.text().contains("Invalid arguments"));
}

#[test]
fn test_result_wire_shape() {
    let ok = serde_json::to_value(ToolResult::success("done")).unwrap();
    assert_eq!(ok, json!({ "content": [ { "type": "text", "text": "done" } ] }));

    let err = serde_json::to_value(ToolResult::error("boom")).unwrap();
    assert_eq!(err["isError"], json!(true));

    let names: Vec<_> = tool_descriptors().into_iter().map(|d| d.name).collect();
    assert!(names.contains(&"update_resource"));
    assert!(names.contains(&"transition_todo"));
}
