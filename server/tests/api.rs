use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use item_server::{app, ErrorBody, Item, ItemStore, Message};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn delete(uri: &str) -> Request<String> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(String::new())
        .unwrap()
}

async fn fresh_app() -> (Router, ItemStore) {
    let store = ItemStore::in_memory().await.unwrap();
    (app(store.clone()), store)
}

// --- list ---

#[tokio::test]
async fn list_items_empty() {
    let (app, _) = fresh_app().await;
    let resp = app.oneshot(get("/items")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let items: Vec<Item> = body_json(resp).await;
    assert!(items.is_empty());
}

#[tokio::test]
async fn list_items_filters_by_name() {
    let (app, store) = fresh_app().await;
    let widget = store.insert("Blue Widget", "a").await.unwrap();
    store.insert("Gadget", "b").await.unwrap();

    let resp = app.oneshot(get("/items?name=WIDGET")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let items: Vec<Item> = body_json(resp).await;
    assert_eq!(items, vec![widget]);
}

#[tokio::test]
async fn list_items_decodes_query_string() {
    let (app, store) = fresh_app().await;
    let item = store.insert("Blue Widget", "a").await.unwrap();

    let resp = app.oneshot(get("/items?name=blue%20wid")).await.unwrap();

    let items: Vec<Item> = body_json(resp).await;
    assert_eq!(items, vec![item]);
}

#[tokio::test]
async fn list_items_empty_filter_returns_all() {
    let (app, store) = fresh_app().await;
    store.insert("a", "1").await.unwrap();
    store.insert("b", "2").await.unwrap();

    let resp = app.oneshot(get("/items?name=")).await.unwrap();

    let items: Vec<Item> = body_json(resp).await;
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn list_items_no_match_is_empty_array() {
    let (app, store) = fresh_app().await;
    store.insert("a", "1").await.unwrap();

    let resp = app.oneshot(get("/items?name=zzz")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let items: Vec<Item> = body_json(resp).await;
    assert!(items.is_empty());
}

#[tokio::test]
async fn list_items_filter_folds_non_ascii_case() {
    let (app, store) = fresh_app().await;
    let eclair = store.insert("Éclair", "pastry").await.unwrap();
    store.insert("Gadget", "b").await.unwrap();

    // "éCLAIR", percent-encoded as UTF-8
    let resp = app.oneshot(get("/items?name=%C3%A9CLAIR")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let items: Vec<Item> = body_json(resp).await;
    assert_eq!(items, vec![eclair]);
}

// --- create ---

#[tokio::test]
async fn create_item_returns_201() {
    let (app, _) = fresh_app().await;
    let resp = app
        .oneshot(json_request(
            "POST",
            "/items",
            r#"{"name":"Widget","description":"A small part"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let item: Item = body_json(resp).await;
    assert_eq!(item.id, 1);
    assert_eq!(item.name, "Widget");
    assert_eq!(item.description, "A small part");
}

#[tokio::test]
async fn create_item_missing_field_returns_400() {
    let (app, store) = fresh_app().await;
    let resp = app
        .oneshot(json_request("POST", "/items", r#"{"name":"Widget"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.error, "All fields are required");
    assert!(store.list(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn create_item_empty_name_returns_400() {
    let (app, store) = fresh_app().await;
    let resp = app
        .oneshot(json_request(
            "POST",
            "/items",
            r#"{"name":"","description":"A small part"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(store.list(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn create_item_whitespace_fields_are_stored() {
    let (app, store) = fresh_app().await;
    let resp = app
        .oneshot(json_request("POST", "/items", r#"{"name":" ","description":"x"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let item: Item = body_json(resp).await;
    assert_eq!(item.name, " ");
    assert_eq!(store.list(None).await.unwrap(), vec![item]);
}

#[tokio::test]
async fn create_item_non_ascii_round_trips() {
    let (app, _) = fresh_app().await;
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/items",
            r#"{"name":"ÄPFEL Straße","description":"日本語の説明 ✓"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Item = body_json(resp).await;
    assert_eq!(created.name, "ÄPFEL Straße");

    let resp = app.oneshot(get("/items?name=%C3%A4pfel")).await.unwrap();
    let items: Vec<Item> = body_json(resp).await;
    assert_eq!(items, vec![created]);
    assert_eq!(items[0].description, "日本語の説明 ✓");
}

#[tokio::test]
async fn create_item_malformed_json_returns_400() {
    let (app, store) = fresh_app().await;
    let resp = app
        .oneshot(json_request("POST", "/items", "{not json"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = body_json(resp).await;
    assert!(!body.error.is_empty());
    assert!(store.list(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn create_item_without_content_type_returns_400() {
    let (app, _) = fresh_app().await;
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/items")
                .body(r#"{"name":"a","description":"b"}"#.to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- update ---

#[tokio::test]
async fn update_item_replaces_fields() {
    let (app, store) = fresh_app().await;
    let item = store.insert("Widget", "A small part").await.unwrap();
    let other = store.insert("Gadget", "Untouched").await.unwrap();

    let resp = app
        .oneshot(json_request(
            "PUT",
            &format!("/items/{}", item.id),
            r#"{"name":"Widget2","description":"Updated"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let message: Message = body_json(resp).await;
    assert_eq!(message.message, "Item updated successfully");

    let items = store.list(None).await.unwrap();
    assert_eq!(items[0].name, "Widget2");
    assert_eq!(items[0].description, "Updated");
    assert_eq!(items[1], other);
}

#[tokio::test]
async fn update_item_not_found_still_returns_200() {
    let (app, store) = fresh_app().await;
    let resp = app
        .oneshot(json_request(
            "PUT",
            "/items/999",
            r#"{"name":"Nope","description":"Nothing"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(store.list(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_item_blank_description_returns_400() {
    let (app, store) = fresh_app().await;
    let item = store.insert("Widget", "A small part").await.unwrap();

    let resp = app
        .oneshot(json_request(
            "PUT",
            &format!("/items/{}", item.id),
            r#"{"name":"Widget2","description":""}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.list(None).await.unwrap(), vec![item]);
}

#[tokio::test]
async fn update_item_bad_id_returns_400() {
    let (app, _) = fresh_app().await;
    let resp = app
        .oneshot(json_request(
            "PUT",
            "/items/not-a-number",
            r#"{"name":"a","description":"b"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- delete ---

#[tokio::test]
async fn delete_item_not_found_still_returns_200() {
    let (app, _) = fresh_app().await;
    let resp = app.oneshot(delete("/items/999")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let message: Message = body_json(resp).await;
    assert_eq!(message.message, "Item deleted successfully");
}

// --- store failures ---

#[tokio::test]
async fn store_failure_returns_generic_500() {
    let (app, store) = fresh_app().await;
    store.close().await;

    for request in [
        get("/items"),
        json_request("POST", "/items", r#"{"name":"a","description":"b"}"#),
        json_request("PUT", "/items/1", r#"{"name":"a","description":"b"}"#),
        delete("/items/1"),
    ] {
        let resp = app.clone().oneshot(request).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorBody = body_json(resp).await;
        assert_eq!(body.error, "Internal server error");
    }
}

#[tokio::test]
async fn validation_runs_before_store() {
    let (app, store) = fresh_app().await;
    store.close().await;

    let resp = app
        .oneshot(json_request("POST", "/items", r#"{"name":"a"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- browser page ---

#[tokio::test]
async fn index_page_is_served() {
    let (app, _) = fresh_app().await;
    let resp = app.oneshot(get("/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers()[http::header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    let body = body_bytes(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("/app.js"));
}

#[tokio::test]
async fn script_is_served_as_javascript() {
    let (app, _) = fresh_app().await;
    let resp = app.oneshot(get("/app.js")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers()[http::header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/javascript"));
    assert!(!body_bytes(resp).await.is_empty());
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let (app, _) = fresh_app().await;
    let mut app = app.into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/items",
            r#"{"name":"Widget","description":"A small part"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: serde_json::Value = body_json(resp).await;
    assert_eq!(
        created,
        serde_json::json!({"id": 1, "name": "Widget", "description": "A small part"})
    );

    // list — should contain the one item
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/items"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let items: Vec<Item> = body_json(resp).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, 1);

    // update
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            "/items/1",
            r#"{"name":"Widget2","description":"Updated"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // list — name changed
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/items"))
        .await
        .unwrap();
    let items: Vec<Item> = body_json(resp).await;
    assert_eq!(items[0].name, "Widget2");
    assert_eq!(items[0].description, "Updated");

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(delete("/items/1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // delete again — still a no-op success
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(delete("/items/1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // list after delete — empty
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/items"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_bytes(resp).await;
    assert_eq!(&body[..], b"[]");
}
