//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: resource call → JSON:API request → HTTP →
//! error classification / flattened records

use dato_client::{AllOptions, Client, ClientConfig, Error, Method, ResourceInput, ResourceKind};
use futures::{StreamExt, TryStreamExt};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn client(mock_server: &MockServer) -> Client {
    init_tracing();
    let config = ClientConfig::new("test-token")
        .with_base_url(mock_server.uri())
        .with_header("X-Environment", "sandbox")
        .with_page_size(2)
        .with_ca_bundle("/nonexistent/ca.pem");
    Client::new(config).unwrap()
}

// ============================================================================
// Resource Operations
// ============================================================================

#[tokio::test]
async fn test_create_item_sends_document_and_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/items"))
        .and(header("Authorization", "Bearer test-token"))
        .and(header("X-Environment", "sandbox"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"data": {
            "type": "item",
            "attributes": {"title": "Hello"},
            "relationships": {"item_type": {"data": {"type": "item_type", "id": "44"}}}
        }})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {
                "type": "item", "id": "1", "attributes": {"title": "Hello"},
                "relationships": {"item_type": {"data": {"type": "item_type", "id": "44"}}}
            },
            "included": [{"type": "item_type", "id": "44", "attributes": {"api_key": "post"}}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let record = client
        .items()
        .create(&ResourceInput::new().with("title", "Hello").with("item_type", "44"))
        .await
        .unwrap();

    assert_eq!(record["id"], json!("1"));
    assert_eq!(record["title"], json!("Hello"));
    assert_eq!(record["item_type"], json!({"id": "44", "api_key": "post"}));
}

#[tokio::test]
async fn test_find_user() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"type": "user", "id": "12", "attributes": {"email": "a@b.c"},
                     "relationships": {"role": {"data": {"type": "role", "id": "3"}}}}
        })))
        .mount(&mock_server)
        .await;

    let record = client(&mock_server).users().find("12").await.unwrap();
    assert_eq!(record["email"], json!("a@b.c"));
    assert_eq!(record["role"], json!({"type": "role", "id": "3"}));
}

#[tokio::test]
async fn test_all_pages_walks_offsets_with_filters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/uploads"))
        .and(query_param("page[offset]", "0"))
        .and(query_param("page[limit]", "2"))
        .and(query_param("filter[type]", "image"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"type": "upload", "id": "1"}, {"type": "upload", "id": "2"}],
            "meta": {"total_count": 3}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/uploads"))
        .and(query_param("page[offset]", "2"))
        .and(query_param("filter[type]", "image"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"type": "upload", "id": "3"}],
            "meta": {"total_count": 3}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let filters = json!({"filter": {"type": "image"}});

    let records = client
        .uploads()
        .all(Some(&filters), AllOptions::default().all_pages())
        .await
        .unwrap()
        .into_records()
        .unwrap();
    let ids: Vec<_> = records.iter().map(|r| r["id"].clone()).collect();
    assert_eq!(ids, vec![json!("1"), json!("2"), json!("3")]);

    let document = client
        .uploads()
        .all(Some(&filters), AllOptions::default().all_pages().raw())
        .await
        .unwrap()
        .into_document()
        .unwrap();
    assert_eq!(document["data"].as_array().unwrap().len(), 3);
    assert_eq!(document["meta"], json!({"total_count": 3}));
}

#[tokio::test]
async fn test_all_single_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/roles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"type": "role", "id": "1", "attributes": {"name": "Admin"}}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let records = client(&mock_server)
        .roles()
        .all(None, AllOptions::default())
        .await
        .unwrap()
        .into_records()
        .unwrap();
    assert_eq!(records, vec![json!({"id": "1", "name": "Admin"}).as_object().unwrap().clone()]);
}

#[tokio::test]
async fn test_stream_all_is_lazy() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/menu-items"))
        .and(query_param("page[offset]", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"type": "menu_item", "id": "1"}, {"type": "menu_item", "id": "2"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let first_two: Vec<_> = client
        .menu_items()
        .stream_all(None)
        .unwrap()
        .take(2)
        .try_collect()
        .await
        .unwrap();
    assert_eq!(first_two.len(), 2);
}

#[tokio::test]
async fn test_update_upload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/uploads/9"))
        .and(body_json(json!({"data": {
            "type": "upload", "id": "9", "attributes": {"alt": "A cat", "title": "Cat"}
        }})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"type": "upload", "id": "9", "attributes": {"alt": "A cat", "title": "Cat"}}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let record = client(&mock_server)
        .uploads()
        .update(
            "9",
            &ResourceInput::new()
                .with("alt", "A cat")
                .with("title", "Cat")
                .with("path", "/ignored.png"),
        )
        .await
        .unwrap();
    assert_eq!(record["alt"], json!("A cat"));
}

#[tokio::test]
async fn test_destroy_access_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/access-tokens/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"type": "access_token", "id": "5", "attributes": {"name": "CI"}}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let deleted = client(&mock_server)
        .access_tokens()
        .destroy("5")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(deleted["name"], json!("CI"));
}

#[tokio::test]
async fn test_site_fetch_and_update() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/site"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"type": "site", "id": "1", "attributes": {"name": "Blog"}}
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/site"))
        .and(body_partial_json(json!({"data": {"attributes": {"no_index": true}}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"type": "site", "id": "1", "attributes": {"name": "Blog", "no_index": true}}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    assert_eq!(client.site().fetch().await.unwrap()["name"], json!("Blog"));

    let updated = client
        .site()
        .update_singleton(&ResourceInput::new().with("no_index", true))
        .await
        .unwrap();
    assert_eq!(updated["no_index"], json!(true));
}

// ============================================================================
// Error Handling
// ============================================================================

#[tokio::test]
async fn test_validation_error_exposes_field_codes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "errors": [{
                "id": "abc",
                "type": "api_error",
                "attributes": {"code": "INVALID_FIELD"},
                "source": {"pointer": "/data/attributes/email"},
                "code": "INVALID_FORMAT"
            }]
        })))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .users()
        .create(
            &ResourceInput::new()
                .with("email", "nope")
                .with("first_name", "A")
                .with("last_name", "B")
                .with("role", "3"),
        )
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(err.status(), Some(422));
    assert_eq!(
        err.field_codes().get("email"),
        Some(&vec!["INVALID_FORMAT".to_string()])
    );
    assert!(err.body().unwrap().contains("INVALID_FORMAT"));
}

#[tokio::test]
async fn test_server_error_keeps_raw_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items/1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<h1>Server Error</h1>"))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).items().find("1").await.unwrap_err();
    match err {
        Error::ApiClient { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "<h1>Server Error</h1>");
        }
        other => panic!("Expected ApiClient, got {other:?}"),
    }
}

#[tokio::test]
async fn test_schema_violation_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .uploads()
        .create(&ResourceInput::new().with("alt", "x"))
        .await
        .unwrap_err();
    assert!(err.is_schema_violation());
    assert_eq!(
        err.to_string(),
        "Invalid upload payload, missing: format, path, size"
    );
}

// ============================================================================
// Client
// ============================================================================

#[tokio::test]
async fn test_registry_caches_resources() {
    let mock_server = MockServer::start().await;
    let client = client(&mock_server);

    assert!(std::ptr::eq(client.items(), client.items()));
    assert!(std::ptr::eq(
        client.resource(ResourceKind::Roles),
        client.resource_named("roles").unwrap()
    ));
    assert_eq!(client.resource_named("item-types").unwrap().path(), "/item-types");
    assert!(matches!(
        client.resource_named("widgets"),
        Err(Error::UnknownResource { .. })
    ));
}

#[tokio::test]
async fn test_raw_request_passes_text_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let body = client(&mock_server)
        .request(Method::GET, "/health", None)
        .await
        .unwrap();
    assert_eq!(body, json!("ok"));
}

#[tokio::test]
async fn test_from_config_file() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/roles/1"))
        .and(header("Authorization", "Bearer yaml-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"type": "role", "id": "1"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("dato.yaml");
    std::fs::write(
        &file,
        format!("api_token: yaml-token\nbase_url: {}\n", mock_server.uri()),
    )
    .unwrap();

    let client = Client::new(ClientConfig::from_file(&file).unwrap()).unwrap();
    let record = client.roles().find("1").await.unwrap();
    assert_eq!(record["id"], json!("1"));
}
