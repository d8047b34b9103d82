use beacon_store::{
    Content, NewVersion, PageId, RestStore, StoreConfig, StoreError, VersionNumber, VersionStore,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_for(server: &MockServer) -> RestStore {
    RestStore::new(&StoreConfig::new(server.uri(), "anon-key")).unwrap()
}

fn row(id: i64, minor: u32, at: &str) -> serde_json::Value {
    json!({
        "id": id,
        "page": "index",
        "content": { "h1": format!("Title {}", minor) },
        "version_major": 1,
        "version_minor": minor,
        "updated_by": "ada",
        "updated_at": at
    })
}

#[tokio::test]
async fn test_list_versions_queries_page_newest_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/page_versions"))
        .and(query_param("select", "*"))
        .and(query_param("page", "eq.index"))
        .and(query_param("order", "updated_at.desc"))
        .and(header("apikey", "anon-key"))
        .and(header("Authorization", "Bearer anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            row(3, 2, "2024-02-05T12:00:00+00:00"),
            row(2, 1, "2024-02-05T11:00:00+00:00"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let versions = store_for(&server).list_versions(&PageId::new("index")).await.unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0].version(), VersionNumber::new(1, 2));
    assert_eq!(versions[1].content.get("h1"), Some("Title 1"));
}

#[tokio::test]
async fn test_list_versions_normalizes_string_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/page_versions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 1,
            "page": "index",
            "content": "{\"#hero\":\"<b>Hi</b>\"}",
            "version_major": null,
            "version_minor": null,
            "updated_by": null,
            "updated_at": "2024-02-05T10:00:00Z"
        }])))
        .mount(&server)
        .await;

    let versions = store_for(&server).list_versions(&PageId::new("index")).await.unwrap();
    assert_eq!(versions[0].content.get("#hero"), Some("<b>Hi</b>"));
    assert_eq!(versions[0].version().to_string(), "v1.0");
    assert_eq!(versions[0].author(), "Unknown");
}

#[tokio::test]
async fn test_insert_returns_representation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/page_versions"))
        .and(header("Prefer", "return=representation"))
        .and(body_partial_json(json!({ "page": "index", "version_minor": 5, "updated_by": "ada" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([row(9, 5, "2024-02-05T13:00:00Z")])))
        .expect(1)
        .mount(&server)
        .await;

    let mut content = Content::new();
    content.insert("h1", "Title 5");
    let record = store_for(&server)
        .insert_version(NewVersion::new("index", content, VersionNumber::new(1, 5), "ada"))
        .await
        .unwrap();
    assert_eq!(record.id, 9);
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/page_versions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("{\"message\":\"Invalid API key\"}"))
        .mount(&server)
        .await;

    let err = store_for(&server)
        .insert_version(NewVersion::new("index", Content::new(), VersionNumber::INITIAL, "ada"))
        .await
        .unwrap_err();
    match err {
        StoreError::Status { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Invalid API key"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn test_list_all_has_no_page_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/page_versions"))
        .and(query_param("order", "updated_at.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row(1, 0, "2024-02-05T10:00:00Z")])))
        .mount(&server)
        .await;

    let all = store_for(&server).list_all().await.unwrap();
    assert_eq!(all.len(), 1);
}

#[test]
fn test_unconfigured_store_is_rejected() {
    let config = StoreConfig::new("YOUR_SUPABASE_URL", "YOUR_SUPABASE_ANON_KEY");
    assert!(matches!(RestStore::new(&config), Err(StoreError::NotConfigured)));
}
