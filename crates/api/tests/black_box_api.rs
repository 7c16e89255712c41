use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;

use partmatch_api::app::services::AppServices;
use partmatch_core::ItemCode;
use partmatch_infra::{CatalogConfig, CatalogSource, FetchError, InMemoryCatalogSource};
use partmatch_inventory::InventoryItem;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(source: Arc<dyn CatalogSource>) -> Self {
        // Same router as prod, backed by a test catalog and an ephemeral port.
        let services = Arc::new(AppServices::new(source, &CatalogConfig::default()));
        let app = partmatch_api::app::build_app(services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

struct DownSource;

#[async_trait]
impl CatalogSource for DownSource {
    async fn fetch_page(&self, page: u32, _page_size: u32) -> Result<Vec<InventoryItem>, FetchError> {
        Err(FetchError::Status {
            page,
            status: 503,
            body: "upstream maintenance".to_string(),
        })
    }
}

/// In-memory catalog that can be taken offline after warming the cache.
struct OutageSource {
    inner: InMemoryCatalogSource,
    down: AtomicBool,
}

#[async_trait]
impl CatalogSource for OutageSource {
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<Vec<InventoryItem>, FetchError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(FetchError::Status {
                page,
                status: 503,
                body: "upstream maintenance".to_string(),
            });
        }
        self.inner.fetch_page(page, page_size).await
    }
}

fn item(code: &str, name: &str, quantity: f64) -> InventoryItem {
    InventoryItem::new(Some(ItemCode::new(code).unwrap()), name, quantity)
}

fn catalog() -> Vec<InventoryItem> {
    vec![
        item("0215-21-13001", "ボールバルブ 13mm", 4.0),
        item("0215-21-20001", "ボールバルブ 20mm", 0.0),
        item("0215-30-00001", "シールテープ", 0.0),
        item("0215-40-00001", "ユニオン 1/2", 7.0),
        item("0301-00-00001", "エルボ 13mm", 9.0),
        item("GASKET", "ガスケット", 2.0),
        InventoryItem::new(None, "未登録品", 1.0),
    ]
}

async fn spawn_catalog() -> (TestServer, Arc<InMemoryCatalogSource>) {
    let source = Arc::new(InMemoryCatalogSource::new(catalog()));
    let srv = TestServer::spawn(source.clone()).await;
    (srv, source)
}

#[tokio::test]
async fn health_is_public_and_tagged_with_request_id() {
    let (srv, _) = spawn_catalog().await;

    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));

    let res = reqwest::Client::new()
        .get(format!("{}/health", srv.base_url))
        .header("x-request-id", "trace-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "trace-123");
}

#[tokio::test]
async fn stock_summary_splits_by_quantity() {
    let (srv, _) = spawn_catalog().await;

    let res = reqwest::get(format!("{}/inventory/summary", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["total"], 7);
    assert_eq!(body["out_of_stock_count"], 2);
    assert_eq!(body["in_stock_count"], 5);
}

#[tokio::test]
async fn code_search_reports_hits_and_misses() {
    let (srv, _) = spawn_catalog().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/inventory/search", srv.base_url))
        .query(&[("code", "0215-21")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["found"], true);
    assert_eq!(body["count"], 2);

    let res = client
        .get(format!("{}/inventory/search", srv.base_url))
        .query(&[("code", "9999")])
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["found"], false);
    assert_eq!(body["items"].as_array().unwrap().len(), 0);

    let res = client
        .get(format!("{}/inventory/search", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "malformed_input");
}

#[tokio::test]
async fn related_parts_for_a_catalogued_item() {
    let (srv, _) = spawn_catalog().await;

    let res = reqwest::Client::new()
        .post(format!("{}/inventory/related", srv.base_url))
        .json(&json!({ "item_code": "0215-21-13001", "required_quantity": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();

    assert_eq!(body["target"]["classification"], "0215");
    assert_eq!(body["target"]["required_sizes"], json!([13]));

    // Shortage first, then common before size-matched.
    let codes: Vec<&str> = body["parts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["item"]["item_code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["0215-30-00001", "0215-40-00001"]);
    assert_eq!(body["shortage_count"], 1);
    assert_eq!(body["common_count"], 1);
    assert_eq!(body["size_matched_count"], 1);
    assert_eq!(body["excluded"].as_array().unwrap().len(), 1);

    assert_eq!(body["shortage_parts"].as_array().unwrap().len(), 1);
    assert_eq!(body["shortage_parts"][0]["item"]["item_code"], "0215-30-00001");
    assert_eq!(body["in_stock_parts"].as_array().unwrap().len(), 1);
    assert_eq!(body["in_stock_parts"][0]["item"]["item_code"], "0215-40-00001");
}

#[tokio::test]
async fn related_parts_for_an_explicit_family() {
    let (srv, _) = spawn_catalog().await;

    let res = reqwest::Client::new()
        .post(format!("{}/inventory/related", srv.base_url))
        .json(&json!({ "classification": "0215", "name": "バルブ 20mm" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let codes: Vec<&str> = body["parts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["item"]["item_code"].as_str().unwrap())
        .collect();
    assert!(codes.contains(&"0215-21-20001"));
    assert!(codes.contains(&"0215-30-00001"));
    assert!(!codes.contains(&"0215-21-13001"));
}

#[tokio::test]
async fn related_parts_error_statuses() {
    let (srv, _) = spawn_catalog().await;
    let client = reqwest::Client::new();
    let url = format!("{}/inventory/related", srv.base_url);

    let res = client.post(&url).json(&json!({ "item_code": "0999-00" })).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");

    let res = client.post(&url).json(&json!({ "item_code": "GASKET" })).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "classification_unresolved");

    let res = client
        .post(&url)
        .json(&json!({ "item_code": "0215-21-13001", "required_quantity": -1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(&url)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "malformed_input");
}

#[tokio::test]
async fn order_check_distinguishes_unregistered_lines() {
    let (srv, _) = spawn_catalog().await;

    let res = reqwest::Client::new()
        .post(format!("{}/orders/check", srv.base_url))
        .json(&json!({
            "lines": [
                { "item_code": "0215-21-13001", "quantity": 2 },
                { "item_code": "0215-21-20001", "quantity": 1 },
                { "item_code": "NOPE-1", "quantity": 1 },
                { "item_code": "GASKET", "quantity": 1 }
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();

    let statuses: Vec<&str> = body["lines"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["registered", "registered", "not_registered", "unclassified"]);
    assert_eq!(body["registered_count"], 3);
    assert_eq!(body["not_registered_count"], 1);
    assert_eq!(body["lines"][1]["is_shortage"], true);
}

#[tokio::test]
async fn refresh_reloads_the_upstream_catalog() {
    let (srv, source) = spawn_catalog().await;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/inventory/summary", srv.base_url)).send().await.unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["total"], 7);

    source.replace(vec![item("0215-21-13001", "ボールバルブ 13mm", 4.0)]);

    let res = client.post(format!("{}/catalog/refresh", srv.base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["items"], 1);
    assert_eq!(body["pages"], 1);

    let res = client.get(format!("{}/inventory/summary", srv.base_url)).send().await.unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn upstream_failure_without_snapshot_is_bad_gateway() {
    let srv = TestServer::spawn(Arc::new(DownSource)).await;

    let res = reqwest::get(format!("{}/inventory/summary", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "fetch_error");
    assert!(body["message"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn failed_refresh_is_bad_gateway_while_reads_stay_up() {
    let source = Arc::new(OutageSource {
        inner: InMemoryCatalogSource::new(catalog()),
        down: AtomicBool::new(false),
    });
    let srv = TestServer::spawn(source.clone()).await;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/inventory/summary", srv.base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    source.down.store(true, Ordering::SeqCst);

    let res = client.post(format!("{}/catalog/refresh", srv.base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "fetch_error");

    let res = client.get(format!("{}/inventory/summary", srv.base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["total"], 7);
}
