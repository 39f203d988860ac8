use std::fs;
use std::path::Path;

use reqwest::StatusCode;
use tempfile::TempDir;

use retailpulse_infra::AppConfig;
use retailpulse_infra::loader::{DEMAND_FILE, INVENTORY_FILE, PRICING_FILE};
use retailpulse_inventory::SurplusPolicy;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(data_dir: &Path, policy: SurplusPolicy) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let config = AppConfig {
            data_dir: data_dir.to_path_buf(),
            surplus_policy: policy,
            ..AppConfig::default()
        };
        let app = retailpulse_api::app::build_app(config);
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

    async fn get(&self, path: &str) -> (StatusCode, serde_json::Value) {
        let res = reqwest::get(format!("{}{}", self.base_url, path)).await.unwrap();
        let status = res.status();
        let body = res.json().await.unwrap_or(serde_json::Value::Null);
        (status, body)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

const DEMAND_CSV: &str = "\
Date,Product ID,Store ID,Units Sold
2024-01-01,P1,S1,10
2024-01-02,P1,S1,12
2024-01-03,P1,S1,9
2024-01-04,P1,S1,14
2024-01-05,P1,S1,11
2024-01-06,P1,S1,13
2024-01-07,P1,S1,8
";

const INVENTORY_CSV: &str = "\
Product ID,Store ID,Stock Levels,Reorder Point
X,S1,5,10
X,S2,30,10
Y,S1,9,10
Y,S2,15.4,10
Z,S1,5,10
W,S1,9.9,10
W,S2,0.2,0.1
";

const PRICING_CSV: &str = "\
Product ID,Store ID,Price,Sales Volume,Storage Cost
P1,S1,8.0,10,1
P2,S1,15.0,20,3
P3,S2,12.0,30,2
P4,S2,19.0,40,4
";

fn write_fixtures(dir: &Path) {
    fs::write(dir.join(DEMAND_FILE), DEMAND_CSV).unwrap();
    fs::write(dir.join(INVENTORY_FILE), INVENTORY_CSV).unwrap();
    fs::write(dir.join(PRICING_FILE), PRICING_CSV).unwrap();
}

#[tokio::test]
async fn health_and_sections() {
    let dir = TempDir::new().unwrap();
    let server = TestServer::spawn(dir.path(), SurplusPolicy::Shared).await;

    let res = reqwest::get(format!("{}/health", server.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let (status, body) = server.get("/sections").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["sections"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["demand", "inventory", "pricing"]);
}

#[tokio::test]
async fn redistribution_plan_renders_alerts() {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    let server = TestServer::spawn(dir.path(), SurplusPolicy::Shared).await;

    let (status, body) = server.get("/inventory/redistribution").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["policy"], "shared");
    assert!(body["run_id"].is_string());

    let suggestions = body["suggestions"].as_array().unwrap();
    assert_eq!(suggestions.len(), 4);

    // X: deficit 5 < surplus 20.
    assert_eq!(suggestions[0]["product"], "X");
    assert_eq!(suggestions[0]["status"], "PROPOSED");
    assert_eq!(suggestions[0]["quantity"], 5);
    assert_eq!(suggestions[0]["source_store"], "S2");
    assert_eq!(suggestions[0]["destination_store"], "S1");
    assert_eq!(suggestions[0]["alert"]["level"], "success");
    assert_eq!(
        suggestions[0]["alert"]["message"],
        "Transfer 5 units of 'X' from Store S2 to Store S1"
    );

    // Y: floor(min(5.4, 1)) = 1.
    assert_eq!(suggestions[1]["quantity"], 1);
    assert_eq!(suggestions[1]["status"], "PROPOSED");

    // Z: nothing to draw from.
    assert_eq!(suggestions[2]["status"], "NO_MATCH");
    assert!(suggestions[2]["source_store"].is_null());
    assert_eq!(suggestions[2]["alert"]["level"], "error");

    // W: overlap below one unit.
    assert_eq!(suggestions[3]["status"], "BLOCKED_LOW_BUFFER");
    assert_eq!(suggestions[3]["alert"]["level"], "warning");

    assert_eq!(body["summary"]["proposed"], 2);
    assert_eq!(body["summary"]["no_match"], 1);
    assert_eq!(body["summary"]["blocked_low_buffer"], 1);
    assert_eq!(body["summary"]["total_units"], 6);
}

#[tokio::test]
async fn ledger_policy_is_reported() {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    let server = TestServer::spawn(dir.path(), SurplusPolicy::Ledger).await;

    let (status, body) = server.get("/inventory/redistribution").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["policy"], "ledger");
}

#[tokio::test]
async fn demand_sample_defaults_to_five_rows() {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    let server = TestServer::spawn(dir.path(), SurplusPolicy::Shared).await;

    let (status, body) = server.get("/demand/sample").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows"].as_array().unwrap().len(), 5);
    assert_eq!(body["total_rows"], 7);
    assert_eq!(body["headers"][3], "Units Sold");

    let (_, body) = server.get("/demand/sample?rows=2").await;
    assert_eq!(body["rows"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn pricing_optimization_returns_rounded_rows() {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    let server = TestServer::spawn(dir.path(), SurplusPolicy::Shared).await;

    let (status, body) = server.get("/pricing/optimization").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["product"], "P1");
    assert_eq!(rows[0]["price"], 8.0);
    for row in rows {
        let optimized = row["optimized_price"].as_f64().unwrap();
        assert_eq!(optimized, (optimized * 100.0).round() / 100.0);
        assert!(row["price_change_pct"].is_number());
    }
    let r2 = body["r_squared"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&r2));
    assert_eq!(body["confidence"].as_f64(), Some(r2.clamp(0.0, 1.0)));
    assert!(body["explanation"].as_str().unwrap().contains("fitted price"));
}

#[tokio::test]
async fn pricing_with_constant_storage_cost_still_renders() {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    fs::write(
        dir.path().join(PRICING_FILE),
        "Product ID,Store ID,Price,Sales Volume,Storage Cost\n\
         P1,S1,6.0,10,2\n\
         P2,S1,8.0,20,2\n\
         P3,S2,10.0,30,2\n\
         P4,S2,12.0,40,2\n",
    )
    .unwrap();
    let server = TestServer::spawn(dir.path(), SurplusPolicy::Shared).await;

    let (status, body) = server.get("/pricing/optimization").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows"].as_array().unwrap().len(), 4);
    assert_eq!(body["coefficients"]["storage"].as_f64().map(f64::abs), Some(0.0));
    assert_eq!(body["rows"][2]["optimized_price"], 10.0);
}

#[tokio::test]
async fn concurrent_requests_are_served() {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    let server = TestServer::spawn(dir.path(), SurplusPolicy::Shared).await;

    let (plan_a, plan_b, pricing, demand) = tokio::join!(
        server.get("/inventory/redistribution"),
        server.get("/inventory/redistribution"),
        server.get("/pricing/optimization"),
        server.get("/demand/sample"),
    );
    assert_eq!(plan_a.0, StatusCode::OK);
    assert_eq!(plan_b.0, StatusCode::OK);
    assert_eq!(plan_a.1["suggestions"], plan_b.1["suggestions"]);
    assert_eq!(pricing.0, StatusCode::OK);
    assert_eq!(demand.0, StatusCode::OK);
}

#[tokio::test]
async fn missing_files_return_service_unavailable() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(DEMAND_FILE), DEMAND_CSV).unwrap();
    let server = TestServer::spawn(dir.path(), SurplusPolicy::Shared).await;

    for path in ["/demand/sample", "/inventory/redistribution", "/pricing/optimization"] {
        let (status, body) = server.get(path).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{path}");
        assert_eq!(body["error"], "missing_data");
        assert!(body["message"].as_str().unwrap().contains(INVENTORY_FILE));
    }
}

#[tokio::test]
async fn invalid_rows_return_unprocessable() {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    fs::write(
        dir.path().join(INVENTORY_FILE),
        "Product ID,Store ID,Stock Levels,Reorder Point\nX,S1,5,0\n",
    )
    .unwrap();
    let server = TestServer::spawn(dir.path(), SurplusPolicy::Shared).await;

    let (status, body) = server.get("/inventory/redistribution").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_data");
    assert!(body["message"].as_str().unwrap().contains("threshold"));
}

#[tokio::test]
async fn changed_source_file_is_picked_up() {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    let server = TestServer::spawn(dir.path(), SurplusPolicy::Shared).await;

    let (_, body) = server.get("/inventory/redistribution").await;
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 4);

    fs::write(
        dir.path().join(INVENTORY_FILE),
        "Product ID,Store ID,Stock Levels,Reorder Point\nX,S1,5,10\n",
    )
    .unwrap();

    let (_, body) = server.get("/inventory/redistribution").await;
    let suggestions = body["suggestions"].as_array().unwrap();
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0]["status"], "NO_MATCH");
}

#[tokio::test]
async fn invalidate_returns_no_content() {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    let server = TestServer::spawn(dir.path(), SurplusPolicy::Shared).await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/cache/invalidate", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let (status, _) = server.get("/inventory/redistribution").await;
    assert_eq!(status, StatusCode::OK);
}
