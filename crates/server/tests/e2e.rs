use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use storage::{LocalFsBackend, ObjectStore, StorageError};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes;
use server::state::AppState;

fn cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

struct TestApp {
    base_url: String,
}

async fn start_with_store(store: Arc<dyn ObjectStore>) -> anyhow::Result<TestApp> {
    let state = AppState::new(store, "test-bucket");
    let app: Router = routes::build_router(cors(), state);

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url })
}

/// Boot the router against an isolated local filesystem store.
async fn start_server() -> anyhow::Result<TestApp> {
    let root = std::env::temp_dir().join(format!("slot-store-e2e-{}", Uuid::new_v4()));
    let store = LocalFsBackend::new(&root).await?;
    start_with_store(Arc::new(store)).await
}

/// Store stub whose every operation fails the way a misconfigured remote
/// bucket would.
struct FailingStore;

#[async_trait]
impl ObjectStore for FailingStore {
    async fn exists(&self, _key: &str) -> Result<bool, StorageError> {
        Err(StorageError::backend("access denied", Some("AccessDenied".into())))
    }
    async fn download(&self, _key: &str) -> Result<Vec<u8>, StorageError> {
        Err(StorageError::backend("access denied", Some("AccessDenied".into())))
    }
    async fn upload(
        &self,
        _key: &str,
        _data: &[u8],
        _content_type: &str,
        _cache_control: &str,
    ) -> Result<(), StorageError> {
        Err(StorageError::backend("access denied", Some("AccessDenied".into())))
    }
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn e2e_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_save_then_load_round_trips() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let doc = json!({
        "layers": [{"id": 1, "name": "base", "visible": true}],
        "controlBoxes": [{"x": 10, "y": 20, "w": 100, "h": 50}],
    });

    let res = c
        .post(format!("{}/save?slot=slot7", app.base_url))
        .json(&doc)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let ack = res.json::<Value>().await?;
    assert_eq!(ack["success"], true);
    assert_eq!(ack["slot"], "slot7");
    assert_eq!(ack["key"], "data_slot7.json");
    assert!(ack["bytes"].as_u64().unwrap() > 0);

    let res = c.get(format!("{}/load?slot=slot7", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let loaded = res.json::<Value>().await?;
    assert_eq!(loaded, doc);
    Ok(())
}

#[tokio::test]
async fn e2e_unsaved_slot_loads_empty_document() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/load?slot=slot99", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body, json!({"layers": [], "controlBoxes": []}));
    Ok(())
}

#[tokio::test]
async fn e2e_missing_slot_param_means_slot1() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let doc = json!({"layers": [1, 2], "controlBoxes": []});
    let res = c.post(format!("{}/save", app.base_url)).json(&doc).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["slot"], "slot1");

    // explicit slot1 reads back what the default save wrote
    let res = c.get(format!("{}/load?slot=slot1", app.base_url)).send().await?;
    assert_eq!(res.json::<Value>().await?, doc);

    // and the default load reads the same
    let res = c.get(format!("{}/load", app.base_url)).send().await?;
    assert_eq!(res.json::<Value>().await?, doc);
    Ok(())
}

#[tokio::test]
async fn e2e_save_replaces_wholesale() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    for doc in [json!({"a": 1}), json!({"b": 2})] {
        let res = c
            .post(format!("{}/save?slot=slot3", app.base_url))
            .json(&doc)
            .send()
            .await?;
        assert_eq!(res.status(), HttpStatusCode::OK);
    }

    let res = c.get(format!("{}/load?slot=slot3", app.base_url)).send().await?;
    // no merge: only the second document survives
    assert_eq!(res.json::<Value>().await?, json!({"b": 2}));
    Ok(())
}

#[tokio::test]
async fn e2e_accepts_any_json_value() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let doc = json!([1, "two", {"three": 3}, null]);
    let res = c
        .post(format!("{}/save?slot=slot5", app.base_url))
        .json(&doc)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c.get(format!("{}/load?slot=slot5", app.base_url)).send().await?;
    assert_eq!(res.json::<Value>().await?, doc);
    Ok(())
}

#[tokio::test]
async fn e2e_invalid_slot_rejected_without_backend_call() -> anyhow::Result<()> {
    // a store that fails on any call proves validation short-circuits
    let app = start_with_store(Arc::new(FailingStore)).await?;
    let c = client();

    for bad in ["slotx", "slot", "1slot", "SLOT1", "slot1x"] {
        let res = c.get(format!("{}/load?slot={}", app.base_url, bad)).send().await?;
        assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST, "load {bad:?}");
        assert_eq!(res.json::<Value>().await?["error"], "Invalid slot name");

        let res = c
            .post(format!("{}/save?slot={}", app.base_url, bad))
            .json(&json!({"a": 1}))
            .send()
            .await?;
        assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST, "save {bad:?}");
        assert_eq!(res.json::<Value>().await?["error"], "Invalid slot name");
    }
    Ok(())
}

#[tokio::test]
async fn e2e_backend_failure_yields_500() -> anyhow::Result<()> {
    let app = start_with_store(Arc::new(FailingStore)).await?;
    let c = client();

    let res = c.get(format!("{}/load?slot=slot1", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], "Failed to load data");
    assert_eq!(body["details"], "access denied");
    assert_eq!(body["code"], "AccessDenied");
    assert_eq!(body["bucket"], "test-bucket");
    assert!(body["hint"].as_str().unwrap().contains("credentials"));

    let res = c
        .post(format!("{}/save?slot=slot1", app.base_url))
        .json(&json!({"a": 1}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], "Failed to save data");
    Ok(())
}

#[tokio::test]
async fn e2e_corrupt_stored_object_yields_500() -> anyhow::Result<()> {
    let root = std::env::temp_dir().join(format!("slot-store-e2e-{}", Uuid::new_v4()));
    let store = LocalFsBackend::new(&root).await?;
    // plant bytes that are not JSON where slot2's document would live
    store
        .upload("data_slot2.json", b"not json at all", "application/json", "no-cache")
        .await?;
    let app = start_with_store(Arc::new(store)).await?;

    let res = client().get(format!("{}/load?slot=slot2", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], "Failed to load data");
    assert!(body["details"].as_str().unwrap().contains("not valid JSON"));
    Ok(())
}
