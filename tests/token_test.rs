use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use chrono::Utc;
use serde_json::{Value, json};

use spotibridge::{
    error::Error,
    management::{CredentialStore, TokenManager},
    types::TokenRecord,
};

/// Stand-in for the accounts token endpoint. Counts how many exchanges it
/// served and answers every request with a fixed status and body.
#[derive(Clone)]
struct StubState {
    hits: Arc<AtomicUsize>,
    status: u16,
    body: Arc<Value>,
}

async fn token_endpoint(State(stub): State<StubState>) -> (StatusCode, Json<Value>) {
    stub.hits.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::from_u16(stub.status).unwrap(),
        Json((*stub.body).clone()),
    )
}

async fn spawn_token_stub(status: u16, body: Value) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let state = StubState {
        hits: Arc::clone(&hits),
        status,
        body: Arc::new(body),
    };

    let app = Router::new()
        .route("/api/token", post(token_endpoint))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api/token", addr), hits)
}

fn temp_store(tag: &str) -> CredentialStore {
    let mut path = std::env::temp_dir();
    path.push(format!(
        "spotibridge-test-{}-{}.json",
        tag,
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    CredentialStore::at(path)
}

fn record_expiring_in(seconds: i64) -> TokenRecord {
    TokenRecord {
        access_token: "stale-access".to_string(),
        refresh_token: "refresh-1".to_string(),
        expires_at: Utc::now().timestamp_millis() + seconds * 1000,
    }
}

fn manager(store: CredentialStore, token_url: String) -> TokenManager {
    TokenManager::new(
        store,
        token_url,
        "client-id".to_string(),
        "client-secret".to_string(),
    )
}

#[tokio::test]
async fn test_load_refreshes_inside_margin() {
    let (url, hits) = spawn_token_stub(
        200,
        json!({ "access_token": "fresh-access", "expires_in": 3600 }),
    )
    .await;

    // Expires in 10 seconds - inside the 60 second safety margin
    let store = temp_store("load-refresh");
    store.write(&record_expiring_in(10)).await.unwrap();

    let mgr = manager(temp_store_reopen("load-refresh"), url);
    let record = mgr.load_persisted().await.unwrap().unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(record.access_token, "fresh-access");
    // Response carried no refresh token, so the stored one is kept
    assert_eq!(record.refresh_token, "refresh-1");
    assert!(mgr.is_authenticated().await);
}

#[tokio::test]
async fn test_load_skips_refresh_outside_margin() {
    let (url, hits) = spawn_token_stub(
        200,
        json!({ "access_token": "fresh-access", "expires_in": 3600 }),
    )
    .await;

    let store = temp_store("load-fresh");
    store.write(&record_expiring_in(3600)).await.unwrap();

    let mgr = manager(temp_store_reopen("load-fresh"), url);
    let record = mgr.load_persisted().await.unwrap().unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(record.access_token, "stale-access");
}

#[tokio::test]
async fn test_concurrent_ensure_valid_refreshes_once() {
    let (url, hits) = spawn_token_stub(
        200,
        json!({ "access_token": "fresh-access", "expires_in": 3600 }),
    )
    .await;

    let mgr = TokenManager::preloaded(
        temp_store("single-flight"),
        url,
        "client-id".to_string(),
        "client-secret".to_string(),
        record_expiring_in(10),
    );

    // All of these discover the stale record at the same time; the state
    // lock serializes them and only the winner performs the exchange.
    let (a, b, c, d, e) = tokio::join!(
        mgr.ensure_valid(),
        mgr.ensure_valid(),
        mgr.ensure_valid(),
        mgr.ensure_valid(),
        mgr.ensure_valid(),
    );
    for result in [a, b, c, d, e] {
        result.unwrap();
    }

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    let record = mgr.current_record().await.unwrap();
    assert_eq!(record.access_token, "fresh-access");
}

#[tokio::test]
async fn test_authorization_round_trip() {
    let (url, hits) = spawn_token_stub(
        200,
        json!({
            "access_token": "granted-access",
            "refresh_token": "granted-refresh",
            "expires_in": 3600
        }),
    )
    .await;

    let before = Utc::now().timestamp_millis();
    let mgr = manager(temp_store("round-trip"), url.clone());
    let record = mgr.complete_authorization("auth-code").await.unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(record.access_token, "granted-access");
    assert_eq!(record.refresh_token, "granted-refresh");
    assert!(record.expires_at >= before + 3600 * 1000);
    assert!(record.expires_at <= Utc::now().timestamp_millis() + 3600 * 1000);

    // A fresh manager reading the same store sees an equivalent record,
    // and the far-future expiry means no refresh on load
    let mgr2 = manager(temp_store_reopen("round-trip"), url);
    let reloaded = mgr2.load_persisted().await.unwrap().unwrap();
    assert_eq!(reloaded, record);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_store_means_not_authenticated() {
    let (url, hits) = spawn_token_stub(200, json!({})).await;

    let mgr = manager(temp_store("missing"), url);
    assert!(mgr.load_persisted().await.unwrap().is_none());
    assert!(!mgr.is_authenticated().await);
    assert!(matches!(
        mgr.ensure_valid().await.unwrap_err(),
        Error::NotAuthenticated
    ));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_refresh_failure_is_terminal() {
    let (url, hits) = spawn_token_stub(400, json!({ "error": "invalid_grant" })).await;

    let mgr = TokenManager::preloaded(
        temp_store("refresh-fail"),
        url,
        "client-id".to_string(),
        "client-secret".to_string(),
        record_expiring_in(10),
    );

    assert!(matches!(
        mgr.ensure_valid().await.unwrap_err(),
        Error::Refresh(_)
    ));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_load_with_failing_refresh_reports_absent() {
    let (url, _hits) = spawn_token_stub(400, json!({ "error": "invalid_grant" })).await;

    let store = temp_store("load-fail");
    store.write(&record_expiring_in(10)).await.unwrap();

    // A stored record that cannot be refreshed is useless; loading reports
    // the not-yet-authorized state instead of erroring
    let mgr = manager(temp_store_reopen("load-fail"), url);
    assert!(mgr.load_persisted().await.unwrap().is_none());
    assert!(!mgr.is_authenticated().await);
}

#[tokio::test]
async fn test_auth_exchange_failure_is_surfaced() {
    let (url, _hits) = spawn_token_stub(500, json!({ "error": "server_error" })).await;

    let mgr = manager(temp_store("exchange-fail"), url);
    assert!(matches!(
        mgr.complete_authorization("bad-code").await.unwrap_err(),
        Error::AuthExchange(_)
    ));
}

/// Same path as [`temp_store`] without wiping the file first.
fn temp_store_reopen(tag: &str) -> CredentialStore {
    let mut path = std::env::temp_dir();
    path.push(format!(
        "spotibridge-test-{}-{}.json",
        tag,
        std::process::id()
    ));
    CredentialStore::at(path)
}
