//! Test utilities
//!
//! A mock dashboard API server: account signup, session login via cookie,
//! login status, logout and the transaction feed.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Json, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::oneshot;

pub const MOCK_USERNAME: &str = "demo";
pub const MOCK_PASSWORD: &str = "letmein";

const SESSION_COOKIE: &str = "session=mock-session";

/// Three valid transactions and one with an unparseable date
pub const DEFAULT_FEED: &str = r#"[
    {"accountno": "ACC-1", "category": "food", "id": 1, "ref": "Corner shop", "time": "2024-01-03T10:00:00", "val": -12.5},
    {"accountno": "ACC-1", "category": "salary", "id": 2, "ref": "Payroll", "time": "2024-01-31T09:00:00", "val": 2000},
    {"accountno": "ACC-1", "category": "travel", "id": 3, "ref": "Train", "time": "2024-02-02T18:30:00", "val": -45},
    {"accountno": "ACC-1", "category": "food", "id": 4, "ref": "Bakery", "time": "sometime", "val": -3}
]"#;

struct MockState {
    feed: String,
    /// username -> password; starts with the demo account
    accounts: Mutex<HashMap<String, String>>,
    register_calls: AtomicUsize,
}

/// Mock API server for client tests
pub struct MockApiServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockApiServer {
    /// Start the mock server on an available port with the default feed
    pub async fn start() -> Self {
        Self::start_with_feed(DEFAULT_FEED).await
    }

    /// Start the mock server serving `feed` verbatim from `/home`
    pub async fn start_with_feed(feed: &str) -> Self {
        let accounts = HashMap::from([(MOCK_USERNAME.to_string(), MOCK_PASSWORD.to_string())]);
        let state = Arc::new(MockState {
            feed: feed.to_string(),
            accounts: Mutex::new(accounts),
            register_calls: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route("/register", post(handle_register))
            .route("/login", get(handle_login_status).post(handle_login))
            .route("/logout", post(handle_logout))
            .route("/home", get(handle_feed))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Number of requests that reached `/register`
    pub fn register_calls(&self) -> usize {
        self.state.register_calls.load(Ordering::SeqCst)
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockApiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Deserialize)]
struct RegisterRequest {
    username: String,
    #[allow(dead_code)]
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

fn has_session(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .any(|pair| pair.trim() == SESSION_COOKIE)
}

/// Taken usernames answer 200 with `success: false`
async fn handle_register(
    State(state): State<Arc<MockState>>,
    Json(request): Json<RegisterRequest>,
) -> Json<serde_json::Value> {
    state.register_calls.fetch_add(1, Ordering::SeqCst);
    let mut accounts = state.accounts.lock().unwrap();
    if accounts.contains_key(&request.username) {
        return Json(json!({ "success": false }));
    }
    accounts.insert(request.username, request.password);
    Json(json!({ "success": true }))
}

async fn handle_login(
    State(state): State<Arc<MockState>>,
    Json(request): Json<LoginRequest>,
) -> Response {
    let known = state
        .accounts
        .lock()
        .unwrap()
        .get(&request.username)
        .is_some_and(|password| *password == request.password);
    if known {
        (
            [(header::SET_COOKIE, format!("{}; Path=/", SESSION_COOKIE))],
            Json(json!({ "successful": true })),
        )
            .into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "successful": false }))).into_response()
    }
}

async fn handle_login_status(headers: HeaderMap) -> Json<serde_json::Value> {
    Json(json!({ "successful": has_session(&headers) }))
}

async fn handle_logout() -> Response {
    (
        [(header::SET_COOKIE, "session=; Path=/; Max-Age=0".to_string())],
        StatusCode::OK,
    )
        .into_response()
}

async fn handle_feed(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !has_session(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    (
        [(header::CONTENT_TYPE, "application/json".to_string())],
        state.feed.clone(),
    )
        .into_response()
}
