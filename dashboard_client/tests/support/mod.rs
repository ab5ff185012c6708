// Stub dashboard backend shared by the integration tests in one binary.
use std::{
    // `HashMap` holds the stub's sessions and saved settings.
    collections::HashMap,
    // `Arc` shares data between threads; `OnceLock` writes a value only once.
    sync::{Arc, Mutex, OnceLock},
    // Sleep durations are used in readiness polling loops.
    time::Duration,
};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
    routing::post,
};
use serde::Deserialize;
use serde_json::{Map, Value, json};

// Session tokens starting with this prefix are accepted by the stub.
pub const VALID_PREFIX: &str = "valid-";
// Cookie the stub sets on a successful exchange, like the real backend.
const COOKIE_NAME: &str = "session_token";

// Global base URL used by all tests after the stub publishes its bound address.
static SERVER_URL: OnceLock<String> = OnceLock::new();
// One-time guard that ensures the stub bootstrap path runs only once.
static SERVER_READY: OnceLock<()> = OnceLock::new();

#[derive(Clone, Default)]
struct StubState {
    // Cookie value -> identity document.
    sessions: Arc<Mutex<HashMap<String, Value>>>,
    // User id -> saved settings document.
    settings: Arc<Mutex<HashMap<String, Value>>>,
}

#[derive(Deserialize)]
struct ExchangeBody {
    session_id: String,
}

// Fresh token the stub accepts; exchanging it twice yields the same user.
pub fn valid_token() -> String {
    format!("{VALID_PREFIX}{}", uuid::Uuid::new_v4())
}

// Ensure the stub backend is running and return its base URL.
pub fn ensure_backend() -> &'static str {
    // Run initialization exactly once even if multiple tests call this function.
    SERVER_READY.get_or_init(|| {
        // Local one-time slot where the stub thread publishes its selected URL.
        let published_url = Arc::new(OnceLock::<String>::new());
        // Clone so the spawned thread can write into the same shared slot.
        let published_url_thread = Arc::clone(&published_url);
        // Spawn an OS thread so the stub outlives individual `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            // The stub thread owns its own Tokio runtime.
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                // Bind to an ephemeral port to avoid collisions with a local backend.
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                // Publish the base URL; the client appends `/api` itself.
                let _ = published_url_thread.set(format!("http://{}", addr));
                // Serve until the test process exits.
                axum::serve(listener, app())
                    .await
                    .expect("stub backend failed");
            });
        });
        // Block until the URL is published and the port accepts connections.
        wait_for_server_url_and_readiness(published_url);
    });

    // Return the stable shared URL used by all tests in this binary.
    SERVER_URL
        .get()
        .expect("server url should be initialized")
        .as_str()
}

fn app() -> Router {
    Router::new()
        .route("/api/auth/session", post(exchange))
        .route("/api/auth/me", get(me))
        .route("/api/auth/logout", post(logout))
        .route("/api/dashboard/stats", get(dashboard_stats))
        .route("/api/settings", get(get_settings).put(put_settings))
        .route("/api/workflow/n8n-json", get(workflow_export))
        .with_state(StubState::default())
}

// Value of the session cookie the client sent, if any.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == COOKIE_NAME)
        .map(|(_, value)| value.to_string())
}

fn current_identity(state: &StubState, headers: &HeaderMap) -> Option<Value> {
    let cookie = session_cookie(headers)?;
    state
        .sessions
        .lock()
        .expect("sessions mutex poisoned")
        .get(&cookie)
        .cloned()
}

fn user_id(identity: &Value) -> String {
    identity["user_id"].as_str().unwrap_or_default().to_string()
}

fn unauthorized(detail: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "detail": detail }))).into_response()
}

async fn exchange(State(state): State<StubState>, Json(body): Json<ExchangeBody>) -> Response {
    let Some(suffix) = body.session_id.strip_prefix(VALID_PREFIX) else {
        return unauthorized("Invalid session ID");
    };

    let identity = json!({
        "user_id": format!("user_{suffix}"),
        "name": "A",
        "email": "a@x.com",
        "picture": null,
    });
    let cookie = uuid::Uuid::new_v4().to_string();
    state
        .sessions
        .lock()
        .expect("sessions mutex poisoned")
        .insert(cookie.clone(), identity.clone());

    (
        StatusCode::OK,
        [(
            header::SET_COOKIE,
            format!("{COOKIE_NAME}={cookie}; Path=/; HttpOnly; SameSite=None"),
        )],
        Json(identity),
    )
        .into_response()
}

async fn me(State(state): State<StubState>, headers: HeaderMap) -> Response {
    match current_identity(&state, &headers) {
        Some(identity) => Json(identity).into_response(),
        None => unauthorized("Not authenticated"),
    }
}

async fn logout(State(state): State<StubState>, headers: HeaderMap) -> Response {
    if let Some(cookie) = session_cookie(&headers) {
        state
            .sessions
            .lock()
            .expect("sessions mutex poisoned")
            .remove(&cookie);
    }
    (
        StatusCode::OK,
        [(header::SET_COOKIE, format!("{COOKIE_NAME}=; Path=/; Max-Age=0"))],
        Json(json!({ "message": "Logged out successfully" })),
    )
        .into_response()
}

async fn dashboard_stats(State(state): State<StubState>, headers: HeaderMap) -> Response {
    if current_identity(&state, &headers).is_none() {
        return unauthorized("Not authenticated");
    }
    Json(json!({
        "invoice_stats": {
            "total": 6,
            "not_updated": 0,
            "matched": 0,
            "downloaded": 4,
            "not_matched": 2,
        },
        "recent_runs": [],
        "recent_attachments": [],
        "total_runs": 0,
        "total_attachments": 4,
    }))
    .into_response()
}

async fn get_settings(State(state): State<StubState>, headers: HeaderMap) -> Response {
    let Some(identity) = current_identity(&state, &headers) else {
        return unauthorized("Not authenticated");
    };
    let saved = state
        .settings
        .lock()
        .expect("settings mutex poisoned")
        .get(&user_id(&identity))
        .cloned()
        .unwrap_or_else(|| json!({}));
    Json(saved).into_response()
}

// Fields absent from the body keep their saved value.
async fn put_settings(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(update): Json<Map<String, Value>>,
) -> Response {
    let Some(identity) = current_identity(&state, &headers) else {
        return unauthorized("Not authenticated");
    };
    let mut settings = state.settings.lock().expect("settings mutex poisoned");
    let saved = settings
        .entry(user_id(&identity))
        .or_insert_with(|| json!({}));
    if let Some(fields) = saved.as_object_mut() {
        fields.extend(update);
    }
    Json(saved.clone()).into_response()
}

async fn workflow_export(State(state): State<StubState>, headers: HeaderMap) -> Response {
    if current_identity(&state, &headers).is_none() {
        return unauthorized("Not authenticated");
    }
    Json(json!({
        "name": "Invoice Email Matcher",
        "nodes": [{ "name": "Gmail Trigger" }],
    }))
    .into_response()
}

// Wait for URL publication, then for the stub socket to accept TCP connections.
fn wait_for_server_url_and_readiness(published_url: Arc<OnceLock<String>>) {
    // Poll until the stub thread publishes the base URL.
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        // Avoid a tight loop while waiting for the background thread.
        std::thread::sleep(Duration::from_millis(10));
    };

    // Persist the URL globally so every test gets the same endpoint.
    let _ = SERVER_URL.set(base_url.clone());

    // Strip the scheme so we can use host:port for raw TCP readiness checks.
    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");

    // Retry for a short period to avoid racing the stub's bind/accept.
    for _ in 0..100 {
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    // Fail fast if startup never reached an accepting state.
    panic!("stub backend did not become ready in time");
}
