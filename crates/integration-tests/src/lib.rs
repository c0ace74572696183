//! Integration test harness for the Storeroom dashboard.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storeroom-integration-tests
//! ```
//!
//! Every test starts its own [`MockBackend`] (an axum server speaking the
//! backend's REST API) and, for end-to-end tests, a dashboard pointed at it
//! via [`spawn_dashboard`]. Both listen on ephemeral localhost ports.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use storeroom_admin::backend::BackendClient;
use storeroom_admin::config::{BackendConfig, CacheConfig, DashboardConfig};
use storeroom_admin::{routes, state::AppState};
use storeroom_core::{ProductId, Role, StoreUser, TrackingType, UserId, Variant, VariantId};

/// Session token used by tests.
pub const CONTEXT: &str = "test-context";

/// Message the mock returns with every failure.
pub const FAILURE_MESSAGE: &str = "mock backend failure";

/// Query of a recorded list request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListRequest {
    pub context: String,
    pub page: u32,
    pub limit: u32,
    #[serde(default, alias = "like")]
    pub search: String,
}

#[derive(Default)]
struct MockState {
    role: Mutex<Role>,
    users: Mutex<Vec<StoreUser>>,
    variants: Mutex<Vec<Variant>>,
    permission_hits: AtomicUsize,
    user_requests: Mutex<Vec<ListRequest>>,
    variant_requests: Mutex<Vec<ListRequest>>,
    user_puts: Mutex<Vec<Value>>,
    variant_puts: Mutex<Vec<Value>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    delay: Mutex<Duration>,
}

/// In-process stand-in for the REST backend.
#[derive(Clone)]
pub struct MockBackend {
    pub url: String,
    state: Arc<MockState>,
}

impl MockBackend {
    /// Start a backend on an ephemeral port.
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        *state.role.lock().unwrap() = Role::Admin;

        let app = Router::new()
            .route("/api/users/role", get(permissions))
            .route("/api/users", get(list_users).put(update_user))
            .route("/api/variants", get(list_variants).put(update_variant))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { url, state }
    }

    /// Role reported for the acting user.
    pub fn set_role(&self, role: Role) {
        *self.state.role.lock().unwrap() = role;
    }

    pub fn set_users(&self, users: Vec<StoreUser>) {
        *self.state.users.lock().unwrap() = users;
    }

    pub fn set_variants(&self, variants: Vec<Variant>) {
        *self.state.variants.lock().unwrap() = variants;
    }

    /// Make every GET answer 500.
    pub fn fail_reads(&self, fail: bool) {
        self.state.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every PUT answer 500.
    pub fn fail_writes(&self, fail: bool) {
        self.state.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Delay every response.
    pub fn set_delay(&self, delay: Duration) {
        *self.state.delay.lock().unwrap() = delay;
    }

    pub fn permission_hits(&self) -> usize {
        self.state.permission_hits.load(Ordering::SeqCst)
    }

    pub fn user_requests(&self) -> Vec<ListRequest> {
        self.state.user_requests.lock().unwrap().clone()
    }

    pub fn variant_requests(&self) -> Vec<ListRequest> {
        self.state.variant_requests.lock().unwrap().clone()
    }

    pub fn user_puts(&self) -> Vec<Value> {
        self.state.user_puts.lock().unwrap().clone()
    }

    pub fn variant_puts(&self) -> Vec<Value> {
        self.state.variant_puts.lock().unwrap().clone()
    }

    /// Backend client configuration pointing at this mock.
    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            api_url: url::Url::parse(&self.url).unwrap(),
            timeout: Some(Duration::from_secs(5)),
        }
    }

    /// A backend client pointing at this mock.
    pub fn client(&self) -> BackendClient {
        BackendClient::new(&self.backend_config()).unwrap()
    }
}

impl MockState {
    async fn pause(&self) {
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

fn failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": FAILURE_MESSAGE })),
    )
        .into_response()
}

/// Slice `items` for a 1-based page, returning the slice and page count.
fn paginate<T: Clone>(items: &[T], page: u32, limit: u32) -> (Vec<T>, u32) {
    let limit = limit.max(1) as usize;
    let total_pages = u32::try_from(items.len().div_ceil(limit)).unwrap();
    let start = (page.max(1) as usize - 1) * limit;
    let slice = items.iter().skip(start).take(limit).cloned().collect();
    (slice, total_pages)
}

async fn permissions(State(state): State<Arc<MockState>>) -> Response {
    state.permission_hits.fetch_add(1, Ordering::SeqCst);
    state.pause().await;
    if state.fail_reads.load(Ordering::SeqCst) {
        return failure();
    }
    let role = *state.role.lock().unwrap();
    Json(json!({ "role": role })).into_response()
}

async fn list_users(
    State(state): State<Arc<MockState>>,
    Query(query): Query<ListRequest>,
) -> Response {
    state.user_requests.lock().unwrap().push(query.clone());
    state.pause().await;
    if state.fail_reads.load(Ordering::SeqCst) {
        return failure();
    }

    let users: Vec<StoreUser> = state
        .users
        .lock()
        .unwrap()
        .iter()
        .filter(|u| u.email.contains(&query.search))
        .cloned()
        .collect();
    let (data, total_pages) = paginate(&users, query.page, query.limit);

    Json(json!({
        "data": data,
        "pagination": {
            "currentPage": query.page,
            "totalPages": total_pages,
            "totalItems": users.len(),
        }
    }))
    .into_response()
}

async fn list_variants(
    State(state): State<Arc<MockState>>,
    Query(query): Query<ListRequest>,
) -> Response {
    state.variant_requests.lock().unwrap().push(query.clone());
    state.pause().await;
    if state.fail_reads.load(Ordering::SeqCst) {
        return failure();
    }

    let variants: Vec<Variant> = state
        .variants
        .lock()
        .unwrap()
        .iter()
        .filter(|v| v.sku.contains(&query.search) || v.product_name.contains(&query.search))
        .cloned()
        .collect();
    let (data, total_pages) = paginate(&variants, query.page, query.limit);

    Json(json!({
        "data": data,
        "meta": { "pagination": {
            "total": variants.len(),
            "count": data.len(),
            "per_page": query.limit,
            "current_page": query.page,
            "total_pages": total_pages,
        }}
    }))
    .into_response()
}

async fn update_user(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> Response {
    state.user_puts.lock().unwrap().push(body);
    state.pause().await;
    if state.fail_writes.load(Ordering::SeqCst) {
        return failure();
    }
    StatusCode::OK.into_response()
}

async fn update_variant(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> Response {
    state.variant_puts.lock().unwrap().push(body);
    state.pause().await;
    if state.fail_writes.load(Ordering::SeqCst) {
        return failure();
    }
    StatusCode::OK.into_response()
}

// =============================================================================
// Dashboard
// =============================================================================

/// A running dashboard and a client for it.
pub struct Dashboard {
    pub url: String,
    pub client: reqwest::Client,
}

impl Dashboard {
    /// URL of `path` with the test session token appended.
    pub fn url_for(&self, path: &str) -> String {
        let separator = if path.contains('?') { '&' } else { '?' };
        format!("{}{path}{separator}context={CONTEXT}", self.url)
    }

    /// GET `path` with the session token and return the body.
    pub async fn get_text(&self, path: &str) -> String {
        self.client
            .get(self.url_for(path))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap()
    }

    /// POST a form to `path` with the session token.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url_for(path))
            .form(form)
            .send()
            .await
            .unwrap()
    }
}

/// Start a dashboard reading from `backend`.
pub async fn spawn_dashboard(backend: &MockBackend) -> Dashboard {
    let config = DashboardConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        backend: backend.backend_config(),
        sdk_url: "https://cdn.example.com/sdk.js".to_string(),
        cache: CacheConfig::default(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 1.0,
    };
    let app = routes::app(AppState::new(config).unwrap());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Dashboard {
        url,
        client: reqwest::Client::new(),
    }
}

/// Poll `check` until it holds or `timeout` passes.
pub async fn eventually(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}

/// The markup from `start` up to and including the next `end`.
pub fn fragment<'a>(body: &'a str, start: &str, end: &str) -> &'a str {
    let from = body.find(start).unwrap();
    let len = body[from..].find(end).unwrap() + end.len();
    &body[from..from + len]
}

// =============================================================================
// Fixtures
// =============================================================================

/// `count` variants with SKUs `SKU-001`, `SKU-002`, ...
pub fn variants(count: u32) -> Vec<Variant> {
    (1..=count)
        .map(|i| Variant {
            id: VariantId::new(i64::from(i)),
            product_id: ProductId::new(i64::from(100 + i)),
            product_name: format!("Product {i}"),
            sku: format!("SKU-{i:03}"),
            tracking_type: TrackingType::Product,
            inventory_level: i * 10,
        })
        .collect()
}

pub fn user(id: i64, email: &str, role: Role) -> StoreUser {
    StoreUser {
        user_id: UserId::new(id),
        email: email.to_string(),
        role,
        last_login_epoch_seconds: 1_700_000_000,
    }
}

/// Owner, admin and viewer.
pub fn users() -> Vec<StoreUser> {
    vec![
        user(1, "owner@store.test", Role::Owner),
        user(2, "admin@store.test", Role::Admin),
        user(5, "viewer@store.test", Role::Viewer),
    ]
}
