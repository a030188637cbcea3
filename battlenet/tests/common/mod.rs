//! In-process stand-in for the Battle.net OAuth and game data endpoints

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use battlenet::{BattleNetClient, Endpoints};
use serde_json::json;
use tokio::net::TcpListener;

#[derive(Clone, Copy)]
pub struct MockBehaviour {
    pub expires_in: u64,
    pub token_status: StatusCode,
    pub index_status: StatusCode,
    pub price: u64,
}

impl Default for MockBehaviour {
    fn default() -> Self {
        Self {
            expires_in: 86_399,
            token_status: StatusCode::OK,
            index_status: StatusCode::OK,
            price: 1_234_567,
        }
    }
}

#[derive(Default)]
pub struct Recorded {
    pub token_bodies: Vec<String>,
    pub token_auth: Vec<String>,
    pub index_auth: Vec<String>,
    pub index_queries: Vec<HashMap<String, String>>,
}

#[derive(Clone)]
struct MockState {
    behaviour: MockBehaviour,
    token_requests: Arc<AtomicUsize>,
    index_requests: Arc<AtomicUsize>,
    recorded: Arc<Mutex<Recorded>>,
}

pub struct MockBattleNet {
    pub addr: SocketAddr,
    token_requests: Arc<AtomicUsize>,
    index_requests: Arc<AtomicUsize>,
    recorded: Arc<Mutex<Recorded>>,
}

fn auth_header(headers: &HeaderMap) -> String {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn token(State(state): State<MockState>, headers: HeaderMap, body: String) -> Response {
    let n = state.token_requests.fetch_add(1, Ordering::SeqCst) + 1;
    {
        let mut recorded = state.recorded.lock().unwrap();
        recorded.token_bodies.push(body);
        recorded.token_auth.push(auth_header(&headers));
    }
    if !state.behaviour.token_status.is_success() {
        return (
            state.behaviour.token_status,
            Json(json!({"error": "invalid_client", "error_description": "bad credentials"})),
        )
            .into_response();
    }
    Json(json!({
        "access_token": format!("token-{n}"),
        "token_type": "bearer",
        "expires_in": state.behaviour.expires_in,
        "sub": "client",
    }))
    .into_response()
}

async fn token_index(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.index_requests.fetch_add(1, Ordering::SeqCst);
    {
        let mut recorded = state.recorded.lock().unwrap();
        recorded.index_auth.push(auth_header(&headers));
        recorded.index_queries.push(query);
    }
    if !state.behaviour.index_status.is_success() {
        return (state.behaviour.index_status, "upstream unavailable").into_response();
    }
    Json(json!({
        "_links": {"self": {"href": "https://us.api.blizzard.com/data/wow/token/?namespace=dynamic-us"}},
        "last_updated_timestamp": 1_760_716_800_000u64,
        "price": state.behaviour.price,
    }))
    .into_response()
}

impl MockBattleNet {
    pub async fn start(behaviour: MockBehaviour) -> Self {
        let token_requests = Arc::new(AtomicUsize::new(0));
        let index_requests = Arc::new(AtomicUsize::new(0));
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let state = MockState {
            behaviour,
            token_requests: token_requests.clone(),
            index_requests: index_requests.clone(),
            recorded: recorded.clone(),
        };
        let app = Router::new()
            .route("/token", post(token))
            .route("/data/wow/token/index", get(token_index))
            .with_state(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            addr,
            token_requests,
            index_requests,
            recorded,
        }
    }

    pub fn client(&self) -> BattleNetClient {
        let _ = pretty_env_logger::try_init();
        BattleNetClient::with_endpoints(
            "client",
            "secret",
            Endpoints {
                token_url: format!("http://{}/token", self.addr),
                api_base: format!("http://{}", self.addr),
            },
        )
        .unwrap()
    }

    pub fn token_requests(&self) -> usize {
        self.token_requests.load(Ordering::SeqCst)
    }

    pub fn index_requests(&self) -> usize {
        self.index_requests.load(Ordering::SeqCst)
    }

    pub fn recorded(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap()
    }
}
