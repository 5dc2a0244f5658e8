// Common test utilities

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use kelifax_client::{ClientConfig, KelifaxClient};
use serde_json::Value;
use tokio::net::TcpListener;

/// A request the stub API received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Value,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Default)]
struct StubState {
    routes: Mutex<HashMap<(Method, String), (StatusCode, String)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// In-process HTTP server standing in for the Kelifax API.
///
/// Routes are registered by method and path; anything unregistered answers 404.
pub struct StubApi {
    pub base_url: String,
    state: Arc<StubState>,
}

impl StubApi {
    pub async fn start() -> Self {
        let state = Arc::new(StubState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/dev", addr),
            state,
        }
    }

    /// Respond to `method path` with `status` and a JSON body.
    pub fn route(&self, method: Method, path: &str, status: StatusCode, body: Value) -> &Self {
        self.route_raw(method, path, status, body.to_string())
    }

    /// Respond with a raw (possibly non-JSON) body.
    pub fn route_raw(
        &self,
        method: Method,
        path: &str,
        status: StatusCode,
        body: impl Into<String>,
    ) -> &Self {
        self.state
            .routes
            .lock()
            .unwrap()
            .insert((method, format!("/dev{}", path)), (status, body.into()));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("no request recorded")
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(&self.base_url)
    }

    pub fn client(&self) -> KelifaxClient {
        KelifaxClient::new(self.config()).unwrap()
    }
}

async fn handle(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    });

    let route = state.routes.lock().unwrap().get(&(method, path)).cloned();
    match route {
        Some((status, body)) => (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "no stub route").into_response(),
    }
}

/// An address nothing is listening on.
pub async fn dead_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
