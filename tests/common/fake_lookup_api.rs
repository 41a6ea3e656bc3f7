//! Fake suggestion service for HTTP harnesses.
//!
//! Spins up a minimal `axum` server on a random TCP port bound to 127.0.0.1.
//! Serves `GET /sick?q=` from a table of canned bodies, can be switched to
//! answer every request with an error status, and records the decoded `q`
//! of each request.
//!
//! ```rust,ignore
//! let api = FakeLookupApi::start().await.unwrap();
//! api.set_body("암", CANCER_JSON).await;
//! let lookup = HttpLookup::new(api.endpoint()).unwrap();
//! ```

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[derive(Default)]
struct ApiState {
    bodies: HashMap<String, String>,
    status: Option<(StatusCode, String)>,
    requests: Vec<String>,
}

pub struct FakeLookupApi {
    addr: SocketAddr,
    state: Arc<Mutex<ApiState>>,
}

impl FakeLookupApi {
    /// Start the server on a random port. Returns once it is listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(ApiState::default()));

        let app = Router::new()
            .route("/sick", get(sick))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// Lookup endpoint (e.g. `http://127.0.0.1:PORT/sick`).
    pub fn endpoint(&self) -> String {
        format!("http://{}/sick", self.addr)
    }

    /// Serve `body` verbatim for query `q`.
    pub async fn set_body(&self, q: &str, body: &str) {
        self.state
            .lock()
            .await
            .bodies
            .insert(q.to_string(), body.to_string());
    }

    /// Answer every request with `status` and `body` until cleared.
    pub async fn fail_with(&self, status: u16, body: &str) {
        let code = StatusCode::from_u16(status).unwrap();
        self.state.lock().await.status = Some((code, body.to_string()));
    }

    pub async fn requests(&self) -> Vec<String> {
        self.state.lock().await.requests.clone()
    }
}

async fn sick(
    State(state): State<Arc<Mutex<ApiState>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let q = params.get("q").cloned().unwrap_or_default();
    let mut state = state.lock().await;
    state.requests.push(q.clone());

    if let Some((status, body)) = &state.status {
        return (*status, body.clone()).into_response();
    }
    let body = state.bodies.get(&q).cloned().unwrap_or_else(|| "[]".to_string());
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}
