use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// In-process stand-in for the simulation service with canned replies.
pub struct StubServer {
    pub base_url: String,
    pub requests: Arc<Mutex<Vec<Value>>>,
    pub audit_ids: Arc<Mutex<Vec<String>>>,
}

#[derive(Clone)]
struct Canned {
    simulate: (u16, String),
    audit: (u16, String),
    requests: Arc<Mutex<Vec<Value>>>,
    audit_ids: Arc<Mutex<Vec<String>>>,
}

pub async fn spawn(simulate: (u16, &str), audit: (u16, &str)) -> StubServer {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let audit_ids = Arc::new(Mutex::new(Vec::new()));
    let canned = Canned {
        simulate: (simulate.0, simulate.1.to_string()),
        audit: (audit.0, audit.1.to_string()),
        requests: requests.clone(),
        audit_ids: audit_ids.clone(),
    };
    let app = Router::new()
        .route("/api/simulate", post(simulate_handler))
        .route("/api/simulations/:id", get(audit_handler))
        .with_state(canned);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubServer {
        base_url: format!("http://{}", addr),
        requests,
        audit_ids,
    }
}

/// A base URL nothing listens on.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

async fn simulate_handler(State(canned): State<Canned>, body: String) -> impl IntoResponse {
    let parsed = serde_json::from_str::<Value>(&body).unwrap_or(Value::Null);
    canned.requests.lock().unwrap().push(parsed);
    reply(&canned.simulate)
}

async fn audit_handler(State(canned): State<Canned>, Path(id): Path<String>) -> impl IntoResponse {
    canned.audit_ids.lock().unwrap().push(id);
    reply(&canned.audit)
}

fn reply((status, body): &(u16, String)) -> impl IntoResponse {
    let status = StatusCode::from_u16(*status).unwrap();
    (status, [(header::CONTENT_TYPE, "application/json")], body.clone())
}
