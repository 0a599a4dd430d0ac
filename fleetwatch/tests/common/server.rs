//! In-process stand-in for the delivery backend and its push server.

use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

pub const TOKEN: &str = "test-token";

#[derive(Debug)]
struct ServerState {
    drivers: Mutex<Vec<Value>>,
    pushes: broadcast::Sender<(String, String)>,
    requests: AtomicUsize,
}

/// Running fixture server; dropped with the test runtime.
#[derive(Debug, Clone)]
pub struct TestServer {
    pub base_url: String,
    state: Arc<ServerState>,
}

impl TestServer {
    pub async fn start(drivers: Value) -> Self {
        let drivers = match drivers {
            Value::Array(items) => items,
            other => panic!("drivers fixture must be an array, got {other}"),
        };
        let (pushes, _) = broadcast::channel(64);
        let state = Arc::new(ServerState {
            drivers: Mutex::new(drivers),
            pushes,
            requests: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route("/delivery", get(list_drivers).post(create_driver))
            .route("/delivery/{id}", put(update_driver).delete(delete_driver))
            .route("/auth/send-otp", post(send_otp))
            .route("/auth/verify-otp", post(verify_otp))
            .route("/events", get(events))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fixture server");
        let addr = listener.local_addr().expect("fixture address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fixture server");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn push_url(&self) -> String {
        format!("{}/events", self.base_url)
    }

    /// Requests that reached a handler, push stream included.
    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    pub fn drivers(&self) -> Vec<Value> {
        self.state.drivers.lock().unwrap().clone()
    }

    /// Wait until a push client is connected so published events are not
    /// lost to an empty broadcast channel.
    pub async fn wait_for_subscriber(&self) {
        for _ in 0..500 {
            if self.state.pushes.receiver_count() > 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("no push subscriber connected");
    }

    pub fn push(&self, event: &str, data: impl Into<String>) {
        self.state
            .pushes
            .send((event.to_string(), data.into()))
            .expect("push subscriber connected");
    }

    pub fn push_position(&self, driver_id: &str, lat: f64, lng: f64) {
        self.push(
            "locationUpdated",
            json!({ "driverId": driver_id, "lat": lat, "lng": lng })
                .to_string(),
        );
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Not authorized" })),
    )
        .into_response()
}

async fn list_drivers(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(Value::Array(state.drivers.lock().unwrap().clone())).into_response()
}

async fn create_driver(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut drivers = state.drivers.lock().unwrap();
    body["_id"] = json!(format!("d{}", drivers.len() + 1));
    drivers.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update_driver(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut drivers = state.drivers.lock().unwrap();
    let Some(slot) = drivers.iter_mut().find(|d| d["_id"] == id.as_str())
    else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Driver not found" })),
        )
            .into_response();
    };
    body["_id"] = json!(id);
    *slot = body.clone();
    Json(body).into_response()
}

async fn delete_driver(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return unauthorized();
    }
    state
        .drivers
        .lock()
        .unwrap()
        .retain(|d| d["_id"] != id.as_str());
    Json(json!({ "message": "Driver deleted" })).into_response()
}

async fn send_otp(
    State(state): State<Arc<ServerState>>,
    Json(body): Json<Value>,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    if body["phone"].as_str().is_some_and(|p| p.starts_with('+')) {
        Json(json!({ "message": "OTP sent" })).into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Invalid phone" })),
        )
            .into_response()
    }
}

async fn verify_otp(
    State(state): State<Arc<ServerState>>,
    Json(body): Json<Value>,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    if body["code"] == "1234" {
        Json(json!({ "token": TOKEN })).into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Invalid code" })),
        )
            .into_response()
    }
}

async fn events(
    State(state): State<Arc<ServerState>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    state.requests.fetch_add(1, Ordering::SeqCst);
    let receiver = state.pushes.subscribe();
    let stream = BroadcastStream::new(receiver).filter_map(|item| {
        item.ok()
            .map(|(name, data)| Ok(Event::default().event(name).data(data)))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
