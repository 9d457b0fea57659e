// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::WorkflowContext;
use qwikride::SessionStore;
use qwikride_api::{
    ApiClient, Download, DownloadSink, HttpRequest, HttpResponse, Method, Transport,
    TransportError,
};
use qwikride_domain::{Role, SessionUser};
use qwikride_persistence::MemoryStorage;
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

type Queue = VecDeque<Result<HttpResponse, TransportError>>;

/// Transport answering by method and path.
///
/// Each route replays its queued responses in order; the last one is
/// repeated for any further calls. Unrouted requests fail at transport
/// level.
#[derive(Debug, Clone, Default)]
pub struct RoutedTransport {
    routes: Arc<Mutex<HashMap<(Method, String), Queue>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl RoutedTransport {
    pub fn route(&self, method: Method, path: &str, response: Result<HttpResponse, TransportError>) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
    }

    pub fn json(&self, method: Method, path: &str, status: u16, body: Value) {
        self.route(method, path, Ok(json_response(status, &body)));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests as `METHOD /path`, in the order they were sent.
    pub fn calls(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|request| format!("{} {}", request.method, request.path))
            .collect()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|request| request.method == method && request.path == path)
            .count()
    }

    pub fn last_to(&self, method: Method, path: &str) -> HttpRequest {
        self.requests()
            .into_iter()
            .filter(|request| request.method == method && request.path == path)
            .last()
            .unwrap()
    }
}

impl Transport for RoutedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let key: (Method, String) = (request.method, request.path.clone());
        self.requests.lock().unwrap().push(request);
        let mut routes = self.routes.lock().unwrap();
        match routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap(),
            None => Err(TransportError::Other(format!(
                "no route for {} {}",
                key.0, key.1
            ))),
        }
    }
}

pub fn json_response(status: u16, body: &Value) -> HttpResponse {
    HttpResponse {
        status,
        content_type: Some(String::from("application/json")),
        body: serde_json::to_vec(body).unwrap(),
    }
}

pub fn raw_response(status: u16, content_type: &str, body: &[u8]) -> HttpResponse {
    HttpResponse {
        status,
        content_type: Some(content_type.to_string()),
        body: body.to_vec(),
    }
}

pub fn request_body(request: &HttpRequest) -> Value {
    serde_json::from_str(request.body.as_deref().unwrap()).unwrap()
}

pub fn create_test_rider() -> SessionUser {
    SessionUser::new(
        7,
        String::from("rider7"),
        String::from("Rider Seven"),
        Role::Rider,
    )
}

pub fn create_test_operator() -> SessionUser {
    SessionUser::new(
        1,
        String::from("ops"),
        String::from("Operations"),
        Role::Operator,
    )
}

/// A context over `transport` with `user` signed in, or nobody.
pub fn create_context(
    transport: &RoutedTransport,
    user: Option<SessionUser>,
) -> WorkflowContext<RoutedTransport> {
    let session: SessionStore = SessionStore::new(MemoryStorage::new());
    session.hydrate();
    if let Some(user) = user {
        session.login(String::from("test-token"), user).unwrap();
    }
    WorkflowContext::new(
        Arc::new(session),
        Arc::new(ApiClient::new(transport.clone())),
    )
}

/// Sink keeping delivered downloads in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub delivered: Mutex<Vec<Download>>,
}

impl MemorySink {
    pub fn filenames(&self) -> Vec<String> {
        self.delivered
            .lock()
            .unwrap()
            .iter()
            .map(|download| download.filename.clone())
            .collect()
    }
}

impl DownloadSink for MemorySink {
    fn deliver(&self, download: &Download) -> io::Result<PathBuf> {
        self.delivered.lock().unwrap().push(download.clone());
        Ok(PathBuf::from(&download.filename))
    }
}

/// Sink that cannot write anything.
#[derive(Debug, Default)]
pub struct FailingSink;

impl DownloadSink for FailingSink {
    fn deliver(&self, _download: &Download) -> io::Result<PathBuf> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
    }
}

pub fn ledger_entry(id: i64, status: &str, total: f64) -> Value {
    json!({
        "ledgerEntryId": id,
        "planName": "Standard",
        "bikeId": "bike-1",
        "durationMinutes": 20,
        "distanceKm": 3.5,
        "total": total,
        "paymentStatus": status,
        "charges": [{ "code": "BASE_FEE", "amount": 1.0, "meta": {} }]
    })
}

pub fn trip_summary(total: f64) -> Value {
    json!({
        "bikeId": "bike-1",
        "riderId": 7,
        "durationMinutes": 20,
        "distanceKm": 3.5,
        "total": total,
        "charges": [],
        "planName": "Standard"
    })
}

pub fn dispute_ticket(id: i64, ledger_entry_id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "riderId": 7,
        "ledgerEntryId": ledger_entry_id,
        "status": status,
        "reason": "Charged twice"
    })
}

pub fn pricing_plan(id: &str, name: &str) -> Value {
    json!({
        "planVersionId": id,
        "planName": name,
        "baseFee": 1.0,
        "perMinuteRate": 0.25,
        "exampleCosts": [{ "durationMinutes": 30, "ebike": false, "estimatedTotal": 8.5 }]
    })
}

pub fn station(id: i64, name: &str, capacity: u32, count: u32, status: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "capacity": capacity,
        "currentBikeCount": count,
        "status": status
    })
}

pub fn bike(id: &str, status: &str, station_id: i64) -> Value {
    json!({
        "id": id,
        "type": "STANDARD",
        "status": status,
        "stationId": station_id
    })
}
