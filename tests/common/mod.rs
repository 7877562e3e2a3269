// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use futures_util::future::BoxFuture;
use market_client::navigation::HistoryNavigator;
use market_client::services::{ApiRequest, RawResponse, Transport, TransportError};
use market_client::MarketClient;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

pub const TEST_BASE_URL: &str = "http://backend.test";

/// Canned reply for one path.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum Reply {
    Json(u16, Value),
    Text(u16, String),
    Empty(u16),
}

impl Reply {
    fn to_raw(&self) -> RawResponse {
        match self {
            Reply::Json(status, value) => RawResponse {
                status: *status,
                content_type: Some("application/json".to_string()),
                body: value.to_string().into_bytes(),
            },
            Reply::Text(status, text) => RawResponse {
                status: *status,
                content_type: Some("text/plain;charset=UTF-8".to_string()),
                body: text.clone().into_bytes(),
            },
            Reply::Empty(status) => RawResponse {
                status: *status,
                content_type: None,
                body: Vec::new(),
            },
        }
    }
}

/// Transport that answers from a path table and records every request.
///
/// Unrouted paths get an empty 404. With `set_offline(true)` every request
/// fails below HTTP, like an unreachable backend.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<String, Reply>>,
    requests: Mutex<Vec<ApiRequest>>,
    offline: AtomicBool,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

#[allow(dead_code)]
impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn route(&self, path: &str, reply: Reply) {
        self.routes.lock().insert(path.to_string(), reply);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Hold every later response until a permit is added to the returned
    /// semaphore, one permit per response.
    pub fn hold(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.gate.lock() = Some(gate.clone());
        gate
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }
}

impl Transport for FakeTransport {
    fn send<'a>(
        &'a self,
        _base_url: &'a str,
        request: &'a ApiRequest,
    ) -> BoxFuture<'a, Result<RawResponse, TransportError>> {
        self.requests.lock().push(request.clone());
        let result = if self.offline.load(Ordering::SeqCst) {
            Err(TransportError::Send("connection refused".to_string()))
        } else {
            Ok(self
                .routes
                .lock()
                .get(&request.path)
                .map(Reply::to_raw)
                .unwrap_or_else(|| Reply::Empty(404).to_raw()))
        };
        let gate = self.gate.lock().clone();
        Box::pin(async move {
            if let Some(gate) = gate {
                if let Ok(permit) = gate.acquire().await {
                    permit.forget();
                }
            }
            result
        })
    }
}

/// Client over a fresh fake transport, started on page `path`.
#[allow(dead_code)]
pub fn test_client(path: &str) -> (MarketClient, Arc<FakeTransport>, Arc<HistoryNavigator>) {
    let transport = FakeTransport::new();
    let navigator = Arc::new(HistoryNavigator::new(path));
    let client = MarketClient::with_transport(TEST_BASE_URL, transport.clone(), navigator.clone());
    (client, transport, navigator)
}

/// Market record as the backend sends it.
#[allow(dead_code)]
pub fn market_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "address": "Kojo Thompson Rd, Accra",
        "latitude": 5.5502,
        "longitude": -0.2174,
        "openingTime": "06:00:00",
        "closingTime": "18:00:00",
        "isCovered": true,
        "specialties": "Produce, Fabric",
        "crowdLevelMorning": "HIGH",
        "crowdLevelAfternoon": "MEDIUM",
        "crowdLevelEvening": "LOW",
        "photos": []
    })
}

/// Identity record as the backend sends it.
#[allow(dead_code)]
pub fn user_json(name: &str, email: &str) -> Value {
    json!({
        "id": 7,
        "name": name,
        "email": email,
        "type": "local"
    })
}
