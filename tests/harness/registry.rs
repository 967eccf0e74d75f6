// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Local fake of the registry document endpoint.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Router,
};
use registry_client::Config;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

pub const CREATE_PATH: &str = "/api/v3/lk/documents/create";
pub const ACCEPTED_BODY: &str = r#"{"value":"6e2b1c0a-4f3d-4b8e-9a51-0d1f2a3b4c5d"}"#;

/// A request as seen by the fake registry.
#[derive(Debug, Clone)]
pub struct Received {
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// How the fake registry answers.
#[derive(Debug, Clone)]
pub struct Behaviour {
    pub status: StatusCode,
    pub body: String,
    pub delay: Duration,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            body: ACCEPTED_BODY.to_string(),
            delay: Duration::ZERO,
        }
    }
}

struct RegistryState {
    behaviour: Behaviour,
    received: Mutex<Vec<Received>>,
}

/// Handle to a running fake registry.
pub struct FakeRegistry {
    addr: SocketAddr,
    state: Arc<RegistryState>,
}

impl FakeRegistry {
    pub async fn start(behaviour: Behaviour) -> Self {
        let state = Arc::new(RegistryState {
            behaviour,
            received: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route(CREATE_PATH, post(create_document))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api/v3", self.addr)
    }

    /// Client config pointing at this registry.
    pub fn config(&self, capacity: u32) -> Config {
        let mut config = Config::default();
        config.registry.base_url = self.base_url();
        config.rate_limit.capacity = capacity;
        config.rate_limit.units = 60;
        config
    }

    pub fn received(&self) -> Vec<Received> {
        self.state.received.lock().unwrap().clone()
    }
}

async fn create_document(
    State(state): State<Arc<RegistryState>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.received.lock().unwrap().push(Received {
        content_type,
        body: body.to_vec(),
    });

    if !state.behaviour.delay.is_zero() {
        tokio::time::sleep(state.behaviour.delay).await;
    }
    (state.behaviour.status, state.behaviour.body.clone())
}
