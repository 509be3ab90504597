//! In-process THREDDS stand-in serving yearly catalogs.
//!
//! ```ignore
//! let server = MockThredds::new()
//!     .catalog(2015, catalog_xml(&paths))
//!     .start()
//!     .await;
//! let config = HycomConfig::for_server(&server.base_url());
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    http::{StatusCode, Uri},
    Extension, Router,
};
use tokio::net::TcpListener;

use crate::fixtures::catalog_path;

#[derive(Debug, Default)]
struct MockState {
    catalogs: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

/// Builder for a mock server. Unknown paths answer 404.
#[derive(Debug, Default)]
pub struct MockThredds {
    catalogs: HashMap<String, String>,
}

impl MockThredds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `xml` as the catalog of `year`.
    pub fn catalog(mut self, year: i32, xml: impl Into<String>) -> Self {
        self.catalogs.insert(catalog_path(year), xml.into());
        self
    }

    /// Bind to an ephemeral local port and serve in the background.
    pub async fn start(self) -> RunningMock {
        let state = Arc::new(MockState {
            catalogs: self.catalogs,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .fallback(handle)
            .layer(Extension(state.clone()));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock server");
        let addr = listener.local_addr().expect("mock server has no address");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        RunningMock { addr, state }
    }
}

/// A started mock server.
#[derive(Debug, Clone)]
pub struct RunningMock {
    addr: SocketAddr,
    state: Arc<MockState>,
}

impl RunningMock {
    /// `http://127.0.0.1:<port>`
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Every request received so far, as `path[?query]`.
    pub fn requests(&self) -> Vec<String> {
        self.state
            .requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests().len()
    }

    /// Number of requests whose path contains `fragment`.
    pub fn requests_matching(&self, fragment: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.contains(fragment))
            .count()
    }
}

async fn handle(Extension(state): Extension<Arc<MockState>>, uri: Uri) -> (StatusCode, String) {
    let path = uri.path().to_string();
    if let Ok(mut requests) = state.requests.lock() {
        requests.push(match uri.query() {
            Some(query) => format!("{}?{}", path, query),
            None => path.clone(),
        });
    }

    match state.catalogs.get(&path) {
        Some(xml) => (StatusCode::OK, xml.clone()),
        None => (
            StatusCode::NOT_FOUND,
            format!("<html><body><h1>404 Not Found</h1><p>{}</p></body></html>", path),
        ),
    }
}
