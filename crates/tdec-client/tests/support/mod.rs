//! In-process 3decision stand-in for client integration tests.
//!
//! Each `(method, path)` route holds a queue of scripted responses; the last
//! one repeats once the queue is down to it. Unscripted routes answer 404.
//! Every request is recorded so tests can count calls exactly.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use serde_json::Value;
use tdec_client::DecisionClient;
use tdec_config::TdecConfig;

pub const API_KEY: &str = "test-api-key";
pub const LOGIN: &str = "/auth/api/login";

#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub content_type: &'static str,
}

impl MockResponse {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: body.to_string().into_bytes(),
            content_type: "application/json",
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.as_bytes().to_vec(),
            content_type: "text/plain",
        }
    }

    pub fn bytes(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            body,
            content_type: "application/octet-stream",
        }
    }

    pub fn token(token: &str) -> Self {
        Self::json(200, serde_json::json!({ "access_token": token }))
    }
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// Lower-cased header names.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

type Routes = HashMap<(String, String), VecDeque<MockResponse>>;

pub struct MockServer {
    base_url: String,
    routes: Arc<Mutex<Routes>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl MockServer {
    pub fn start() -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("bind mock server");
        let port = server
            .server_addr()
            .to_ip()
            .map(|addr| addr.port())
            .expect("mock server has an IP address");

        let routes: Arc<Mutex<Routes>> = Arc::default();
        let requests: Arc<Mutex<Vec<Recorded>>> = Arc::default();
        let shutdown = Arc::new(AtomicBool::new(false));

        let handle = {
            let routes = Arc::clone(&routes);
            let requests = Arc::clone(&requests);
            let shutdown = Arc::clone(&shutdown);
            std::thread::spawn(move || {
                while !shutdown.load(Ordering::SeqCst) {
                    match server.recv_timeout(Duration::from_millis(20)) {
                        Ok(Some(request)) => serve(request, &routes, &requests),
                        Ok(None) => {}
                        Err(_) => break,
                    }
                }
            })
        };

        Self {
            base_url: format!("http://127.0.0.1:{port}"),
            routes,
            requests,
            shutdown,
            handle: Some(handle),
        }
    }

    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Queue `responses` for `method path`.
    pub fn on(
        &self,
        method: &str,
        path: &str,
        responses: impl IntoIterator<Item = MockResponse>,
    ) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .extend(responses);
        self
    }

    /// Script a successful login handing out `token`.
    pub fn allow_login(&self, token: &str) -> &Self {
        self.on("GET", LOGIN, [MockResponse::token(token)])
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests_to(method, path).len()
    }

    /// Settings pointing at this server, with 1 ms poll intervals.
    pub fn config(&self) -> TdecConfig {
        let mut config = TdecConfig::default();
        config.api.base_url = self.base_url.clone();
        config.api.api_key = API_KEY.to_string();
        config.polling.interval_ms = 1;
        config
    }

    pub fn client(&self) -> Arc<DecisionClient> {
        Arc::new(DecisionClient::new(self.config()).expect("build client"))
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn serve(
    mut request: tiny_http::Request,
    routes: &Mutex<Routes>,
    requests: &Mutex<Vec<Recorded>>,
) {
    let method = request.method().as_str().to_uppercase();
    let (path, query) = match request.url().split_once('?') {
        Some((path, query)) => (path.to_string(), Some(query.to_string())),
        None => (request.url().to_string(), None),
    };
    let headers = request
        .headers()
        .iter()
        .map(|h| {
            (
                h.field.as_str().as_str().to_ascii_lowercase(),
                h.value.as_str().to_string(),
            )
        })
        .collect();
    let mut body = String::new();
    let _ = request.as_reader().read_to_string(&mut body);

    requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        query,
        headers,
        body,
    });

    let scripted = {
        let mut routes = routes.lock().unwrap();
        routes.get_mut(&(method, path)).and_then(|queue| {
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        })
    };
    let reply = scripted.unwrap_or_else(|| MockResponse::text(404, "not found"));

    let content_type =
        tiny_http::Header::from_bytes("Content-Type", reply.content_type).expect("valid header");
    let response = tiny_http::Response::from_data(reply.body)
        .with_status_code(reply.status)
        .with_header(content_type);
    let _ = request.respond(response);
}

/// A ZIP archive holding `entries`.
pub fn zip_archive(entries: &[(&str, &str)]) -> Vec<u8> {
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("start zip entry");
        writer.write_all(content.as_bytes()).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}
