//! In-memory stand-ins for the upstream seams, shared by unit tests.

use crate::{
    error::{ImageGenError, Result},
    models::FetchedImage,
    upstream::traits::{CompletionApi, ImageFetcher},
};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

pub enum MockReply {
    Json(Value),
    Status(u16, String),
    Unreachable,
}

pub struct MockCompletion {
    reply: MockReply,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockCompletion {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionApi for MockCompletion {
    async fn complete(&self, prompt: &str) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        match &self.reply {
            MockReply::Json(value) => Ok(value.clone()),
            MockReply::Status(status, body) => Err(ImageGenError::Upstream {
                status: Some(*status),
                body: body.clone(),
            }),
            MockReply::Unreachable => Err(ImageGenError::Upstream {
                status: None,
                body: "connection refused".into(),
            }),
        }
    }
}

pub struct MockFetcher {
    pub status: u16,
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub broken: bool,
}

impl MockFetcher {
    pub fn serving(bytes: &[u8], content_type: Option<&str>) -> Self {
        Self {
            status: 200,
            bytes: bytes.to_vec(),
            content_type: content_type.map(String::from),
            broken: false,
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            status,
            bytes: Vec::new(),
            content_type: None,
            broken: false,
        }
    }

    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::failing(200)
        }
    }
}

#[async_trait]
impl ImageFetcher for MockFetcher {
    async fn fetch(&self, _url: &str) -> Result<FetchedImage> {
        if self.broken {
            return Err(ImageGenError::Transport("connection reset".into()));
        }
        if !(200..300).contains(&self.status) {
            return Err(ImageGenError::FetchFailed(self.status));
        }
        Ok(FetchedImage {
            bytes: self.bytes.clone(),
            content_type: self.content_type.clone(),
        })
    }
}

/// What a [`StubServer`] saw on one request.
#[cfg(feature = "server")]
#[derive(Debug, Clone)]
pub struct Received {
    pub method: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

#[cfg(feature = "server")]
impl Received {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A real HTTP listener on a loopback port that answers every request with
/// one canned reply and records what it received.
#[cfg(feature = "server")]
pub struct StubServer {
    pub base_url: String,
    received: std::sync::Arc<Mutex<Vec<Received>>>,
}

#[cfg(feature = "server")]
impl StubServer {
    /// Must be called from inside an actix system, e.g. `#[actix_web::test]`.
    pub fn start(status: u16, content_type: &'static str, reply: &'static [u8]) -> Self {
        use actix_web::{http::StatusCode, web, App, HttpRequest, HttpResponse, HttpServer};

        let received = std::sync::Arc::new(Mutex::new(Vec::new()));
        let captured = received.clone();

        let server = HttpServer::new(move || {
            let captured = captured.clone();
            App::new().default_service(web::to(move |req: HttpRequest, body: web::Bytes| {
                let captured = captured.clone();
                async move {
                    let headers = req
                        .headers()
                        .iter()
                        .filter_map(|(key, value)| {
                            Some((key.as_str().to_string(), value.to_str().ok()?.to_string()))
                        })
                        .collect();
                    captured.lock().unwrap().push(Received {
                        method: req.method().to_string(),
                        headers,
                        body: body.to_vec(),
                    });
                    HttpResponse::build(StatusCode::from_u16(status).unwrap())
                        .content_type(content_type)
                        .body(reply)
                }
            }))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();

        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());

        Self {
            base_url: format!("http://{}", addr),
            received,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }
}

/// A loopback URL with nothing listening behind it.
pub fn closed_port_url(path: &str) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}{}", addr, path)
}
