//! In-crate stub transport for unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::client::CatalogClient;
use crate::error::ApiError;
use crate::fetcher::ResourceFetcher;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

pub const BASE: &str = "https://ghibliapi.vercel.app";

#[derive(Clone)]
enum Stub {
    Respond(HttpResponse, Duration),
    Fail(String),
}

/// Canned responses keyed by full URL. Unknown URLs answer 404. Every
/// executed request is logged.
#[derive(Default)]
pub struct StubTransport {
    stubs: Mutex<HashMap<String, Stub>>,
    calls: Mutex<Vec<String>>,
}

impl StubTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, url: &str, status: u16, body: &str) -> &Self {
        self.respond_after(url, status, body, Duration::ZERO)
    }

    /// Respond after `delay`, to make completion order differ from request
    /// order.
    pub fn respond_after(&self, url: &str, status: u16, body: &str, delay: Duration) -> &Self {
        let mut response = HttpResponse::new(status, body);
        response.status_text = match status {
            200 => "OK",
            404 => "Not Found",
            500 => "Internal Server Error",
            _ => "",
        }
        .to_string();
        self.stubs
            .lock()
            .unwrap()
            .insert(url.to_string(), Stub::Respond(response, delay));
        self
    }

    pub fn fail(&self, url: &str, message: &str) -> &Self {
        self.stubs
            .lock()
            .unwrap()
            .insert(url.to_string(), Stub::Fail(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.url.to_string();
        self.calls.lock().unwrap().push(url.clone());
        let stub = self.stubs.lock().unwrap().get(&url).cloned();
        match stub {
            Some(Stub::Respond(response, delay)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(response)
            }
            Some(Stub::Fail(message)) => Err(ApiError::Transport(message)),
            None => Ok(HttpResponse::new(404, "")),
        }
    }
}

pub fn fetcher(transport: Arc<StubTransport>) -> ResourceFetcher {
    ResourceFetcher::new(CatalogClient::new(BASE).unwrap(), transport)
}

pub fn url(kind: &str, id: &str) -> String {
    format!("{BASE}/{kind}/{id}")
}

pub fn film_json(id: &str, title: &str) -> String {
    serde_json::json!({
        "id": id,
        "title": title,
        "url": url("films", id),
    })
    .to_string()
}

pub fn person_json(id: &str, name: &str) -> String {
    serde_json::json!({
        "id": id,
        "name": name,
        "url": url("people", id),
    })
    .to_string()
}

pub fn species_json(id: &str, name: &str) -> String {
    serde_json::json!({
        "id": id,
        "name": name,
        "url": url("species", id),
    })
    .to_string()
}
