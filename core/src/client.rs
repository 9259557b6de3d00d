//! Stateless request builder and response parser for the catalog API.
//!
//! # Design
//! `CatalogClient` holds only the base URL and the trusted origin derived
//! from it. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`. The
//! [`ResourceFetcher`](crate::fetcher::ResourceFetcher) runs the round-trip in
//! between, so everything here stays deterministic and network-free.

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::origin::TrustedOrigin;
use crate::types::EntityKind;

/// Synchronous, stateless client for the catalog API.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: Url,
    origin: TrustedOrigin,
}

impl CatalogClient {
    /// Validate `base_url` and derive the trusted origin from it.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let base_url = Url::parse(trimmed)
            .map_err(|e| ApiError::InvalidConfig(format!("invalid base URL {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidConfig(format!(
                "base URL cannot carry paths: {base_url}"
            )));
        }
        if base_url.query().is_some() || base_url.fragment().is_some() {
            return Err(ApiError::InvalidConfig(format!(
                "base URL must not carry a query or fragment: {base_url}"
            )));
        }
        let origin = TrustedOrigin::from_url(&base_url)?;
        Ok(Self { base_url, origin })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn origin(&self) -> &TrustedOrigin {
        &self.origin
    }

    pub fn build_list(&self, kind: EntityKind) -> HttpRequest {
        request(self.endpoint(&[kind.collection()]))
    }

    /// `id` is pushed as one percent-encoded segment, so it cannot escape the
    /// collection path.
    pub fn build_get(&self, kind: EntityKind, id: &str) -> HttpRequest {
        request(self.endpoint(&[kind.collection(), id]))
    }

    /// Build a request for an absolute reference URL. Fails with
    /// `InvalidOrigin` before anything is sent if the URL is off-origin.
    pub fn build_resource(&self, url: &str) -> Result<HttpRequest, ApiError> {
        let url = self.origin.check(url)?;
        Ok(request(url))
    }

    /// Parse a collection response. An empty body is a valid empty list.
    pub fn parse_collection<T: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<T>, ApiError> {
        check_status(&response)?;
        if response.body.trim().is_empty() {
            return Ok(Vec::new());
        }
        decode(&response.body)
    }

    /// Parse a single-resource response. An empty body is a decode failure.
    pub fn parse_resource<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        check_status(&response)?;
        if response.body.trim().is_empty() {
            return Err(ApiError::Decode("empty response body".to_string()));
        }
        decode(&response.body)
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

fn request(url: Url) -> HttpRequest {
    HttpRequest {
        url,
        headers: vec![("accept".to_string(), "application/json".to_string())],
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        status_text: response.status_text.clone(),
    })
}
