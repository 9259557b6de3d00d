//! Resource Fetcher: one logical retrieval, decoded or classified.
//!
//! # Design
//! `ResourceFetcher` pairs the network-free [`CatalogClient`] with a
//! [`Transport`]. It carries no mutable state, so one instance can serve any
//! number of concurrent fetches.

use std::sync::Arc;

use tracing::debug;

use crate::client::CatalogClient;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::transport::Transport;
use crate::types::{AnyEntity, Entity, EntityKind, Film, Location, Person, Species, Vehicle};

#[derive(Clone)]
pub struct ResourceFetcher {
    client: CatalogClient,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ResourceFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceFetcher")
            .field("base_url", &self.client.base_url().as_str())
            .finish_non_exhaustive()
    }
}

impl ResourceFetcher {
    pub fn new(client: CatalogClient, transport: Arc<dyn Transport>) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &CatalogClient {
        &self.client
    }

    /// Fetch one record by absolute URL. Off-origin URLs fail with
    /// `InvalidOrigin` and never reach the transport.
    pub async fn fetch_resource<T: Entity>(&self, url: &str) -> Result<T, ApiError> {
        let request = self.client.build_resource(url)?;
        let response = self.execute(request).await?;
        self.client.parse_resource(response)
    }

    /// Fetch a record of kind `T` by identifier.
    pub async fn fetch_by_id<T: Entity>(&self, id: &str) -> Result<T, ApiError> {
        let request = self.client.build_get(T::KIND, id);
        let response = self.execute(request).await?;
        self.client.parse_resource(response)
    }

    /// Fetch the full collection for kind `T`. No pagination: the upstream
    /// returns everything in one response.
    pub async fn fetch_collection<T: Entity>(&self) -> Result<Vec<T>, ApiError> {
        let request = self.client.build_list(T::KIND);
        let response = self.execute(request).await?;
        self.client.parse_collection(response)
    }

    /// Fetch a record whose kind is only known at runtime.
    pub async fn fetch_any(&self, kind: EntityKind, url: &str) -> Result<AnyEntity, ApiError> {
        match kind {
            EntityKind::Film => self.fetch_resource::<Film>(url).await.map(AnyEntity::Film),
            EntityKind::Person => self.fetch_resource::<Person>(url).await.map(AnyEntity::Person),
            EntityKind::Location => self
                .fetch_resource::<Location>(url)
                .await
                .map(AnyEntity::Location),
            EntityKind::Species => self
                .fetch_resource::<Species>(url)
                .await
                .map(AnyEntity::Species),
            EntityKind::Vehicle => self
                .fetch_resource::<Vehicle>(url)
                .await
                .map(AnyEntity::Vehicle),
        }
    }

    async fn execute(&self, request: HttpRequest) -> Result<crate::http::HttpResponse, ApiError> {
        let url = request.url.to_string();
        let response = self.transport.execute(request).await;
        match &response {
            Ok(r) => debug!(%url, status = r.status, "fetched"),
            Err(e) => debug!(%url, error = %e, "fetch failed"),
        }
        response
    }
}
