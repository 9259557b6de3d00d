//! Async client core for a read-only film catalog API.
//!
//! # Overview
//! Fetches films, people, locations, species and vehicles from a REST API,
//! then resolves the URL references between them concurrently, keeping
//! whatever resolves and dropping whatever does not.
//!
//! # Design
//! - `CatalogClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network; a `Transport` does the I/O.
//! - Every URL passes the `TrustedOrigin` check before a request exists.
//! - `ResourceFetcher` does one fetch and returns a record or a classified
//!   `ApiError`.
//! - `Resolver` fans related fetches out, joins them with `settle_all`, and
//!   reports absorbed failures to a `FailureSink`.
//! - `Catalog` exposes the list and detail queries the UI needs.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod origin;
pub mod resolver;
pub mod settle;
pub mod sink;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::{
    filter_by_label, Catalog, FilmDetail, LocationDetail, PersonDetail, SpeciesDetail,
    VehicleDetail,
};
pub use client::CatalogClient;
pub use config::CatalogConfig;
pub use error::ApiError;
pub use fetcher::ResourceFetcher;
pub use http::{HttpRequest, HttpResponse};
pub use origin::TrustedOrigin;
pub use resolver::{Aggregate, FieldSelector, Resolution, ResolvedField, Resolver};
pub use settle::{settle_all, Settled};
pub use sink::{CollectingSink, FailureSink, RelatedFailure, TracingSink};
pub use transport::{ReqwestTransport, Transport};
pub use types::{AnyEntity, Entity, EntityKind, Film, Location, Person, Reference, Species, Vehicle};
