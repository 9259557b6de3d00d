//! Per-kind queries for the presentation layer: "list all" and "get by id
//! with its references".
//!
//! Detail queries fetch the primary first and fail fast on it (a 404 comes
//! back as [`ApiError::NotFound`]). All reference fields are then resolved
//! concurrently and best-effort.

use std::sync::Arc;

use serde::Serialize;

use crate::client::CatalogClient;
use crate::config::CatalogConfig;
use crate::error::ApiError;
use crate::fetcher::ResourceFetcher;
use crate::resolver::Resolver;
use crate::sink::{FailureSink, TracingSink};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{Entity, Film, Location, Person, Species, Vehicle};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilmDetail {
    pub film: Film,
    pub people: Vec<Person>,
    pub species: Vec<Species>,
    pub locations: Vec<Location>,
    pub vehicles: Vec<Vehicle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonDetail {
    pub person: Person,
    pub films: Vec<Film>,
    pub species: Option<Species>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationDetail {
    pub location: Location,
    pub residents: Vec<Person>,
    pub films: Vec<Film>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeciesDetail {
    pub species: Species,
    pub people: Vec<Person>,
    pub films: Vec<Film>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleDetail {
    pub vehicle: Vehicle,
    pub pilot: Option<Person>,
    pub films: Vec<Film>,
}

/// Entry point for the presentation layer.
#[derive(Debug, Clone)]
pub struct Catalog {
    resolver: Resolver,
}

impl Catalog {
    /// A catalog talking to `config.base_url` over reqwest, reporting absorbed
    /// failures through `tracing`.
    pub fn new(config: &CatalogConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config.timeout(), &config.user_agent)?;
        Self::with_transport(config, Arc::new(transport), Arc::new(TracingSink))
    }

    pub fn with_transport(
        config: &CatalogConfig,
        transport: Arc<dyn Transport>,
        sink: Arc<dyn FailureSink>,
    ) -> Result<Self, ApiError> {
        let client = CatalogClient::new(&config.base_url)?;
        let fetcher = ResourceFetcher::new(client, transport);
        Ok(Self {
            resolver: Resolver::with_sink(fetcher, sink),
        })
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub async fn films(&self) -> Result<Vec<Film>, ApiError> {
        self.list().await
    }

    pub async fn people(&self) -> Result<Vec<Person>, ApiError> {
        self.list().await
    }

    pub async fn locations(&self) -> Result<Vec<Location>, ApiError> {
        self.list().await
    }

    pub async fn species(&self) -> Result<Vec<Species>, ApiError> {
        self.list().await
    }

    pub async fn vehicles(&self) -> Result<Vec<Vehicle>, ApiError> {
        self.list().await
    }

    pub async fn film(&self, id: &str) -> Result<FilmDetail, ApiError> {
        let film: Film = self.primary(id).await?;
        let r = &self.resolver;
        let (people, species, locations, vehicles) = futures::join!(
            r.resolve_many::<Person, _>("people", &film.people),
            r.resolve_many::<Species, _>("species", &film.species),
            r.resolve_many::<Location, _>("locations", &film.locations),
            r.resolve_many::<Vehicle, _>("vehicles", &film.vehicles),
        );
        Ok(FilmDetail {
            film,
            people,
            species,
            locations,
            vehicles,
        })
    }

    pub async fn person(&self, id: &str) -> Result<PersonDetail, ApiError> {
        let person: Person = self.primary(id).await?;
        let r = &self.resolver;
        let (films, species) = futures::join!(
            r.resolve_many::<Film, _>("films", &person.films),
            r.resolve_one::<Species>("species", person.species.as_deref()),
        );
        Ok(PersonDetail {
            person,
            films,
            species,
        })
    }

    pub async fn location(&self, id: &str) -> Result<LocationDetail, ApiError> {
        let location: Location = self.primary(id).await?;
        let r = &self.resolver;
        let (residents, films) = futures::join!(
            r.resolve_many::<Person, _>("residents", &location.residents),
            r.resolve_many::<Film, _>("films", &location.films),
        );
        Ok(LocationDetail {
            location,
            residents,
            films,
        })
    }

    pub async fn species_detail(&self, id: &str) -> Result<SpeciesDetail, ApiError> {
        let species: Species = self.primary(id).await?;
        let r = &self.resolver;
        let (people, films) = futures::join!(
            r.resolve_many::<Person, _>("people", &species.people),
            r.resolve_many::<Film, _>("films", &species.films),
        );
        Ok(SpeciesDetail {
            species,
            people,
            films,
        })
    }

    pub async fn vehicle(&self, id: &str) -> Result<VehicleDetail, ApiError> {
        let vehicle: Vehicle = self.primary(id).await?;
        let r = &self.resolver;
        let (pilot, films) = futures::join!(
            r.resolve_one::<Person>("pilot", vehicle.pilot.as_deref()),
            r.resolve_many::<Film, _>("films", &vehicle.films),
        );
        Ok(VehicleDetail {
            vehicle,
            pilot,
            films,
        })
    }

    async fn list<T: Entity>(&self) -> Result<Vec<T>, ApiError> {
        self.resolver.fetcher().fetch_collection().await
    }

    async fn primary<T: Entity>(&self, id: &str) -> Result<T, ApiError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ApiError::Precondition(format!("empty {} id", T::KIND)));
        }
        self.resolver.fetcher().fetch_by_id(id).await
    }
}

/// Case-insensitive substring match on the display label. A blank query
/// keeps everything.
pub fn filter_by_label<'a, T: Entity>(items: &'a [T], query: &str) -> Vec<&'a T> {
    let needle = query.trim().to_lowercase();
    items
        .iter()
        .filter(|item| needle.is_empty() || item.label().to_lowercase().contains(&needle))
        .collect()
}
