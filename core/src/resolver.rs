//! Relationship Resolver: turn a primary entity's reference URLs into
//! related entities.
//!
//! # Design
//! - The primary fetch fails fast; everything after it is best-effort.
//! - Every URL of every selected field is fetched concurrently and joined
//!   with [`settle_all`], so one slow or failing reference never holds back
//!   or cancels its siblings.
//! - Untrusted and empty URLs are dropped before any request is built.
//! - Failed fetches become omissions in the result and are reported to the
//!   injected [`FailureSink`]; the shape of the result never depends on the
//!   sink.

use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use tracing::debug;

use crate::error::ApiError;
use crate::fetcher::ResourceFetcher;
use crate::settle::settle_all;
use crate::sink::{FailureSink, RelatedFailure, TracingSink};
use crate::types::{AnyEntity, Entity, EntityKind, Reference};

/// Names a reference field to resolve and the kind it is expected to hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelector {
    pub field: String,
    pub kind: EntityKind,
}

impl FieldSelector {
    pub fn new(field: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }

    /// One selector per reference field `E` declares.
    pub fn all_for<E: Entity>() -> Vec<Self> {
        E::REFERENCES
            .iter()
            .map(|(field, kind)| Self::new(*field, *kind))
            .collect()
    }
}

/// What one reference field resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    One(Option<AnyEntity>),
    Many(Vec<AnyEntity>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub field: String,
    pub kind: EntityKind,
    pub value: Resolution,
}

/// A primary entity plus its best-effort-resolved relations, in selector
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate<E> {
    pub primary: E,
    pub fields: Vec<ResolvedField>,
}

impl<E> Aggregate<E> {
    pub fn field(&self, name: &str) -> Option<&ResolvedField> {
        self.fields.iter().find(|f| f.field == name)
    }

    /// Resolved entities of a field. Empty if the field was not selected.
    pub fn many(&self, name: &str) -> &[AnyEntity] {
        match self.field(name).map(|f| &f.value) {
            Some(Resolution::Many(entities)) => entities,
            Some(Resolution::One(Some(entity))) => std::slice::from_ref(entity),
            _ => &[],
        }
    }

    pub fn one(&self, name: &str) -> Option<&AnyEntity> {
        match self.field(name).map(|f| &f.value) {
            Some(Resolution::One(entity)) => entity.as_ref(),
            Some(Resolution::Many(entities)) => entities.first(),
            None => None,
        }
    }
}

/// Stateless fan-out/fan-in over a [`ResourceFetcher`].
#[derive(Clone)]
pub struct Resolver {
    fetcher: ResourceFetcher,
    sink: Arc<dyn FailureSink>,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("fetcher", &self.fetcher)
            .finish_non_exhaustive()
    }
}

impl Resolver {
    /// A resolver that reports failures through `tracing`.
    pub fn new(fetcher: ResourceFetcher) -> Self {
        Self::with_sink(fetcher, Arc::new(TracingSink))
    }

    pub fn with_sink(fetcher: ResourceFetcher, sink: Arc<dyn FailureSink>) -> Self {
        Self { fetcher, sink }
    }

    pub fn fetcher(&self) -> &ResourceFetcher {
        &self.fetcher
    }

    /// Resolve a list reference field into records of type `T`.
    ///
    /// Survivors keep the relative order of their URLs.
    pub async fn resolve_many<T, S>(&self, field: &str, urls: &[S]) -> Vec<T>
    where
        T: Entity,
        S: AsRef<str>,
    {
        let targets = self.trusted_targets(field, urls.iter().map(AsRef::as_ref));
        self.settle_targets(field, targets, |url| self.fetcher.fetch_resource::<T>(url))
            .await
    }

    /// Resolve a single optional reference. Absent, empty, untrusted or
    /// failed references all come back as `None`.
    pub async fn resolve_one<T: Entity>(&self, field: &str, url: Option<&str>) -> Option<T> {
        self.resolve_many::<T, &str>(field, url.as_slice())
            .await
            .into_iter()
            .next()
    }

    /// Resolve the selected reference fields of an entity already in hand.
    ///
    /// Fails only when the request itself is malformed: a primary without an
    /// identifier or with an off-origin self URL, or a selector that does not
    /// match a reference field of `E`. Related-fetch failures never fail the
    /// call.
    pub async fn resolve_references<E: Entity>(
        &self,
        entity: &E,
        selectors: &[FieldSelector],
    ) -> Result<Aggregate<E>, ApiError> {
        if entity.id().trim().is_empty() {
            return Err(ApiError::Precondition(format!(
                "{} has no identifier",
                E::KIND
            )));
        }
        if !self.fetcher.client().origin().is_trusted(entity.url()) {
            return Err(ApiError::Precondition(format!(
                "{} {} has an untrusted self URL {:?}",
                E::KIND,
                entity.id(),
                entity.url()
            )));
        }

        let mut plan = Vec::with_capacity(selectors.len());
        for selector in selectors {
            let reference = validate_selector(entity, selector)?;
            plan.push((selector, reference));
        }

        debug!(
            kind = %E::KIND,
            id = entity.id(),
            fields = plan.len(),
            "resolving references"
        );
        let fields = join_all(
            plan.into_iter()
                .map(|(selector, reference)| self.resolve_field(selector, reference)),
        )
        .await;

        Ok(Aggregate {
            primary: entity.clone(),
            fields,
        })
    }

    /// Resolve every reference field `E` declares.
    pub async fn resolve_all<E: Entity>(&self, entity: &E) -> Result<Aggregate<E>, ApiError> {
        self.resolve_references(entity, &FieldSelector::all_for::<E>())
            .await
    }

    /// Fetch the primary by id (fail-fast), then resolve the selected fields
    /// (best-effort).
    pub async fn fetch_aggregate<E: Entity>(
        &self,
        id: &str,
        selectors: &[FieldSelector],
    ) -> Result<Aggregate<E>, ApiError> {
        let primary = self.fetcher.fetch_by_id::<E>(id).await?;
        self.resolve_references(&primary, selectors).await
    }

    async fn resolve_field(
        &self,
        selector: &FieldSelector,
        reference: Reference<'_>,
    ) -> ResolvedField {
        let field = selector.field.as_str();
        let kind = selector.kind;
        let value = match reference {
            Reference::Many(urls) => {
                let targets = self.trusted_targets(field, urls.iter().map(String::as_str));
                let entities = self
                    .settle_targets(field, targets, |url| self.fetcher.fetch_any(kind, url))
                    .await;
                Resolution::Many(entities)
            }
            Reference::One(url) => {
                let targets = self.trusted_targets(field, url.into_iter());
                let entity = self
                    .settle_targets(field, targets, |url| self.fetcher.fetch_any(kind, url))
                    .await
                    .into_iter()
                    .next();
                Resolution::One(entity)
            }
        };
        ResolvedField {
            field: selector.field.clone(),
            kind,
            value,
        }
    }

    /// Keep only URLs that may be fetched. Nothing is requested for the rest.
    fn trusted_targets<'u>(&self, field: &str, urls: impl Iterator<Item = &'u str>) -> Vec<&'u str> {
        let origin = self.fetcher.client().origin();
        urls.filter(|url| {
            if url.trim().is_empty() {
                return false;
            }
            let trusted = origin.is_trusted(url);
            if !trusted {
                debug!(field, url, "dropping untrusted reference");
            }
            trusted
        })
        .collect()
    }

    async fn settle_targets<'a, T, F, Fut>(&self, field: &str, targets: Vec<&'a str>, fetch: F) -> Vec<T>
    where
        F: Fn(&'a str) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let settled = settle_all(targets.iter().copied().map(&fetch)).await;
        for (index, error) in settled.rejected {
            self.sink.record(&RelatedFailure {
                field: field.to_string(),
                url: targets[index].to_string(),
                error,
            });
        }
        settled.fulfilled
    }
}

fn validate_selector<'e, E: Entity>(
    entity: &'e E,
    selector: &FieldSelector,
) -> Result<Reference<'e>, ApiError> {
    let declared = E::reference_kind(&selector.field).ok_or_else(|| {
        ApiError::Precondition(format!(
            "{} has no reference field `{}`",
            E::KIND,
            selector.field
        ))
    })?;
    if declared != selector.kind {
        return Err(ApiError::Precondition(format!(
            "{}.{} references {declared} records, not {}",
            E::KIND,
            selector.field,
            selector.kind
        )));
    }
    entity.reference(&selector.field).ok_or_else(|| {
        ApiError::Precondition(format!(
            "{} has no reference field `{}`",
            E::KIND,
            selector.field
        ))
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::sink::CollectingSink;
    use crate::test_support::{self, film_json, person_json, species_json, url, StubTransport};
    use crate::types::{Film, Person, Vehicle};

    fn resolver(transport: Arc<StubTransport>) -> (Resolver, Arc<CollectingSink>) {
        let sink = Arc::new(CollectingSink::new());
        let resolver = Resolver::with_sink(test_support::fetcher(transport), sink.clone());
        (resolver, sink)
    }

    fn person(films: Vec<String>, species: Option<String>) -> Person {
        Person {
            id: "p1".to_string(),
            name: "Pazu".to_string(),
            gender: None,
            age: None,
            eye_color: None,
            hair_color: None,
            films,
            species,
            url: url("people", "p1"),
        }
    }

    fn vehicle(pilot: Option<String>) -> Vehicle {
        Vehicle {
            id: "v1".to_string(),
            name: "Air Destroyer Goliath".to_string(),
            description: None,
            vehicle_class: None,
            length: None,
            pilot,
            films: Vec::new(),
            url: url("vehicles", "v1"),
        }
    }

    #[tokio::test]
    async fn failed_fetch_is_omitted_and_order_kept() {
        let transport = StubTransport::new();
        transport
            .respond(&url("films", "1"), 200, &film_json("1", "X"))
            .respond(&url("films", "2"), 500, "boom")
            .respond(&url("films", "3"), 200, &film_json("3", "Z"));
        let (resolver, sink) = resolver(transport);

        let urls = vec![url("films", "1"), url("films", "2"), url("films", "3")];
        let films: Vec<Film> = resolver.resolve_many("films", &urls).await;

        let ids: Vec<&str> = films.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
        assert_eq!(films[1].title, "Z");

        let failures = sink.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, "films");
        assert_eq!(failures[0].url, url("films", "2"));
        assert_eq!(failures[0].error.status(), Some(500));
    }

    #[tokio::test]
    async fn order_follows_urls_not_completion() {
        let transport = StubTransport::new();
        transport
            .respond_after(&url("films", "a"), 200, &film_json("a", "A"), Duration::from_millis(40))
            .respond_after(&url("films", "b"), 200, &film_json("b", "B"), Duration::from_millis(20))
            .respond(&url("films", "c"), 200, &film_json("c", "C"));
        let (resolver, _) = resolver(transport);

        let urls = [url("films", "a"), url("films", "b"), url("films", "c")];
        let films: Vec<Film> = resolver.resolve_many("films", &urls).await;
        let titles: Vec<&str> = films.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(titles, ["A", "B", "C"]);
    }

    #[tokio::test]
    async fn every_field_and_url_is_fetched_concurrently() {
        let delay = Duration::from_millis(200);
        let transport = StubTransport::new();
        let films: Vec<String> = (1..=5).map(|i| url("films", &i.to_string())).collect();
        for (i, film) in films.iter().enumerate() {
            transport.respond_after(film, 200, &film_json(&(i + 1).to_string(), "F"), delay);
        }
        transport.respond_after(&url("species", "h"), 200, &species_json("h", "Human"), delay);
        let (resolver, _) = resolver(transport.clone());

        let primary = person(films, Some(url("species", "h")));
        let started = std::time::Instant::now();
        let aggregate = resolver.resolve_all(&primary).await.unwrap();
        let elapsed = started.elapsed();

        assert_eq!(aggregate.many("films").len(), 5);
        assert_eq!(aggregate.one("species").unwrap().label(), "Human");
        assert_eq!(transport.call_count(), 6);
        // Six 200ms fetches back to back would take 1.2s.
        assert!(elapsed < Duration::from_millis(600), "took {elapsed:?}");
    }

    #[tokio::test]
    async fn untrusted_urls_are_never_requested() {
        let transport = StubTransport::new();
        transport
            .respond(&url("films", "1"), 200, &film_json("1", "X"))
            .respond(&url("films", "2"), 200, &film_json("2", "Y"));
        let (resolver, sink) = resolver(transport.clone());

        let urls = vec![
            "https://evil.example/films/1".to_string(),
            url("films", "1"),
            "TODO".to_string(),
            String::new(),
            "https://ghibliapi.vercel.app.evil.example/films/2".to_string(),
            url("films", "2"),
        ];
        let films: Vec<Film> = resolver.resolve_many("films", &urls).await;

        assert_eq!(films.len(), 2);
        assert_eq!(transport.calls(), vec![url("films", "1"), url("films", "2")]);
        assert!(sink.failures().is_empty());
    }

    #[tokio::test]
    async fn empty_list_resolves_to_empty() {
        let transport = StubTransport::new();
        let (resolver, _) = resolver(transport.clone());

        let films: Vec<Film> = resolver.resolve_many::<Film, String>("films", &[]).await;
        assert!(films.is_empty());
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn every_fetch_failing_is_still_not_an_error() {
        let transport = StubTransport::new();
        transport
            .fail(&url("films", "1"), "connection refused")
            .respond(&url("films", "2"), 200, "{not json");
        let (resolver, sink) = resolver(transport);

        let films: Vec<Film> = resolver
            .resolve_many("films", &[url("films", "1"), url("films", "2"), url("films", "3")])
            .await;
        assert!(films.is_empty());

        let errors: Vec<ApiError> = sink.failures().into_iter().map(|f| f.error).collect();
        assert!(matches!(errors[0], ApiError::Transport(_)));
        assert!(matches!(errors[1], ApiError::Decode(_)));
        assert!(matches!(errors[2], ApiError::NotFound));
    }

    #[tokio::test]
    async fn empty_single_reference_is_none() {
        let transport = StubTransport::new();
        let (resolver, _) = resolver(transport.clone());

        let pilot: Option<Person> = resolver.resolve_one("pilot", None).await;
        assert!(pilot.is_none());
        let pilot: Option<Person> = resolver.resolve_one("pilot", Some("")).await;
        assert!(pilot.is_none());
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn single_reference_resolves() {
        let transport = StubTransport::new();
        transport.respond(&url("people", "muska"), 200, &person_json("muska", "Colonel Muska"));
        let (resolver, _) = resolver(transport);

        let aggregate = resolver
            .resolve_references(
                &vehicle(Some(url("people", "muska"))),
                &[FieldSelector::new("pilot", EntityKind::Person)],
            )
            .await
            .unwrap();
        let pilot = aggregate.one("pilot").and_then(AnyEntity::as_person).unwrap();
        assert_eq!(pilot.name, "Colonel Muska");
    }

    #[tokio::test]
    async fn absent_pilot_resolves_to_none_in_aggregate() {
        let transport = StubTransport::new();
        let (resolver, _) = resolver(transport.clone());

        let aggregate = resolver.resolve_all(&vehicle(None)).await.unwrap();
        assert_eq!(
            aggregate.field("pilot").unwrap().value,
            Resolution::One(None)
        );
        assert!(aggregate.many("films").is_empty());
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn resolve_all_covers_every_declared_field() {
        let transport = StubTransport::new();
        transport
            .respond(&url("films", "1"), 200, &film_json("1", "Castle in the Sky"))
            .respond(&url("species", "human"), 200, &species_json("human", "Human"));
        let (resolver, sink) = resolver(transport);

        let primary = person(
            vec![url("films", "1"), url("films", "gone")],
            Some(url("species", "human")),
        );
        let aggregate = resolver.resolve_all(&primary).await.unwrap();

        assert_eq!(aggregate.primary, primary);
        let fields: Vec<&str> = aggregate.fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, ["films", "species"]);
        assert_eq!(aggregate.many("films").len(), 1);
        assert_eq!(aggregate.many("films")[0].label(), "Castle in the Sky");
        assert_eq!(aggregate.one("species").unwrap().kind(), EntityKind::Species);
        assert_eq!(sink.failures().len(), 1);
        assert!(sink.failures()[0].error.is_not_found());
    }

    #[tokio::test]
    async fn resolving_twice_is_idempotent() {
        let transport = StubTransport::new();
        transport
            .respond(&url("films", "1"), 200, &film_json("1", "X"))
            .respond(&url("films", "2"), 500, "");
        let (resolver, _) = resolver(transport);

        let primary = person(vec![url("films", "1"), url("films", "2")], None);
        let first = resolver.resolve_all(&primary).await.unwrap();
        let second = resolver.resolve_all(&primary).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn missing_identifier_is_a_precondition_error() {
        let transport = StubTransport::new();
        let (resolver, _) = resolver(transport.clone());

        let mut primary = person(vec![url("films", "1")], None);
        primary.id = String::new();
        let err = resolver.resolve_all(&primary).await.unwrap_err();
        assert!(matches!(err, ApiError::Precondition(_)));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn untrusted_primary_is_a_precondition_error() {
        let transport = StubTransport::new();
        let (resolver, _) = resolver(transport);

        let mut primary = person(Vec::new(), None);
        primary.url = "https://evil.example/people/p1".to_string();
        let err = resolver.resolve_all(&primary).await.unwrap_err();
        assert!(matches!(err, ApiError::Precondition(_)));
    }

    #[tokio::test]
    async fn bad_selectors_are_precondition_errors() {
        let transport = StubTransport::new();
        let (resolver, _) = resolver(transport.clone());
        let primary = person(vec![url("films", "1")], None);

        let err = resolver
            .resolve_references(&primary, &[FieldSelector::new("pilot", EntityKind::Person)])
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Precondition(_)));

        let err = resolver
            .resolve_references(&primary, &[FieldSelector::new("films", EntityKind::Vehicle)])
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Precondition(_)));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn fetch_aggregate_primary_not_found_is_terminal() {
        let transport = StubTransport::new();
        let (resolver, _) = resolver(transport.clone());

        let err = resolver
            .fetch_aggregate::<Person>("missing", &FieldSelector::all_for::<Person>())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn fetch_aggregate_matches_requested_id() {
        let transport = StubTransport::new();
        transport
            .respond(
                &url("people", "p1"),
                200,
                &serde_json::json!({
                    "id": "p1",
                    "name": "Pazu",
                    "films": [url("films", "1")],
                    "species": "",
                    "url": url("people", "p1"),
                })
                .to_string(),
            )
            .respond(&url("films", "1"), 200, &film_json("1", "Castle in the Sky"));
        let (resolver, _) = resolver(transport);

        let aggregate = resolver
            .fetch_aggregate::<Person>("p1", &FieldSelector::all_for::<Person>())
            .await
            .unwrap();
        assert_eq!(aggregate.primary.id, "p1");
        assert_eq!(aggregate.many("films")[0].id(), "1");
        assert!(aggregate.one("species").is_none());
    }
}
