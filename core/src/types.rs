//! Entity records for the catalog API.
//!
//! # Design
//! Each kind has an explicit record decoded strictly at the fetch boundary.
//! Reference fields hold absolute resource URLs exactly as the upstream
//! returns them; validating them is the resolver's job, not the decoder's.
//! The mock-server crate defines its own copies of these shapes and the
//! integration tests catch any drift between the two.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// The five kinds of record the catalog exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Film,
    Person,
    Location,
    Species,
    Vehicle,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Film,
        EntityKind::Person,
        EntityKind::Location,
        EntityKind::Species,
        EntityKind::Vehicle,
    ];

    /// Path segment of the collection endpoint, e.g. `films` for `/films`.
    pub const fn collection(self) -> &'static str {
        match self {
            EntityKind::Film => "films",
            EntityKind::Person => "people",
            EntityKind::Location => "locations",
            EntityKind::Species => "species",
            EntityKind::Vehicle => "vehicles",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Film => "film",
            EntityKind::Person => "person",
            EntityKind::Location => "location",
            EntityKind::Species => "species",
            EntityKind::Vehicle => "vehicle",
        };
        f.write_str(name)
    }
}

/// The value of one reference field on an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference<'a> {
    /// A single optional URL (`Person::species`, `Vehicle::pilot`).
    One(Option<&'a str>),
    /// An ordered list of URLs.
    Many(&'a [String]),
}

/// Behaviour shared by every catalog record.
pub trait Entity: serde::de::DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    /// Reference fields this kind carries and the kind each one points at.
    const REFERENCES: &'static [(&'static str, EntityKind)];

    fn id(&self) -> &str;
    fn url(&self) -> &str;

    /// Display label: the title for films, the name for everything else.
    fn label(&self) -> &str;

    /// Look up a reference field by name. `None` if the kind has no such
    /// field.
    fn reference(&self, field: &str) -> Option<Reference<'_>>;

    /// Declared target kind of a reference field.
    fn reference_kind(field: &str) -> Option<EntityKind> {
        Self::REFERENCES
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, kind)| *kind)
    }
}

/// Treat `""` (and absent) as no reference. The upstream uses empty strings
/// for "no pilot" and similar.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// A film.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Film {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub original_title_romanised: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub producer: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub running_time: String,
    #[serde(default)]
    pub rt_score: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_banner: Option<String>,
    #[serde(default)]
    pub people: Vec<String>,
    #[serde(default)]
    pub species: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub vehicles: Vec<String>,
    pub url: String,
}

impl Entity for Film {
    const KIND: EntityKind = EntityKind::Film;
    const REFERENCES: &'static [(&'static str, EntityKind)] = &[
        ("people", EntityKind::Person),
        ("species", EntityKind::Species),
        ("locations", EntityKind::Location),
        ("vehicles", EntityKind::Vehicle),
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn label(&self) -> &str {
        &self.title
    }

    fn reference(&self, field: &str) -> Option<Reference<'_>> {
        match field {
            "people" => Some(Reference::Many(&self.people)),
            "species" => Some(Reference::Many(&self.species)),
            "locations" => Some(Reference::Many(&self.locations)),
            "vehicles" => Some(Reference::Many(&self.vehicles)),
            _ => None,
        }
    }
}

/// A character.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Person {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eye_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hair_color: Option<String>,
    #[serde(default)]
    pub films: Vec<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub species: Option<String>,
    pub url: String,
}

impl Entity for Person {
    const KIND: EntityKind = EntityKind::Person;
    const REFERENCES: &'static [(&'static str, EntityKind)] = &[
        ("films", EntityKind::Film),
        ("species", EntityKind::Species),
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn reference(&self, field: &str) -> Option<Reference<'_>> {
        match field {
            "films" => Some(Reference::Many(&self.films)),
            "species" => Some(Reference::One(self.species.as_deref())),
            _ => None,
        }
    }
}

/// A place that appears in one or more films.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub climate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terrain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_water: Option<String>,
    #[serde(default)]
    pub residents: Vec<String>,
    #[serde(default)]
    pub films: Vec<String>,
    pub url: String,
}

impl Entity for Location {
    const KIND: EntityKind = EntityKind::Location;
    const REFERENCES: &'static [(&'static str, EntityKind)] = &[
        ("residents", EntityKind::Person),
        ("films", EntityKind::Film),
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn reference(&self, field: &str) -> Option<Reference<'_>> {
        match field {
            "residents" => Some(Reference::Many(&self.residents)),
            "films" => Some(Reference::Many(&self.films)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Species {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eye_colors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hair_colors: Option<String>,
    #[serde(default)]
    pub people: Vec<String>,
    #[serde(default)]
    pub films: Vec<String>,
    pub url: String,
}

impl Entity for Species {
    const KIND: EntityKind = EntityKind::Species;
    const REFERENCES: &'static [(&'static str, EntityKind)] = &[
        ("people", EntityKind::Person),
        ("films", EntityKind::Film),
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn reference(&self, field: &str) -> Option<Reference<'_>> {
        match field {
            "people" => Some(Reference::Many(&self.people)),
            "films" => Some(Reference::Many(&self.films)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub pilot: Option<String>,
    #[serde(default)]
    pub films: Vec<String>,
    pub url: String,
}

impl Entity for Vehicle {
    const KIND: EntityKind = EntityKind::Vehicle;
    const REFERENCES: &'static [(&'static str, EntityKind)] = &[
        ("pilot", EntityKind::Person),
        ("films", EntityKind::Film),
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn reference(&self, field: &str) -> Option<Reference<'_>> {
        match field {
            "pilot" => Some(Reference::One(self.pilot.as_deref())),
            "films" => Some(Reference::Many(&self.films)),
            _ => None,
        }
    }
}

/// Any catalog record, for reference fields resolved by selector rather than
/// by static type.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnyEntity {
    Film(Film),
    Person(Person),
    Location(Location),
    Species(Species),
    Vehicle(Vehicle),
}

impl AnyEntity {
    pub fn kind(&self) -> EntityKind {
        match self {
            AnyEntity::Film(_) => EntityKind::Film,
            AnyEntity::Person(_) => EntityKind::Person,
            AnyEntity::Location(_) => EntityKind::Location,
            AnyEntity::Species(_) => EntityKind::Species,
            AnyEntity::Vehicle(_) => EntityKind::Vehicle,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            AnyEntity::Film(e) => e.id(),
            AnyEntity::Person(e) => e.id(),
            AnyEntity::Location(e) => e.id(),
            AnyEntity::Species(e) => e.id(),
            AnyEntity::Vehicle(e) => e.id(),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            AnyEntity::Film(e) => e.url(),
            AnyEntity::Person(e) => e.url(),
            AnyEntity::Location(e) => e.url(),
            AnyEntity::Species(e) => e.url(),
            AnyEntity::Vehicle(e) => e.url(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            AnyEntity::Film(e) => e.label(),
            AnyEntity::Person(e) => e.label(),
            AnyEntity::Location(e) => e.label(),
            AnyEntity::Species(e) => e.label(),
            AnyEntity::Vehicle(e) => e.label(),
        }
    }

    pub fn as_film(&self) -> Option<&Film> {
        match self {
            AnyEntity::Film(film) => Some(film),
            _ => None,
        }
    }

    pub fn as_person(&self) -> Option<&Person> {
        match self {
            AnyEntity::Person(person) => Some(person),
            _ => None,
        }
    }
}
