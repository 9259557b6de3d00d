//! Axum stand-in for the catalog API.
//!
//! Serves a fixed catalog whose reference URLs point back at the server's
//! own origin. Tests can inject a [`Fault`] on any path and read back every
//! path that was requested.

pub mod fixtures;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock, task::JoinHandle};
use tracing::debug;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Film {
    pub id: Uuid,
    pub title: String,
    pub original_title: String,
    pub original_title_romanised: String,
    pub description: String,
    pub director: String,
    pub producer: String,
    pub release_date: String,
    pub running_time: String,
    pub rt_score: String,
    pub people: Vec<String>,
    pub species: Vec<String>,
    pub locations: Vec<String>,
    pub vehicles: Vec<String>,
    pub url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Person {
    pub id: Uuid,
    pub name: String,
    pub gender: Option<String>,
    pub age: Option<String>,
    pub eye_color: Option<String>,
    pub hair_color: Option<String>,
    pub films: Vec<String>,
    pub species: String,
    pub url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub climate: Option<String>,
    pub terrain: Option<String>,
    pub surface_water: Option<String>,
    pub residents: Vec<String>,
    pub films: Vec<String>,
    pub url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Species {
    pub id: Uuid,
    pub name: String,
    pub classification: Option<String>,
    pub eye_colors: Option<String>,
    pub hair_colors: Option<String>,
    pub people: Vec<String>,
    pub films: Vec<String>,
    pub url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub vehicle_class: Option<String>,
    pub length: Option<String>,
    /// Empty string when the vehicle has no known pilot.
    pub pilot: String,
    pub films: Vec<String>,
    pub url: String,
}

#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub films: Vec<Film>,
    pub people: Vec<Person>,
    pub locations: Vec<Location>,
    pub species: Vec<Species>,
    pub vehicles: Vec<Vehicle>,
}

/// A record type the server can list and look up by id.
pub trait Record: Clone + Serialize + Send + Sync + 'static {
    fn all(dataset: &Dataset) -> &[Self];
    fn id(&self) -> Uuid;
}

macro_rules! record {
    ($ty:ty, $field:ident) => {
        impl Record for $ty {
            fn all(dataset: &Dataset) -> &[Self] {
                &dataset.$field
            }

            fn id(&self) -> Uuid {
                self.id
            }
        }
    };
}

record!(Film, films);
record!(Person, people);
record!(Location, locations);
record!(Species, species);
record!(Vehicle, vehicles);

/// Canned misbehaviour for one request path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fault {
    /// Answer with this status and an empty body.
    Status(u16),
    /// Answer 200 with an empty body.
    EmptyBody,
    /// Answer 200 with truncated JSON.
    Malformed,
}

#[derive(Clone)]
pub struct AppState {
    dataset: Arc<Dataset>,
    faults: Arc<RwLock<HashMap<String, Fault>>>,
    requests: Arc<RwLock<Vec<String>>>,
}

impl AppState {
    pub fn new(base_url: &str) -> Self {
        Self::with_dataset(fixtures::dataset(base_url))
    }

    pub fn with_dataset(dataset: Dataset) -> Self {
        Self {
            dataset: Arc::new(dataset),
            faults: Arc::new(RwLock::new(HashMap::new())),
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Make every request to `path` (e.g. `/films/<id>`) misbehave.
    pub async fn inject(&self, path: &str, fault: Fault) {
        self.faults.write().await.insert(path.to_string(), fault);
    }

    pub async fn clear_faults(&self) {
        self.faults.write().await.clear();
    }

    /// Every request path received so far, in arrival order.
    pub async fn requests(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }
}

pub fn app(base_url: &str) -> Router {
    router(AppState::new(base_url))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/films", get(list_records::<Film>))
        .route("/films/{id}", get(get_record::<Film>))
        .route("/people", get(list_records::<Person>))
        .route("/people/{id}", get(get_record::<Person>))
        .route("/locations", get(list_records::<Location>))
        .route("/locations/{id}", get(get_record::<Location>))
        .route("/species", get(list_records::<Species>))
        .route("/species/{id}", get(get_record::<Species>))
        .route("/vehicles", get(list_records::<Vehicle>))
        .route("/vehicles/{id}", get(get_record::<Vehicle>))
        .layer(middleware::from_fn_with_state(state.clone(), record_and_inject))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, router(state)).await
}

/// A server running on an ephemeral local port. Stops when dropped.
pub struct MockServer {
    pub base_url: String,
    pub state: AppState,
    handle: JoinHandle<Result<(), std::io::Error>>,
}

impl MockServer {
    /// Bind `127.0.0.1:0` and serve the fixture catalog in the background.
    pub async fn spawn() -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);
        let state = AppState::new(&base_url);
        let handle = tokio::spawn(run(listener, state.clone()));
        Ok(Self {
            base_url,
            state,
            handle,
        })
    }

    /// Absolute URL of `path` on this server.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn record_and_inject(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    state.requests.write().await.push(path.clone());

    let fault = state.faults.read().await.get(&path).cloned();
    match fault {
        Some(Fault::Status(code)) => {
            debug!(%path, code, "injected status");
            StatusCode::from_u16(code)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
                .into_response()
        }
        Some(Fault::EmptyBody) => {
            debug!(%path, "injected empty body");
            StatusCode::OK.into_response()
        }
        Some(Fault::Malformed) => {
            debug!(%path, "injected malformed body");
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                r#"{"id":"#,
            )
                .into_response()
        }
        None => {
            debug!(%path, "request");
            next.run(request).await
        }
    }
}

async fn list_records<T: Record>(State(state): State<AppState>) -> Json<Vec<T>> {
    Json(T::all(&state.dataset).to_vec())
}

async fn get_record<T: Record>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<T>, StatusCode> {
    T::all(&state.dataset)
        .iter()
        .find(|record| record.id() == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}
