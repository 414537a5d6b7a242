//! In-memory stand-in for the events REST service.
//!
//! Serves the same routes, trailing slashes and JSON shapes as the real
//! service: paginated list envelopes, field-keyed validation errors,
//! server-stamped timestamps and a denormalized `category_name` on events.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub venue: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub image: Option<String>,
    pub category: Uuid,
    pub category_id: Uuid,
    pub category_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize)]
pub struct Page<T> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    fn of(results: Vec<T>) -> Self {
        Self {
            count: results.len(),
            next: None,
            previous: None,
            results,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct CategoryInput {
    #[serde(default)]
    pub name: Option<String>,
}

/// Shared by create (all required fields must be present) and update
/// (only present fields are applied).
#[derive(Deserialize, Default)]
pub struct EventInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub image: Option<String>,
    pub category: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct EventQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

#[derive(Default)]
pub struct Store {
    categories: HashMap<Uuid, Category>,
    events: HashMap<Uuid, Event>,
}

pub type Db = Arc<RwLock<Store>>;

/// Error responses in the service's wire shapes.
#[derive(Debug)]
pub enum Failure {
    NotFound,
    Fields(BTreeMap<String, Vec<String>>),
    Rejected(String),
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        match self {
            Failure::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response()
            }
            Failure::Fields(fields) => (StatusCode::BAD_REQUEST, Json(fields)).into_response(),
            Failure::Rejected(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({"error": message}))).into_response()
            }
        }
    }
}

#[derive(Default)]
struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    fn finish(self) -> Result<(), Failure> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(Failure::Fields(self.0))
        }
    }
}

pub fn app() -> Router {
    app_with(Db::default())
}

pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/", get(root))
        .route("/api/categories/", get(list_categories).post(create_category))
        .route(
            "/api/categories/{id}/",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/api/events/", get(list_events).post(create_event))
        .route(
            "/api/events/{id}/",
            get(get_event).put(update_event).delete(delete_event),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Event Management API",
        "version": "1.0",
        "endpoints": {
            "events": "/api/events/",
            "categories": "/api/categories/",
        },
        "status": "running",
    }))
}

fn parse_id(raw: &str) -> Result<Uuid, Failure> {
    raw.parse().map_err(|_| Failure::NotFound)
}

/// Category names are stored trimmed and title-cased.
fn title_case(name: &str) -> String {
    name.trim()
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

// ---- categories ----

async fn list_categories(State(db): State<Db>) -> Json<Page<Category>> {
    let store = db.read().await;
    let mut categories: Vec<Category> = store.categories.values().cloned().collect();
    categories.sort_by(|a, b| a.name.cmp(&b.name));
    Json(Page::of(categories))
}

fn validate_category_name(
    store: &Store,
    input: &CategoryInput,
    current: Option<Uuid>,
) -> Result<String, Failure> {
    let mut errors = FieldErrors::default();
    let name = match input.name.as_deref() {
        None => {
            errors.add("name", "This field is required.");
            String::new()
        }
        Some(raw) if raw.trim().is_empty() => {
            errors.add("name", "Category name cannot be empty.");
            String::new()
        }
        Some(raw) => title_case(raw),
    };
    let taken = store
        .categories
        .values()
        .any(|c| c.name == name && Some(c.id) != current);
    if taken {
        errors.add("name", "category with this name already exists.");
    }
    errors.finish()?;
    Ok(name)
}

async fn create_category(
    State(db): State<Db>,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<Category>), Failure> {
    let mut store = db.write().await;
    let name = validate_category_name(&store, &input, None)?;
    let now = Utc::now();
    let category = Category {
        id: Uuid::new_v4(),
        name,
        created_at: now,
        updated_at: now,
    };
    store.categories.insert(category.id, category.clone());
    Ok((StatusCode::CREATED, Json(category)))
}

async fn get_category(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Category>, Failure> {
    let id = parse_id(&id)?;
    let store = db.read().await;
    store.categories.get(&id).cloned().map(Json).ok_or(Failure::NotFound)
}

async fn update_category(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<Category>, Failure> {
    let id = parse_id(&id)?;
    let mut store = db.write().await;
    if !store.categories.contains_key(&id) {
        return Err(Failure::NotFound);
    }
    let name = validate_category_name(&store, &input, Some(id))?;
    let category = store.categories.get_mut(&id).ok_or(Failure::NotFound)?;
    category.name = name;
    category.updated_at = Utc::now();
    Ok(Json(category.clone()))
}

async fn delete_category(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<StatusCode, Failure> {
    let id = parse_id(&id)?;
    let mut store = db.write().await;
    if !store.categories.contains_key(&id) {
        return Err(Failure::NotFound);
    }
    if store.events.values().any(|e| e.category == id) {
        return Err(Failure::Rejected(
            "Cannot delete category with existing events".to_string(),
        ));
    }
    store.categories.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

// ---- events ----

fn matches(event: &Event, query: &EventQuery) -> bool {
    if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty()) {
        if event.category.to_string() != category {
            return false;
        }
    }
    match query.search.as_deref().filter(|s| !s.is_empty()) {
        None => true,
        Some(term) => {
            let needle = term.to_lowercase();
            event.title.to_lowercase().contains(&needle)
                || event.venue.to_lowercase().contains(&needle)
                || event
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        }
    }
}

async fn list_events(
    State(db): State<Db>,
    Query(query): Query<EventQuery>,
) -> Json<Page<Event>> {
    let store = db.read().await;
    let mut events: Vec<Event> = store
        .events
        .values()
        .filter(|e| matches(e, &query))
        .cloned()
        .collect();
    events.sort_by(|a, b| (a.date, a.time).cmp(&(b.date, b.time)));
    Json(Page::of(events))
}

/// Resolve and check the fields of an event write. `existing` is `None`
/// on create, where every required field must be supplied.
fn check_event(
    store: &Store,
    input: &EventInput,
    existing: Option<&Event>,
) -> Result<Option<Category>, Failure> {
    let mut errors = FieldErrors::default();
    let creating = existing.is_none();

    match input.title.as_deref() {
        Some(t) if t.trim().is_empty() => errors.add("title", "Title cannot be empty."),
        None if creating => errors.add("title", "This field is required."),
        _ => {}
    }
    match input.venue.as_deref() {
        Some(v) if v.trim().is_empty() => errors.add("venue", "Venue cannot be empty."),
        None if creating => errors.add("venue", "This field is required."),
        _ => {}
    }
    if creating && input.date.is_none() {
        errors.add("date", "This field is required.");
    }
    if creating && input.time.is_none() {
        errors.add("time", "This field is required.");
    }

    let category = match input.category.as_deref() {
        None if creating => {
            errors.add("category", "This field is required.");
            None
        }
        None => None,
        Some(raw) if raw.trim().is_empty() => {
            errors.add("category", "Category is required.");
            None
        }
        Some(raw) => {
            let found = raw
                .parse::<Uuid>()
                .ok()
                .and_then(|id| store.categories.get(&id).cloned());
            if found.is_none() {
                errors.add("category", format!("Invalid pk \"{raw}\" - object does not exist."));
            }
            found
        }
    };

    errors.finish()?;
    Ok(category)
}

fn normalize_image(image: Option<String>) -> Option<String> {
    image.filter(|i| !i.trim().is_empty())
}

async fn create_event(
    State(db): State<Db>,
    Json(input): Json<EventInput>,
) -> Result<(StatusCode, Json<Event>), Failure> {
    let mut store = db.write().await;
    let category = check_event(&store, &input, None)?.ok_or(Failure::NotFound)?;
    let (Some(title), Some(venue), Some(date), Some(time)) =
        (input.title, input.venue, input.date, input.time)
    else {
        return Err(Failure::Rejected("incomplete event".to_string()));
    };
    let now = Utc::now();
    let event = Event {
        id: Uuid::new_v4(),
        title,
        description: input.description,
        venue,
        date,
        time,
        image: normalize_image(input.image),
        category: category.id,
        category_id: category.id,
        category_name: category.name,
        created_at: now,
        updated_at: now,
    };
    store.events.insert(event.id, event.clone());
    Ok((StatusCode::CREATED, Json(event)))
}

async fn get_event(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Event>, Failure> {
    let id = parse_id(&id)?;
    let store = db.read().await;
    store.events.get(&id).cloned().map(Json).ok_or(Failure::NotFound)
}

/// PUT merges whatever fields are present. The real service validates PUT
/// bodies as complete records, so callers should send every writable field.
async fn update_event(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<EventInput>,
) -> Result<Json<Event>, Failure> {
    let id = parse_id(&id)?;
    let mut store = db.write().await;
    let existing = store.events.get(&id).cloned().ok_or(Failure::NotFound)?;
    let category = check_event(&store, &input, Some(&existing))?;

    let event = store.events.get_mut(&id).ok_or(Failure::NotFound)?;
    if let Some(title) = input.title {
        event.title = title;
    }
    if let Some(description) = input.description {
        event.description = Some(description);
    }
    if let Some(venue) = input.venue {
        event.venue = venue;
    }
    if let Some(date) = input.date {
        event.date = date;
    }
    if let Some(time) = input.time {
        event.time = time;
    }
    if input.image.is_some() {
        event.image = normalize_image(input.image);
    }
    if let Some(category) = category {
        event.category = category.id;
        event.category_id = category.id;
        event.category_name = category.name;
    }
    event.updated_at = Utc::now();
    Ok(Json(event.clone()))
}

async fn delete_event(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<StatusCode, Failure> {
    let id = parse_id(&id)?;
    let mut store = db.write().await;
    store
        .events
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(Failure::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_normalizes_names() {
        assert_eq!(title_case("  tech  talks "), "Tech Talks");
        assert_eq!(title_case("WORKSHOP"), "Workshop");
    }

    #[test]
    fn event_serializes_wall_clock_fields() {
        let now = Utc::now();
        let id = Uuid::nil();
        let event = Event {
            id,
            title: "Meetup".to_string(),
            description: None,
            venue: "Hall".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            time: NaiveTime::from_hms_opt(18, 30, 0).unwrap(),
            image: None,
            category: id,
            category_id: id,
            category_name: "Meetup".to_string(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["date"], "2025-01-10");
        assert_eq!(json["time"], "18:30:00");
        assert_eq!(json["description"], serde_json::Value::Null);
    }

    #[test]
    fn event_input_all_fields_optional() {
        let input: EventInput = serde_json::from_str("{}").unwrap();
        assert!(input.title.is_none());
        assert!(input.category.is_none());
    }

    #[test]
    fn create_requires_fields_update_does_not() {
        let store = Store::default();
        let err = check_event(&store, &EventInput::default(), None).unwrap_err();
        let Failure::Fields(fields) = err else {
            panic!("expected field errors");
        };
        for field in ["title", "venue", "date", "time", "category"] {
            assert!(fields.contains_key(field), "{field}");
        }
        let now = Utc::now();
        let existing = Event {
            id: Uuid::nil(),
            title: "T".into(),
            description: None,
            venue: "V".into(),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            image: None,
            category: Uuid::nil(),
            category_id: Uuid::nil(),
            category_name: "C".into(),
            created_at: now,
            updated_at: now,
        };
        assert!(check_event(&store, &EventInput::default(), Some(&existing)).is_ok());
    }

    #[test]
    fn unknown_category_is_a_field_error() {
        let input = EventInput {
            category: Some("not-a-uuid".into()),
            ..Default::default()
        };
        let now = Utc::now();
        let existing = Event {
            id: Uuid::nil(),
            title: "T".into(),
            description: None,
            venue: "V".into(),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            image: None,
            category: Uuid::nil(),
            category_id: Uuid::nil(),
            category_name: "C".into(),
            created_at: now,
            updated_at: now,
        };
        let err = check_event(&Store::default(), &input, Some(&existing)).unwrap_err();
        assert!(matches!(err, Failure::Fields(f) if f.contains_key("category")));
    }
}
