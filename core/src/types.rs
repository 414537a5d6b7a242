//! Domain DTOs for the events API.
//!
//! # Design
//! These types mirror the remote service's JSON schema but are defined
//! independently of the mock-server crate; integration tests catch schema
//! drift. Identifiers are opaque strings because the demo dataset uses
//! short numeric ids while the service uses UUIDs.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// A category as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating or renaming a category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryInput {
    pub name: String,
}

impl CategoryInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Reject a blank name before it reaches the network.
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut fields = FieldErrors::default();
        fields.require("name", &self.name, "Category name cannot be empty.");
        fields.finish()
    }
}

/// An event as returned by the API.
///
/// `category_id` mirrors `category`; `category_name` is denormalized by the
/// server from the referenced category at the time of the last write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub venue: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub category: String,
    #[serde(default)]
    pub category_id: String,
    pub category_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// The writable subset of this event.
    pub fn writable(&self) -> CreateEventData {
        CreateEventData {
            title: self.title.clone(),
            description: self.description.clone(),
            venue: self.venue.clone(),
            date: self.date,
            time: self.time,
            image: self.image.clone(),
            category: self.category.clone(),
        }
    }
}

/// Request payload for creating an event: every writable field of [`Event`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateEventData {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub venue: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub category: String,
}

impl CreateEventData {
    /// Same rules as the event form: title, venue and category are required.
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut fields = FieldErrors::default();
        fields.require("title", &self.title, "Title is required");
        fields.require("venue", &self.venue, "Venue is required");
        fields.require("category", &self.category, "Category is required");
        fields.finish()
    }
}

/// Request payload for updating an event. Only the fields present in the
/// JSON are applied; omitted fields remain unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateEventData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl UpdateEventData {
    /// Validate only the fields that are being changed.
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut fields = FieldErrors::default();
        if let Some(title) = &self.title {
            fields.require("title", title, "Title is required");
        }
        if let Some(venue) = &self.venue {
            fields.require("venue", venue, "Venue is required");
        }
        if let Some(category) = &self.category {
            fields.require("category", category, "Category is required");
        }
        fields.finish()
    }
}

impl From<CreateEventData> for UpdateEventData {
    fn from(data: CreateEventData) -> Self {
        Self {
            title: Some(data.title),
            description: data.description,
            venue: Some(data.venue),
            date: Some(data.date),
            time: Some(data.time),
            image: data.image,
            category: Some(data.category),
        }
    }
}

/// Filter for listing events. Empty strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub search: Option<String>,
    pub category: Option<String>,
}

impl EventFilter {
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn category(mut self, id: impl Into<String>) -> Self {
        self.category = Some(id.into());
        self
    }

    fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }

    fn category_id(&self) -> Option<&str> {
        self.category.as_deref().filter(|s| !s.is_empty())
    }

    /// Conjunction of an exact category match and a case-insensitive
    /// substring match on title, description or venue.
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(category) = self.category_id() {
            if event.category != category {
                return false;
            }
        }
        match self.search_term() {
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

    /// Query string parameters for `GET /events/`.
    pub fn query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(term) = self.search_term() {
            params.push(("search".to_string(), term.to_string()));
        }
        if let Some(category) = self.category_id() {
            params.push(("category".to_string(), category.to_string()));
        }
        params
    }
}

/// Accumulates per-field messages in the same shape the server reports them.
#[derive(Default)]
struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    fn require(&mut self, field: &str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.0
                .entry(field.to_string())
                .or_default()
                .push(message.to_string());
        }
    }

    fn finish(self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation { fields: self.0 })
        }
    }
}
