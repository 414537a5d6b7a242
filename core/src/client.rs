//! Stateless HTTP request builder and response parser for the events API.
//!
//! # Design
//! `EventsClient` holds only a base URL and a request timeout and carries no
//! mutable state between calls. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`. [`Api`](crate::Api) wires the two halves
//! through a transport; callers that do their own I/O can use this type
//! directly.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_TIMEOUT;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::interceptor::{classify_status, is_success};
use crate::types::{Category, CategoryInput, CreateEventData, Event, EventFilter, UpdateEventData};

/// List endpoints answer either with a paginated envelope or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Bare(Vec<T>),
    Page { results: Vec<T> },
}

impl<T> Listing<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Bare(items) => items,
            Listing::Page { results } => results,
        }
    }
}

/// Synchronous, stateless request builder for the events API.
#[derive(Debug, Clone)]
pub struct EventsClient {
    base_url: String,
    timeout: Duration,
}

impl EventsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ---- categories ----

    pub fn build_list_categories(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/categories/", None)
    }

    pub fn build_get_category(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/categories/{id}/"), None)
    }

    pub fn build_create_category(&self, input: &CategoryInput) -> Result<HttpRequest, ApiError> {
        let body = to_json(input)?;
        Ok(self.request(HttpMethod::Post, "/categories/", Some(body)))
    }

    pub fn build_update_category(
        &self,
        id: &str,
        input: &CategoryInput,
    ) -> Result<HttpRequest, ApiError> {
        let body = to_json(input)?;
        Ok(self.request(HttpMethod::Put, &format!("/categories/{id}/"), Some(body)))
    }

    pub fn build_delete_category(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/categories/{id}/"), None)
    }

    pub fn parse_list_categories(&self, response: HttpResponse) -> Result<Vec<Category>, ApiError> {
        parse_listing(response)
    }

    pub fn parse_get_category(&self, response: HttpResponse) -> Result<Category, ApiError> {
        parse_body(response)
    }

    pub fn parse_create_category(&self, response: HttpResponse) -> Result<Category, ApiError> {
        parse_body(response)
    }

    pub fn parse_update_category(&self, response: HttpResponse) -> Result<Category, ApiError> {
        parse_body(response)
    }

    pub fn parse_delete_category(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    // ---- events ----

    pub fn build_list_events(&self, filter: &EventFilter) -> HttpRequest {
        let mut req = self.request(HttpMethod::Get, "/events/", None);
        req.query = filter.query_params();
        req
    }

    pub fn build_get_event(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/events/{id}/"), None)
    }

    pub fn build_create_event(&self, input: &CreateEventData) -> Result<HttpRequest, ApiError> {
        let body = to_json(input)?;
        Ok(self.request(HttpMethod::Post, "/events/", Some(body)))
    }

    pub fn build_update_event(
        &self,
        id: &str,
        input: &UpdateEventData,
    ) -> Result<HttpRequest, ApiError> {
        let body = to_json(input)?;
        Ok(self.request(HttpMethod::Put, &format!("/events/{id}/"), Some(body)))
    }

    pub fn build_delete_event(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/events/{id}/"), None)
    }

    pub fn parse_list_events(&self, response: HttpResponse) -> Result<Vec<Event>, ApiError> {
        parse_listing(response)
    }

    pub fn parse_get_event(&self, response: HttpResponse) -> Result<Event, ApiError> {
        parse_body(response)
    }

    pub fn parse_create_event(&self, response: HttpResponse) -> Result<Event, ApiError> {
        parse_body(response)
    }

    pub fn parse_update_event(&self, response: HttpResponse) -> Result<Event, ApiError> {
        parse_body(response)
    }

    pub fn parse_delete_event(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    // ---- liveness ----

    /// `GET {base}/` with its own (shorter) deadline.
    pub fn build_health_check(&self, timeout: Duration) -> HttpRequest {
        let mut req = self.request(HttpMethod::Get, "/", None);
        req.timeout = timeout;
        req
    }

    pub fn parse_health_check(&self, response: HttpResponse) -> bool {
        response.status == 200
    }

    fn request(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            query: Vec::new(),
            headers: default_headers(),
            body,
            timeout: self.timeout,
        }
    }
}

fn default_headers() -> Vec<(String, String)> {
    vec![
        ("content-type".to_string(), "application/json".to_string()),
        ("accept".to_string(), "application/json".to_string()),
    ]
}

fn to_json<T: Serialize>(input: &T) -> Result<String, ApiError> {
    serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn parse_body<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

fn parse_listing<T: DeserializeOwned>(response: HttpResponse) -> Result<Vec<T>, ApiError> {
    parse_body::<Listing<T>>(response).map(Listing::into_vec)
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if is_success(response.status) {
        return Ok(());
    }
    Err(classify_status(response))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::*;

    const CATEGORY: &str = r#"{"id":"1","name":"Conference","created_at":"2024-01-01T00:00:00Z","updated_at":"2024-01-01T00:00:00Z"}"#;

    fn client() -> EventsClient {
        EventsClient::new("http://localhost:8000/api")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_list_categories_produces_correct_request() {
        let req = client().build_list_categories();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8000/api/categories/");
        assert!(req.body.is_none());
        assert!(req.query.is_empty());
        assert_eq!(req.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn every_request_carries_json_headers() {
        let c = client();
        for req in [
            c.build_list_categories(),
            c.build_delete_event("3"),
            c.build_health_check(Duration::from_secs(2)),
        ] {
            assert!(req
                .headers
                .contains(&("content-type".to_string(), "application/json".to_string())));
        }
    }

    #[test]
    fn build_list_events_carries_filter_as_query() {
        let filter = EventFilter::default().search("react").category("2");
        let req = client().build_list_events(&filter);
        assert_eq!(req.url, "http://localhost:8000/api/events/");
        assert_eq!(
            req.query,
            vec![
                ("search".to_string(), "react".to_string()),
                ("category".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn build_update_event_sends_only_present_fields() {
        let update = UpdateEventData {
            venue: Some("Hall B".to_string()),
            ..Default::default()
        };
        let req = client().build_update_event("9", &update).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:8000/api/events/9/");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"venue": "Hall B"}));
    }

    #[test]
    fn build_create_event_serializes_wall_clock_time() {
        let input = CreateEventData {
            title: "Meetup".to_string(),
            description: None,
            venue: "Community Center".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            time: NaiveTime::from_hms_opt(18, 30, 0).unwrap(),
            image: None,
            category: "5".to_string(),
        };
        let req = client().build_create_event(&input).unwrap();
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["time"], "18:30:00");
        assert_eq!(body["date"], "2025-01-10");
        assert!(body.get("image").is_none());
    }

    #[test]
    fn health_check_uses_its_own_timeout() {
        let req = client().build_health_check(Duration::from_secs(2));
        assert_eq!(req.url, "http://localhost:8000/api/");
        assert_eq!(req.timeout, Duration::from_secs(2));
    }

    #[test]
    fn parse_list_accepts_paginated_and_bare_bodies() {
        let c = client();
        let page = format!(r#"{{"count":1,"next":null,"previous":null,"results":[{CATEGORY}]}}"#);
        assert_eq!(c.parse_list_categories(response(200, &page)).unwrap().len(), 1);
        let bare = format!("[{CATEGORY}]");
        assert_eq!(c.parse_list_categories(response(200, &bare)).unwrap().len(), 1);
    }

    #[test]
    fn parse_get_category_not_found() {
        let err = client().parse_get_category(response(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_create_category_success() {
        let category = client().parse_create_category(response(201, CATEGORY)).unwrap();
        assert_eq!(category.name, "Conference");
    }

    #[test]
    fn parse_create_category_server_error() {
        let err = client()
            .parse_create_category(response(500, "internal error"))
            .unwrap_err();
        assert!(matches!(err, ApiError::ServerError { status: 500, .. }));
    }

    #[test]
    fn parse_delete_event_success() {
        assert!(client().parse_delete_event(response(204, "")).is_ok());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = EventsClient::new("http://localhost:8000/api/");
        let req = client.build_list_categories();
        assert_eq!(req.url, "http://localhost:8000/api/categories/");
    }

    #[test]
    fn parse_list_events_bad_json() {
        let err = client().parse_list_events(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }
}
