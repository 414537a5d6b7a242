//! Typed category and event operations with demo-data fallback.
//!
//! # Design
//! `Api` is the explicitly constructed client context: the resolved
//! configuration, the request builder, a transport, the interceptor pair
//! and the fallback policy (which owns the demo store). Nothing is global,
//! so tests build as many isolated instances as they need.
//!
//! Every write validates its input first, in both modes, so blank required
//! fields never reach the server or the demo store.

use tracing::debug;

use crate::client::EventsClient;
use crate::config::{ClientConfig, ConfigError, Mode};
use crate::demo::DemoStore;
use crate::error::ApiError;
use crate::fallback::FallbackPolicy;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::interceptor::Interceptors;
use crate::transport::UreqTransport;
use crate::types::{Category, CategoryInput, CreateEventData, Event, EventFilter, UpdateEventData};

/// Client context for the events API: category and event operations that
/// fall back to demo data when the service cannot be reached.
pub struct Api<T = UreqTransport> {
    config: ClientConfig,
    client: EventsClient,
    transport: T,
    interceptors: Interceptors,
    policy: FallbackPolicy,
}

impl Api<UreqTransport> {
    /// Resolve configuration from the environment and use the `ureq` transport.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> Api<T> {
    /// Build a client around an arbitrary transport, seeded with the stock
    /// demo dataset.
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let client = EventsClient::new(&config.base_url).with_timeout(config.timeout);
        let interceptors = Interceptors::new(config.logs_requests());
        let policy = FallbackPolicy::new(config.mode, DemoStore::seeded());
        Self {
            config,
            client,
            transport,
            interceptors,
            policy,
        }
    }

    /// Replace the demo dataset.
    pub fn with_demo_store(mut self, store: DemoStore) -> Self {
        self.policy = FallbackPolicy::new(self.config.mode, store);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.policy.mode()
    }

    pub fn is_demo_mode(&self) -> bool {
        self.mode() == Mode::Demo
    }

    /// A copy of the demo dataset as it stands now.
    pub fn demo_snapshot(&self) -> DemoStore {
        self.policy.snapshot()
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let request = self.interceptors.on_request(request);
        self.interceptors
            .on_response(self.transport.execute(&request))
    }

    // ---- categories ----

    pub fn get_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.policy.run(
            "get_categories",
            || {
                let response = self.send(self.client.build_list_categories())?;
                self.client.parse_list_categories(response)
            },
            |store| Ok(store.categories()),
        )
    }

    pub fn get_category(&self, id: &str) -> Result<Category, ApiError> {
        self.policy.run(
            "get_category",
            || {
                let response = self.send(self.client.build_get_category(id))?;
                self.client.parse_get_category(response)
            },
            |store| store.category(id),
        )
    }

    pub fn create_category(&self, input: &CategoryInput) -> Result<Category, ApiError> {
        input.validate()?;
        self.policy.run(
            "create_category",
            || {
                let response = self.send(self.client.build_create_category(input)?)?;
                self.client.parse_create_category(response)
            },
            |store| Ok(store.create_category(input)),
        )
    }

    pub fn update_category(&self, id: &str, input: &CategoryInput) -> Result<Category, ApiError> {
        input.validate()?;
        self.policy.run(
            "update_category",
            || {
                let response = self.send(self.client.build_update_category(id, input)?)?;
                self.client.parse_update_category(response)
            },
            |store| store.update_category(id, input),
        )
    }

    /// The server refuses to delete a category that events still reference;
    /// that refusal surfaces as an `Other` error carrying the server message.
    pub fn delete_category(&self, id: &str) -> Result<(), ApiError> {
        self.policy.run(
            "delete_category",
            || {
                let response = self.send(self.client.build_delete_category(id))?;
                self.client.parse_delete_category(response)
            },
            |store| {
                store.delete_category(id);
                Ok(())
            },
        )
    }

    // ---- events ----

    pub fn get_events(&self, filter: &EventFilter) -> Result<Vec<Event>, ApiError> {
        self.policy.run(
            "get_events",
            || {
                let response = self.send(self.client.build_list_events(filter))?;
                self.client.parse_list_events(response)
            },
            |store| Ok(store.events(filter)),
        )
    }

    pub fn get_event(&self, id: &str) -> Result<Event, ApiError> {
        self.policy.run(
            "get_event",
            || {
                let response = self.send(self.client.build_get_event(id))?;
                self.client.parse_get_event(response)
            },
            |store| store.event(id),
        )
    }

    pub fn create_event(&self, input: &CreateEventData) -> Result<Event, ApiError> {
        input.validate()?;
        self.policy.run(
            "create_event",
            || {
                let response = self.send(self.client.build_create_event(input)?)?;
                self.client.parse_create_event(response)
            },
            |store| Ok(store.create_event(input)),
        )
    }

    pub fn update_event(&self, id: &str, input: &UpdateEventData) -> Result<Event, ApiError> {
        input.validate()?;
        self.policy.run(
            "update_event",
            || {
                let response = self.send(self.client.build_update_event(id, input)?)?;
                self.client.parse_update_event(response)
            },
            |store| store.update_event(id, input),
        )
    }

    pub fn delete_event(&self, id: &str) -> Result<(), ApiError> {
        self.policy.run(
            "delete_event",
            || {
                let response = self.send(self.client.build_delete_event(id))?;
                self.client.parse_delete_event(response)
            },
            |store| {
                store.delete_event(id);
                Ok(())
            },
        )
    }

    // ---- liveness ----

    /// `true` when the service answers its root endpoint. Demo mode is
    /// always healthy; failures of any kind report `false`.
    pub fn health_check(&self) -> bool {
        if self.is_demo_mode() {
            return true;
        }
        let request = self.client.build_health_check(self.config.health_timeout);
        match self.send(request) {
            Ok(response) => self.client.parse_health_check(response),
            Err(err) => {
                debug!(error = %err, "health check failed");
                false
            }
        }
    }
}
