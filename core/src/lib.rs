//! Resilient API-access layer for the events service.
//!
//! # Overview
//! Resolves a base endpoint and operating mode from the environment, issues
//! category and event CRUD calls through a request/response pipeline, and
//! keeps callers working when the service is unreachable by answering from
//! an in-memory demo dataset.
//!
//! # Design
//! - `EventsClient` is stateless and does no I/O: `build_*` produces an
//!   `HttpRequest`, `parse_*` consumes an `HttpResponse`.
//! - `Transport` is the only place I/O happens; `UreqTransport` is the
//!   default, tests inject fakes.
//! - `Api` is the client context. It owns the resolved config and a
//!   `FallbackPolicy`, which owns the demo store. Mode is fixed for the
//!   lifetime of an `Api`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod demo;
pub mod error;
pub mod fallback;
pub mod http;
pub mod interceptor;
pub mod transport;
pub mod types;

pub use api::Api;
pub use client::EventsClient;
pub use config::{ClientConfig, ConfigError, Mode, Runtime};
pub use demo::DemoStore;
pub use error::{ApiError, ErrorKind};
pub use fallback::FallbackPolicy;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use interceptor::Interceptors;
pub use transport::UreqTransport;
pub use types::{Category, CategoryInput, CreateEventData, Event, EventFilter, UpdateEventData};
