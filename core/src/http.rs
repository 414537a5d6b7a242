//! HTTP transport types and the seam where real I/O happens.
//!
//! # Design
//! Requests and responses are plain data. [`EventsClient`](crate::EventsClient)
//! builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network; a [`Transport`] executes the round-trip in between.
//! Tests substitute a fake transport to drive every failure class without
//! sockets.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute; `query` pairs are appended by the transport.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub timeout: Duration,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Why a transport could not produce an `HttpResponse`.
///
/// Non-2xx statuses are not transport errors; they come back as responses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request deadline elapsed.
    #[error("timed out")]
    Timeout,

    /// Connection refused, reset, DNS failure and the like.
    #[error("unreachable: {0}")]
    Unreachable(String),

    #[error("{0}")]
    Other(String),
}

/// Executes an `HttpRequest` against the network.
///
/// Implementations must not retry and must honor `HttpRequest::timeout`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}
