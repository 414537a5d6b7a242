//! Blocking [`Transport`] backed by `ureq`.

use std::io::ErrorKind as IoKind;

use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

/// Executes requests with a shared `ureq::Agent`.
///
/// Status codes are returned as data rather than errors so the response
/// stage of the pipeline decides what a 4xx/5xx means.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let result = match (req.method, req.body.as_deref()) {
            (HttpMethod::Get, _) => prepare(self.agent.get(&req.url), req).call(),
            (HttpMethod::Delete, _) => prepare(self.agent.delete(&req.url), req).call(),
            (HttpMethod::Post, Some(body)) => {
                prepare(self.agent.post(&req.url), req).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => prepare(self.agent.post(&req.url), req).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                prepare(self.agent.put(&req.url), req).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => prepare(self.agent.put(&req.url), req).send_empty(),
        };
        let mut response = result.map_err(|e| map_error(&e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| map_error(&e))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn prepare<B>(mut builder: ureq::RequestBuilder<B>, req: &HttpRequest) -> ureq::RequestBuilder<B> {
    for (key, value) in &req.query {
        builder = builder.query(key, value);
    }
    for (name, value) in &req.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder.config().timeout_global(Some(req.timeout)).build()
}

fn map_error(err: &ureq::Error) -> TransportError {
    match err {
        ureq::Error::Timeout(_) => TransportError::Timeout,
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => {
            TransportError::Unreachable(err.to_string())
        }
        ureq::Error::Io(io) => match io.kind() {
            IoKind::TimedOut | IoKind::WouldBlock => TransportError::Timeout,
            IoKind::ConnectionRefused
            | IoKind::ConnectionReset
            | IoKind::ConnectionAborted
            | IoKind::NotConnected
            | IoKind::AddrNotAvailable
            | IoKind::BrokenPipe
            | IoKind::UnexpectedEof => TransportError::Unreachable(io.to_string()),
            _ => TransportError::Other(io.to_string()),
        },
        other => TransportError::Other(other.to_string()),
    }
}
