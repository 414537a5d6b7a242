//! Request/response pipeline wrapped around every transport call.
//!
//! The request stage records method and URL when running in a
//! development runtime and otherwise passes the request through untouched.
//! The response stage turns transport failures and non-2xx statuses into
//! classified [`ApiError`]s. Nothing here retries.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, TransportError};

/// The interceptor pair applied to each round-trip.
#[derive(Debug, Clone, Copy, Default)]
pub struct Interceptors {
    log_requests: bool,
}

impl Interceptors {
    pub fn new(log_requests: bool) -> Self {
        Self { log_requests }
    }

    pub fn logs_requests(&self) -> bool {
        self.log_requests
    }

    pub fn on_request(&self, request: HttpRequest) -> HttpRequest {
        if self.log_requests {
            debug!(method = request.method.as_str(), url = %request.url, "API request");
        }
        request
    }

    pub fn on_response(
        &self,
        outcome: Result<HttpResponse, TransportError>,
    ) -> Result<HttpResponse, ApiError> {
        let err = match outcome {
            Ok(response) if is_success(response.status) => return Ok(response),
            Ok(response) => classify_status(&response),
            Err(transport) => classify_transport(transport),
        };
        warn!(kind = ?err.kind(), error = %err, "API error");
        Err(err)
    }
}

pub(crate) fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Map a failure that produced no response onto the error taxonomy.
pub fn classify_transport(err: TransportError) -> ApiError {
    match err {
        TransportError::Timeout => ApiError::Timeout,
        TransportError::Unreachable(detail) => ApiError::NetworkUnreachable(detail),
        TransportError::Other(message) => ApiError::Other {
            status: None,
            message,
        },
    }
}

/// Map a non-2xx response onto the error taxonomy.
///
/// A 400/422 body shaped as `{field: [messages]}` becomes `Validation`; a
/// body carrying an `error` or `detail` string surfaces that message.
pub fn classify_status(response: &HttpResponse) -> ApiError {
    let status = response.status;
    match status {
        404 => ApiError::NotFound,
        500..=599 => ApiError::ServerError {
            status,
            body: response.body.clone(),
        },
        _ => {
            let parsed: Option<Value> = serde_json::from_str(&response.body).ok();
            if let Some(message) = parsed.as_ref().and_then(server_message) {
                return ApiError::Other {
                    status: Some(status),
                    message,
                };
            }
            if matches!(status, 400 | 422) {
                if let Some(fields) = parsed.as_ref().and_then(field_errors) {
                    return ApiError::Validation { fields };
                }
            }
            ApiError::Other {
                status: Some(status),
                message: format!("HTTP {status}"),
            }
        }
    }
}

fn server_message(body: &Value) -> Option<String> {
    let object = body.as_object()?;
    ["error", "detail"]
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

fn field_errors(body: &Value) -> Option<BTreeMap<String, Vec<String>>> {
    let object = body.as_object()?;
    let mut fields = BTreeMap::new();
    for (field, value) in object {
        let messages = match value {
            Value::String(s) => vec![s.clone()],
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => return None,
        };
        fields.insert(field.clone(), messages);
    }
    (!fields.is_empty()).then_some(fields)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::ErrorKind;
    use crate::http::HttpMethod;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn success_passes_through() {
        let out = Interceptors::default().on_response(Ok(response(201, "{}")));
        assert_eq!(out.unwrap().status, 201);
    }

    #[test]
    fn statuses_classify_by_class() {
        assert_eq!(classify_status(&response(404, "")).kind(), ErrorKind::NotFound);
        assert_eq!(classify_status(&response(500, "boom")).kind(), ErrorKind::ServerError);
        assert_eq!(classify_status(&response(503, "")).kind(), ErrorKind::ServerError);
        assert_eq!(classify_status(&response(403, "")).kind(), ErrorKind::Other);
    }

    #[test]
    fn field_map_becomes_validation() {
        let err = classify_status(&response(
            400,
            r#"{"title":["Title cannot be empty."],"venue":"Venue cannot be empty."}"#,
        ));
        let fields = err.fields().unwrap();
        assert_eq!(fields["title"], vec!["Title cannot be empty."]);
        assert_eq!(fields["venue"], vec!["Venue cannot be empty."]);
    }

    #[test]
    fn error_message_is_surfaced_verbatim() {
        let err = classify_status(&response(
            400,
            r#"{"error":"Cannot delete category with existing events"}"#,
        ));
        assert_eq!(err.kind(), ErrorKind::Other);
        assert_eq!(err.to_string(), "Cannot delete category with existing events");
    }

    #[test]
    fn unparseable_client_error_is_other() {
        let err = classify_status(&response(400, "<html>bad</html>"));
        assert!(matches!(err, ApiError::Other { status: Some(400), .. }));
    }

    #[test]
    fn transport_failures_classify() {
        assert_eq!(classify_transport(TransportError::Timeout).kind(), ErrorKind::Timeout);
        assert_eq!(
            classify_transport(TransportError::Unreachable("refused".into())).kind(),
            ErrorKind::NetworkUnreachable
        );
        assert_eq!(
            classify_transport(TransportError::Other("tls".into())).kind(),
            ErrorKind::Other
        );
    }

    #[tracing_test::traced_test]
    #[test]
    fn request_stage_logs_only_when_enabled() {
        let request = HttpRequest {
            method: HttpMethod::Delete,
            url: "http://localhost:8000/api/events/7/".to_string(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            timeout: Duration::from_secs(10),
        };
        let passed = Interceptors::new(false).on_request(request.clone());
        assert_eq!(passed.url, request.url);
        assert!(!logs_contain("API request"));

        Interceptors::new(true).on_request(request);
        assert!(logs_contain("API request"));
        assert!(logs_contain("DELETE"));
    }
}
