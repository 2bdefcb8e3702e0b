//! Gateway error taxonomy
//!
//! Every failure of a send attempt ends up as exactly one [`ProxyError`]:
//!
//! | Observed                                   | Kind            | HTTP status        |
//! |--------------------------------------------|-----------------|--------------------|
//! | probe failed / connection refused          | Unreachable     | 503                |
//! | webhook answered with a non-success status | UpstreamStatus  | upstream status    |
//! | no response within the wait                | UpstreamTimeout | 502                |
//! | local failure before the network call      | ConfigError     | 500                |
//!
//! Nothing here retries. Errors are reported once, immediately.

use axum::{
    Json,
    body::Body,
    http::{Response, StatusCode},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

/// Raw outcome of a failed transport call, before classification
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The connection could not be established
    #[error("connection failed: {0}")]
    Connect(String),

    /// The request was sent but the wait ran out
    #[error("timed out: {0}")]
    Timeout(String),

    /// The request was sent but no usable response came back
    #[error("no response: {0}")]
    NoResponse(String),

    /// The upstream answered with a non-success status
    #[error("upstream returned status {status}")]
    Status { status: u16, body: String },

    /// Failure before anything went over the wire
    #[error("{0}")]
    Local(String),
}

impl TransportError {
    /// Classify a reqwest failure
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_connect() {
            TransportError::Connect(error.to_string())
        } else if error.is_timeout() {
            TransportError::Timeout(error.to_string())
        } else if error.is_builder() {
            TransportError::Local(error.to_string())
        } else {
            TransportError::NoResponse(error.to_string())
        }
    }
}

/// Client-visible category of a [`ProxyError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxyErrorKind {
    Unreachable,
    UpstreamStatus,
    UpstreamTimeout,
    ConfigError,
}

impl ProxyErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProxyErrorKind::Unreachable => "unreachable",
            ProxyErrorKind::UpstreamStatus => "upstream_status",
            ProxyErrorKind::UpstreamTimeout => "upstream_timeout",
            ProxyErrorKind::ConfigError => "config_error",
        }
    }
}

impl std::fmt::Display for ProxyErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors reported by the gateway for a single send attempt
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProxyError {
    /// The upstream service is not running or refused the connection
    #[error("Upstream unreachable: {0}")]
    Unreachable(String),

    /// The upstream answered with a non-success status
    #[error("Upstream error: status {status}")]
    UpstreamStatus { status: u16, body: String },

    /// The request went out but no response arrived in time
    #[error("Upstream timeout: {0}")]
    UpstreamTimeout(String),

    /// Local failure before the network call
    #[error("Proxy configuration error: {0}")]
    Config(String),
}

impl ProxyError {
    pub fn kind(&self) -> ProxyErrorKind {
        match self {
            ProxyError::Unreachable(_) => ProxyErrorKind::Unreachable,
            ProxyError::UpstreamStatus { .. } => ProxyErrorKind::UpstreamStatus,
            ProxyError::UpstreamTimeout(_) => ProxyErrorKind::UpstreamTimeout,
            ProxyError::Config(_) => ProxyErrorKind::ConfigError,
        }
    }

    /// Diagnostic detail (the upstream body for status errors)
    pub fn detail(&self) -> &str {
        match self {
            ProxyError::Unreachable(detail)
            | ProxyError::UpstreamTimeout(detail)
            | ProxyError::Config(detail) => detail,
            ProxyError::UpstreamStatus { body, .. } => body,
        }
    }

    /// Status code reported by the upstream, if it answered at all
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            ProxyError::UpstreamStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Status code the proxy service answers with
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::Unreachable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ProxyError::UpstreamStatus { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ProxyError::UpstreamTimeout(_) => StatusCode::BAD_GATEWAY,
            ProxyError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short hint for operators about what to check
    pub fn guidance(&self) -> &'static str {
        match self {
            ProxyError::Unreachable(_) => "Make sure the workflow service is running",
            ProxyError::UpstreamStatus { .. } => "The workflow service returned an error",
            ProxyError::UpstreamTimeout(_) => {
                "The workflow service did not respond. Check if the workflow is active."
            }
            ProxyError::Config(_) => "The proxy could not build the upstream request",
        }
    }

    /// JSON body sent to clients of the proxy service
    pub fn to_body(&self) -> Value {
        match self {
            ProxyError::Unreachable(detail) => json!({
                "error": "upstream service not available",
                "kind": self.kind(),
                "message": self.guidance(),
                "details": detail,
            }),
            ProxyError::UpstreamStatus { status, body } => json!({
                "error": "upstream server error",
                "kind": self.kind(),
                "status": status,
                "data": serde_json::from_str::<Value>(body)
                    .unwrap_or_else(|_| Value::String(body.clone())),
                "body": body,
            }),
            ProxyError::UpstreamTimeout(detail) => json!({
                "error": "upstream server timeout",
                "kind": self.kind(),
                "message": self.guidance(),
                "details": detail,
            }),
            ProxyError::Config(detail) => json!({
                "error": "proxy configuration error",
                "kind": self.kind(),
                "message": detail,
            }),
        }
    }

    /// Rebuild an error from a proxy service error response
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let raw = String::from_utf8_lossy(body).into_owned();
        let Ok(json) = serde_json::from_slice::<Value>(body) else {
            return ProxyError::UpstreamStatus { status, body: raw };
        };

        let kind = json
            .get("kind")
            .cloned()
            .and_then(|k| serde_json::from_value::<ProxyErrorKind>(k).ok());
        let text_field = |name: &str| {
            json.get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_default()
        };

        match kind {
            Some(ProxyErrorKind::Unreachable) => ProxyError::Unreachable(text_field("details")),
            Some(ProxyErrorKind::UpstreamTimeout) => {
                ProxyError::UpstreamTimeout(text_field("details"))
            }
            Some(ProxyErrorKind::ConfigError) => ProxyError::Config(text_field("message")),
            Some(ProxyErrorKind::UpstreamStatus) => {
                let upstream_status = json
                    .get("status")
                    .and_then(Value::as_u64)
                    .and_then(|s| u16::try_from(s).ok())
                    .unwrap_or(status);
                // `body` is the upstream text verbatim; `data` is its parsed form
                let body = match json.get("body").or_else(|| json.get("data")) {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => String::new(),
                };
                ProxyError::UpstreamStatus {
                    status: upstream_status,
                    body,
                }
            }
            None => ProxyError::UpstreamStatus { status, body: raw },
        }
    }
}

impl From<TransportError> for ProxyError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Connect(detail) => ProxyError::Unreachable(detail),
            TransportError::Timeout(detail) | TransportError::NoResponse(detail) => {
                ProxyError::UpstreamTimeout(detail)
            }
            TransportError::Status { status, body } => ProxyError::UpstreamStatus { status, body },
            TransportError::Local(detail) => ProxyError::Config(detail),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response<Body> {
        (self.status_code(), Json(self.to_body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_transport_mapping() {
        assert_eq!(
            ProxyError::from(TransportError::Connect("refused".into())),
            ProxyError::Unreachable("refused".into())
        );
        assert_eq!(
            ProxyError::from(TransportError::Timeout("60s".into())),
            ProxyError::UpstreamTimeout("60s".into())
        );
        assert_eq!(
            ProxyError::from(TransportError::NoResponse("reset".into())),
            ProxyError::UpstreamTimeout("reset".into())
        );
        assert_eq!(
            ProxyError::from(TransportError::Status {
                status: 404,
                body: "not found".into()
            }),
            ProxyError::UpstreamStatus {
                status: 404,
                body: "not found".into()
            }
        );
        assert_eq!(
            ProxyError::from(TransportError::Local("bad url".into())),
            ProxyError::Config("bad url".into())
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ProxyError::Unreachable(String::new()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ProxyError::UpstreamStatus {
                status: 404,
                body: String::new()
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ProxyError::UpstreamTimeout(String::new()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ProxyError::Config(String::new()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_invalid_upstream_status_falls_back_to_bad_gateway() {
        let err = ProxyError::UpstreamStatus {
            status: 42,
            body: String::new(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_accessors() {
        let err = ProxyError::UpstreamStatus {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(err.kind(), ProxyErrorKind::UpstreamStatus);
        assert_eq!(err.detail(), "boom");
        assert_eq!(err.upstream_status(), Some(500));

        let err = ProxyError::UpstreamTimeout("slow".into());
        assert_eq!(err.kind().as_str(), "upstream_timeout");
        assert_eq!(err.detail(), "slow");
        assert_eq!(err.upstream_status(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ProxyError::UpstreamStatus {
                status: 404,
                body: String::new()
            }
            .to_string(),
            "Upstream error: status 404"
        );
        assert_eq!(
            ProxyError::Config("missing field".into()).to_string(),
            "Proxy configuration error: missing field"
        );
    }

    #[test]
    fn test_body_round_trips_through_from_response() {
        let errors = [
            ProxyError::Unreachable("connection refused".into()),
            ProxyError::UpstreamTimeout("deadline elapsed".into()),
            ProxyError::Config("bad envelope".into()),
            ProxyError::UpstreamStatus {
                status: 404,
                body: r#"{"message":"webhook not registered"}"#.into(),
            },
        ];

        for err in errors {
            let body = serde_json::to_vec(&err.to_body()).unwrap();
            let rebuilt = ProxyError::from_response(err.status_code().as_u16(), &body);
            assert_eq!(rebuilt, err);
        }
    }

    #[test]
    fn test_upstream_body_whitespace_survives_round_trip() {
        let err = ProxyError::UpstreamStatus {
            status: 404,
            body: "{\"code\": 404,  \"message\": \"not registered\"}".into(),
        };

        let body = err.to_body();
        assert_eq!(body["data"]["message"], "not registered");

        let bytes = serde_json::to_vec(&body).unwrap();
        assert_eq!(ProxyError::from_response(404, &bytes), err);
    }

    #[test]
    fn test_from_response_falls_back_to_data() {
        let err = ProxyError::from_response(
            502,
            br#"{"kind":"upstream_status","status":500,"data":{"a":1}}"#,
        );
        assert_eq!(
            err,
            ProxyError::UpstreamStatus {
                status: 500,
                body: r#"{"a":1}"#.into()
            }
        );
    }

    #[test]
    fn test_from_response_without_kind_is_status_error() {
        let err = ProxyError::from_response(418, b"I'm a teapot");
        assert_eq!(
            err,
            ProxyError::UpstreamStatus {
                status: 418,
                body: "I'm a teapot".into()
            }
        );

        let err = ProxyError::from_response(400, br#"{"error":"bad"}"#);
        assert_eq!(err.upstream_status(), Some(400));
        assert_eq!(err.detail(), r#"{"error":"bad"}"#);
    }

    #[tokio::test]
    async fn test_into_response_upstream_status_passthrough() {
        let err = ProxyError::UpstreamStatus {
            status: 404,
            body: r#"{"message":"not registered"}"#.into(),
        };

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["kind"], "upstream_status");
        assert_eq!(json["status"], 404);
        assert_eq!(json["data"]["message"], "not registered");
    }

    #[tokio::test]
    async fn test_into_response_unreachable() {
        let response = ProxyError::Unreachable("refused".into()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "upstream service not available");
        assert_eq!(json["details"], "refused");
    }
}
