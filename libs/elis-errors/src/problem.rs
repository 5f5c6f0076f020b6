//! RFC 9457 Problem Details.

use http::StatusCode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Content type for Problem Details as per RFC 9457.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires &T signature
fn serialize_status<S>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u16(status.as_u16())
}

fn deserialize_status<'de, D>(deserializer: D) -> Result<StatusCode, D::Error>
where
    D: Deserializer<'de>,
{
    let code = u16::deserialize(deserializer)?;
    StatusCode::from_u16(code).map_err(serde::de::Error::custom)
}

/// RFC 9457 problem body returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[must_use]
pub struct Problem {
    /// URI reference identifying the problem type.
    #[serde(rename = "type")]
    pub type_url: String,
    /// Short summary of the problem type.
    pub title: String,
    /// HTTP status, serialized as a number.
    #[serde(serialize_with = "serialize_status", deserialize_with = "deserialize_status")]
    pub status: StatusCode,
    /// Explanation specific to this occurrence.
    pub detail: String,
    /// Request path the problem occurred on.
    pub instance: String,
    /// Machine-readable application error code.
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    /// Offending inputs for 4xx problems.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationViolation>>,
}

/// One rejected input field.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationViolation {
    /// Field name as the client sent it, e.g. `dayFrom`
    pub field: String,
    pub message: String,
}

impl ValidationViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_owned(),
            title: title.into(),
            status,
            detail: detail.into(),
            instance: String::new(),
            code: String::new(),
            trace_id: None,
            errors: None,
        }
    }

    pub fn with_type(mut self, type_url: impl Into<String>) -> Self {
        self.type_url = type_url.into();
        self
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = uri.into();
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Appends a violation, creating the list on first use.
    pub fn with_violation(mut self, violation: ValidationViolation) -> Self {
        self.errors.get_or_insert_with(Vec::new).push(violation);
        self
    }

    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for Problem {
    fn into_response(self) -> axum::response::Response {
        use axum::http::{HeaderValue, header};

        if self.is_server_error() {
            tracing::error!(
                status = self.status.as_u16(),
                code = %self.code,
                instance = %self.instance,
                detail = %self.detail,
                "request failed"
            );
        } else {
            tracing::debug!(
                status = self.status.as_u16(),
                code = %self.code,
                instance = %self.instance,
                "request rejected"
            );
        }

        let status = self.status;
        let mut resp = axum::Json(self).into_response();
        *resp.status_mut() = status;
        resp.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
        );
        resp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_violations() {
        let p = Problem::new(StatusCode::BAD_REQUEST, "Invalid input", "dayFrom is required")
            .with_code("ORDERING_INVALID_INPUT")
            .with_instance("/1001/orders")
            .with_violation(ValidationViolation::new("dayFrom", "is required"))
            .with_violation(ValidationViolation::new("dayTo", "is required"));

        assert_eq!(p.status, StatusCode::BAD_REQUEST);
        assert_eq!(p.instance, "/1001/orders");
        assert_eq!(p.errors.as_ref().map(Vec::len), Some(2));
        assert!(!p.is_server_error());
    }

    #[test]
    fn status_serializes_as_number_and_empty_options_are_omitted() {
        let p = Problem::new(StatusCode::NOT_FOUND, "Not found", "store 9 not found");
        let json = serde_json::to_value(&p).unwrap();

        assert_eq!(json["status"], 404);
        assert_eq!(json["type"], "about:blank");
        assert!(json.get("trace_id").is_none());
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn deserializes_minimal_body() {
        let json = r#"{"type":"about:blank","title":"Bad gateway","status":502,"detail":"x","instance":"/a","code":"C"}"#;
        let p: Problem = serde_json::from_str(json).unwrap();
        assert_eq!(p.status, StatusCode::BAD_GATEWAY);
        assert!(p.is_server_error());
        assert!(p.errors.is_none());
    }
}
