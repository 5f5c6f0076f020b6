use elis_errors::{Problem, ValidationViolation};

use crate::domain::error::DomainError;
use crate::errors;

pub type ApiResult<T> = Result<T, Problem>;

fn trace_id() -> Option<String> {
    tracing::Span::current()
        .id()
        .map(|id| id.into_u64().to_string())
}

fn finalize(problem: Problem, instance: &str) -> Problem {
    let problem = problem.with_instance(instance);
    match trace_id() {
        Some(id) => problem.with_trace_id(id),
        None => problem,
    }
}

/// Maps a domain error to the problem returned for a request on `instance`.
///
/// Upstream details are logged, not returned.
pub fn domain_error_to_problem(e: &DomainError, instance: &str) -> Problem {
    let problem = match e {
        DomainError::InvalidInput { field, message } => errors::INVALID_INPUT
            .as_problem(e.to_string())
            .with_violation(ValidationViolation::new(field.as_str(), message.as_str())),
        DomainError::NotFound { .. } => errors::NOT_FOUND.as_problem(e.to_string()),
        DomainError::MalformedRecord {
            record_id, field, ..
        } => {
            tracing::error!(error = %e, "record could not be decoded");
            errors::MALFORMED_RECORD.as_problem(format!(
                "record {record_id} has a malformed '{field}' field"
            ))
        }
        DomainError::UpstreamUnavailable(_) => {
            tracing::error!(error = %e, "record store call failed");
            errors::UPSTREAM_UNAVAILABLE.as_problem("the record store could not be reached")
        }
        DomainError::UpstreamTimeout(_) => {
            tracing::error!(error = %e, "record store call timed out");
            errors::UPSTREAM_TIMEOUT.as_problem("the record store did not answer in time")
        }
    };
    finalize(problem, instance)
}

/// Problem for a request no route matches.
pub fn route_not_found(path: &str) -> Problem {
    finalize(
        errors::ROUTE_NOT_FOUND.as_problem(format!("no route for {path}")),
        path,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::Entity;
    use axum::http::StatusCode;
    use tracing_test::traced_test;

    #[test]
    fn maps_each_domain_error_to_its_status() {
        let cases = [
            (DomainError::invalid_input("dayFrom", "is required"), StatusCode::BAD_REQUEST),
            (DomainError::not_found(Entity::Item, "7"), StatusCode::NOT_FOUND),
            (DomainError::malformed("recX", "placed", "eof"), StatusCode::BAD_GATEWAY),
            (
                DomainError::UpstreamUnavailable("HTTP 401".to_owned()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                DomainError::UpstreamTimeout("timed out".to_owned()),
                StatusCode::GATEWAY_TIMEOUT,
            ),
        ];

        for (err, status) in cases {
            let p = domain_error_to_problem(&err, "/1001/orders");
            assert_eq!(p.status, status, "{err}");
            assert_eq!(p.instance, "/1001/orders");
        }
    }

    #[test]
    fn invalid_input_lists_the_field() {
        let p = domain_error_to_problem(
            &DomainError::invalid_input("pcs", "must be between 1 and 9999"),
            "/1001/orders",
        );
        assert_eq!(p.code, "ORDERING_INVALID_INPUT");
        assert_eq!(
            p.errors,
            Some(vec![ValidationViolation::new("pcs", "must be between 1 and 9999")])
        );
    }

    #[test]
    #[traced_test]
    fn upstream_messages_are_not_echoed() {
        let p = domain_error_to_problem(
            &DomainError::UpstreamUnavailable("HTTP 401: invalid token pat-xyz".to_owned()),
            "/1001/items",
        );
        assert!(!p.detail.contains("pat-xyz"));
        assert_eq!(p.code, "ORDERING_UPSTREAM_UNAVAILABLE");
        assert!(logs_contain("HTTP 401: invalid token"));
    }
}
