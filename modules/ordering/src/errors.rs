//! Error catalog of the ordering API.

use axum::http::StatusCode;
use elis_errors::ErrDef;

pub const INVALID_INPUT: ErrDef = ErrDef {
    status: StatusCode::BAD_REQUEST,
    title: "Invalid input",
    code: "ORDERING_INVALID_INPUT",
    type_url: "urn:elis:error:ordering:invalid-input",
};

pub const NOT_FOUND: ErrDef = ErrDef {
    status: StatusCode::NOT_FOUND,
    title: "Not found",
    code: "ORDERING_NOT_FOUND",
    type_url: "urn:elis:error:ordering:not-found",
};

pub const MALFORMED_RECORD: ErrDef = ErrDef {
    status: StatusCode::BAD_GATEWAY,
    title: "Malformed record",
    code: "ORDERING_MALFORMED_RECORD",
    type_url: "urn:elis:error:ordering:malformed-record",
};

pub const UPSTREAM_UNAVAILABLE: ErrDef = ErrDef {
    status: StatusCode::SERVICE_UNAVAILABLE,
    title: "Record store unavailable",
    code: "ORDERING_UPSTREAM_UNAVAILABLE",
    type_url: "urn:elis:error:ordering:upstream-unavailable",
};

pub const UPSTREAM_TIMEOUT: ErrDef = ErrDef {
    status: StatusCode::GATEWAY_TIMEOUT,
    title: "Record store timeout",
    code: "ORDERING_UPSTREAM_TIMEOUT",
    type_url: "urn:elis:error:ordering:upstream-timeout",
};

/// Answer for paths no route matches.
pub const ROUTE_NOT_FOUND: ErrDef = ErrDef {
    status: StatusCode::NOT_FOUND,
    title: "Not found",
    code: "ROUTE_NOT_FOUND",
    type_url: "urn:elis:error:route-not-found",
};
