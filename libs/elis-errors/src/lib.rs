//! Error payloads shared by ELIS services.
//!
//! - RFC 9457 Problem Details (`Problem`), rendered as `application/problem+json`
//! - Static error catalog entries (`ErrDef`) that modules declare once and
//!   turn into problems at the API boundary

pub mod catalog;
pub mod problem;

pub use catalog::ErrDef;
pub use problem::{APPLICATION_PROBLEM_JSON, Problem, ValidationViolation};
