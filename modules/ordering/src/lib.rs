//! Store ordering over an Airtable-compatible base.
//!
//! Three operations are exposed over HTTP:
//! - list the ordering windows of a store with the quantities already ordered
//! - place an order for one item on one ordering date
//! - report, per catalog item, whether it can be ordered in a date range

pub mod module;
pub use module::OrderingModule;

pub mod config;
pub use config::OrderingConfig;

#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod errors;
#[doc(hidden)]
pub mod infra;
