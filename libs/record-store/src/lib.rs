//! Client for an Airtable-compatible record store.
//!
//! The store is reached through the [`RecordStore`] trait so callers can be
//! tested against an in-memory implementation. [`AirtableClient`] is the HTTP
//! implementation for the Airtable REST API v0.
//!
//! Filters are built as [`Formula`] trees and rendered to the store's formula
//! language only when a request is sent, with string literals escaped.

pub mod airtable;
pub mod client;
pub mod config;
pub mod error;
pub mod formula;
pub mod query;
pub mod record;

pub use airtable::AirtableClient;
pub use client::RecordStore;
pub use config::RecordStoreConfig;
pub use error::StoreError;
pub use formula::{CompareOp, Formula};
pub use query::{SelectQuery, Sort, SortDirection};
pub use record::{FieldMap, Record};
