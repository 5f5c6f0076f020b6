pub mod enrichment;
pub mod error;
pub mod model;
pub mod repo;
pub mod service;
