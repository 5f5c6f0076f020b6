pub mod filters;
pub mod projector;
pub mod store_repo;
