// Application layer - use cases over the analytics repository
pub mod analytics_repository;
pub mod dashboard_service;
pub mod query_service;
pub mod session_store;
pub mod streaming_service;
pub mod table_service;

#[cfg(test)]
pub mod fake_repository;
