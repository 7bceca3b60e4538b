// Infrastructure layer - External dependencies and adapters
pub mod api_repository;
pub mod chunked_stream;
pub mod config;
pub mod http_response;
