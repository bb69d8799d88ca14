// Infrastructure layer - External dependencies and adapters
pub mod assistant_relay;
pub mod chart_mapper;
pub mod chunked_json;
pub mod config;
pub mod http_repository;
pub mod http_response;
pub mod object_store;
