// Application layer - Use cases and the collaborator traits they depend on
pub mod assistant_service;
pub mod glucose_repository;
pub mod record_service;
pub mod streaming_service;
pub mod timeline_service;
