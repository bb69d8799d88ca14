// Domain layer - Pure types and algorithms, no I/O
pub mod assistant;
pub mod dashboard;
pub mod glucose;
pub mod summary;
pub mod timeline;
pub mod view_state;
