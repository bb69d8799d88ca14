//! Glucose timeline service: aligns a day's glucose readings with medication
//! and food events and serves the result to the dashboard.
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
