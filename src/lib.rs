//! Main library crate for the Week in Music admin service

// Re-export the main modules needed for integration tests
pub mod common;
pub mod config;
pub mod domain;
pub mod github;
pub mod observability;
pub mod pipeline;
pub mod server;
pub mod storage;

// Re-export commonly used types
pub use common::error::{Result, WeekError};
pub use domain::{Event, ImportMode, ImportScope, WeekData};
