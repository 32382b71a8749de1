//! Shared test utilities

pub mod database;
pub mod fixtures;
