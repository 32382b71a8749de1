//! End-to-end tests through the HTTP router

pub mod http_test;
