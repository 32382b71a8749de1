/**
 * Domain Error Types
 *
 * This module defines the typed failures that domain operations return
 * and their conversion to HTTP responses.
 */

pub mod types;
pub mod conversion;

pub use types::DomainError;
