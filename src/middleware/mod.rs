/**
 * Request Middleware
 *
 * Extractors that run before handlers, currently just authentication.
 */

pub mod auth;
