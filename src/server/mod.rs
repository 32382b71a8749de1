//! Server Module
//!
//! Server-side infrastructure for the HTTP service: configuration loading,
//! the shared application state, and router initialization.
//!
//! - **`config`** - Environment-driven configuration
//! - **`state`** - `AppState` and `FromRef` implementations
//! - **`init`** - Pool creation, migrations, and app assembly

pub mod config;
pub mod init;
pub mod state;

pub use config::AppConfig;
pub use init::create_app;
pub use state::AppState;
