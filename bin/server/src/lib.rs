//! lingo-tutor HTTP server.
//!
//! This crate wires configuration, provider clients and the tutoring service
//! into an axum router.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, StartupError};
pub use routes::router;
pub use state::{AppState, build_state, spawn_session_cleanup};
