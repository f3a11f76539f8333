//! HTTP API Layer
//!
//! REST surface under `/api/v1` for listing, filtering and mutating jobs.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use handler::AppState;
pub use server::{router, HttpServer, HttpServerConfig, ServerError, ServerHandle};
