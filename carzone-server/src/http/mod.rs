//! HTTP server layer
//!
//! Axum server with:
//! - Bearer-token middleware on all entity routes
//! - Per-request timeout on service calls
//! - Request tracing
//! - Graceful shutdown
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod server;


pub use error::ApiError;
pub use middleware::AuthenticatedUser;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
