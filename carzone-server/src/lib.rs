//! carzone-server: car and engine records over HTTP
//!
//! Layers, leaf first: `db` (PostgreSQL stores and transactions),
//! `models` (request validation), `service` (validation + delegation),
//! `auth` (JWT and credentials) and `http` (axum handlers and middleware).

pub mod auth;
pub mod db;
pub mod http;
pub mod models;
pub mod service;

pub use auth::{AuthConfig, CredentialStore, StaticCredentials, TokenIssuer};
pub use db::{DbConfig, DbError, RetryPolicy};
pub use http::{run_server, ServerConfig};
