//! # securenet-api
//!
//! HTTP layer for the SecureNet hub built on Axum.
//!
//! Provides the `/hub` WebSocket upgrade, health endpoints, CORS and
//! request logging middleware, and the mapping from `AppError` to HTTP
//! responses.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
