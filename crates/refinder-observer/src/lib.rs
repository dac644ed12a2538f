//! Observer API server for Refinder.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws/character`) streaming every published
//!   [`CharacterUpdate`] via [`tokio::sync::broadcast`]
//! - **REST endpoints** for the latest update and a liveness check
//! - **Minimal HTML page** (`GET /`) summarizing the active character
//!
//! # Architecture
//!
//! The engine publishes into [`AppState`] without blocking: the latest
//! update is swapped in and broadcast to whoever is listening. REST reads
//! and `WebSocket` clients never hold anything the sync loop waits on.
//!
//! [`CharacterUpdate`]: refinder_types::CharacterUpdate

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
