//! # resq-api
//!
//! REST API and WebSocket live feed for the ResQ admin dashboard, built with
//! the Axum framework.

pub mod extractors;
pub mod feed;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run, run_server};
pub use state::AppState;
