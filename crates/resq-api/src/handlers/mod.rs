//! Route handlers

pub mod admin;
pub mod alerts;
pub mod auth;
pub mod health;
pub mod users;
