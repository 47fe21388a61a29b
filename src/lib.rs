//! Bearer-token authentication gate for an HTTP gateway.
//!
//! Requests under protected path prefixes must carry
//! `Authorization: Bearer <jwt>` signed with the configured HMAC secret;
//! everything else passes through untouched.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
