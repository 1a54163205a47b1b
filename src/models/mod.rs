//! Request-scoped models: configuration and the authenticated administrator.

pub mod auth;
pub mod config;
