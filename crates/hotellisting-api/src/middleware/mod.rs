//! Axum middleware stack.

pub mod cache;
pub mod cors;
pub mod logging;
pub mod rbac;
