//! API Handlers
//!
//! Request handlers for all API endpoints.
//! Each module handles a specific domain.

pub mod catalog;
pub mod cuenta;
pub mod health;
pub mod orden;

pub use health::*;
