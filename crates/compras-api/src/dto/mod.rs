//! Data Transfer Objects
//!
//! Request and response structures for the API. Field names follow the
//! order form's wire format, which mixes camelCase and snake_case.

pub mod catalog;
pub mod common;
pub mod cuenta;
pub mod orden;

pub use catalog::*;
pub use common::*;
pub use cuenta::*;
pub use orden::*;
