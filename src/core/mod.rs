//! Core types and utilities

pub mod types;
pub mod error;
pub mod logging;
pub mod time;
pub mod input;
pub mod viewpoint;

pub use types::*;
pub use error::Error;
