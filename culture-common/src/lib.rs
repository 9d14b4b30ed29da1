//! # Culture Common Library
//!
//! Shared code for the culture relay service:
//! - Error and result types
//! - Bootstrap configuration (TOML file, overrides, defaults)
//! - Database bootstrap and the upload record model
//! - Timestamp helpers

pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
