//! # ReqForge Common Library
//!
//! Shared code for the ReqForge crates including:
//! - Error type and `Result` alias
//! - TOML configuration loading and config path resolution
//! - Timestamp utilities

pub mod config;
pub mod error;
pub mod time;

pub use error::{Error, Result};
