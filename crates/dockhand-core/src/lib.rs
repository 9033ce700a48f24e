//! Core types and configuration for dockhand.
//!
//! This crate defines the `dockhand.toml` schema ([`DockhandConfig`]),
//! the environment injection policy ([`EnvPolicy`]), and shared error types.

pub mod config;
pub mod error;

pub use config::{DockhandConfig, EnvPolicy, PlatformConfig};
pub use error::{Error, Result};
