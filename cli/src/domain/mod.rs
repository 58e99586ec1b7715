//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod blocklist;
pub mod bot_env;
pub mod config;
pub mod env_file;
pub mod error;
pub mod instance;
pub mod unit;

pub use config::{DeployConfig, validate_config_key, validate_config_value};
pub use env_file::TokenState;
pub use error::{ConfigError, DeployError, EnvFileError};
pub use instance::{InstanceDescriptor, InstanceState};
