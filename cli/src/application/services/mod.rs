//! Application services: use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`, never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod activation;
pub mod config_service;
pub mod deploy;
pub mod env_config;
pub mod fleet_status;
pub mod preflight;
pub mod runtime;
pub mod source_sync;
pub mod unit_install;
