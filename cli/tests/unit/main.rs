//! Unit tests for avtofix-deploy
//!
//! These tests use mocked dependencies and run fast without external I/O.

mod config_service;
mod env_upsert;
mod host_provisioner;
mod mocks;
