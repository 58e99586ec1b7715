//! Unit tests for the config use-cases against a mocked `ConfigStore`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::PathBuf;

use anyhow::Result;
use avtofix_deploy::application::ports::ConfigStore;
use avtofix_deploy::application::services::config_service::{load_config, set_value};
use avtofix_deploy::domain::DeployConfig;
use mockall::mock;
use mockall::predicate::function;

mock! {
    pub Store {}
    impl ConfigStore for Store {
        fn load(&self) -> Result<DeployConfig>;
        fn save(&self, config: &DeployConfig) -> Result<()>;
        fn path(&self) -> Result<PathBuf>;
    }
}

#[test]
fn test_load_config_passes_through_store() {
    let mut store = MockStore::new();
    store.expect_load().times(1).returning(|| Ok(DeployConfig::default()));

    let config = load_config(&store).expect("load");
    assert_eq!(config.repo.branch, "main");
    assert_eq!(config.python, "python3");
}

#[test]
fn test_set_value_saves_updated_config() {
    let mut store = MockStore::new();
    store.expect_load().returning(|| Ok(DeployConfig::default()));
    store
        .expect_save()
        .with(function(|c: &DeployConfig| {
            c.repo.url.as_deref() == Some("https://example.com/bot.git")
        }))
        .times(1)
        .returning(|_| Ok(()));

    let config = set_value(&store, "repo.url", "https://example.com/bot.git").expect("set");
    assert_eq!(config.repo.url.as_deref(), Some("https://example.com/bot.git"));
}

#[test]
fn test_set_value_parses_bot_list() {
    let mut store = MockStore::new();
    store.expect_load().returning(|| Ok(DeployConfig::default()));
    store
        .expect_save()
        .with(function(|c: &DeployConfig| c.fleet.bots == ["alpha", "beta"]))
        .times(1)
        .returning(|_| Ok(()));

    set_value(&store, "fleet.bots", "alpha, beta").expect("set");
}

#[test]
fn test_set_value_unknown_key_does_not_save() {
    let mut store = MockStore::new();
    store.expect_load().returning(|| Ok(DeployConfig::default()));
    store.expect_save().never();

    let err = set_value(&store, "security.level", "strict").expect_err("unknown key");
    assert!(err.to_string().contains("Unknown setting"));
}

#[test]
fn test_set_value_relative_path_does_not_save() {
    let mut store = MockStore::new();
    store.expect_load().returning(|| Ok(DeployConfig::default()));
    store.expect_save().never();

    assert!(set_value(&store, "fleet.base_dir", "bots").is_err());
}

#[test]
fn test_set_value_propagates_load_failure() {
    let mut store = MockStore::new();
    store
        .expect_load()
        .returning(|| Err(anyhow::anyhow!("cannot parse deploy.yaml")));
    store.expect_save().never();

    let err = set_value(&store, "repo.branch", "dev").expect_err("load failure");
    assert!(err.to_string().contains("cannot parse"));
}
