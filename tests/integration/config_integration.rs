//! Integration tests for layered configuration loading

use super::test_utils::with_isolated_env;
use fifoq::config::{global_config_path, ConfigLoader};
use fifoq::{Queue, QueueError};
use std::fs;
use std::path::PathBuf;

#[test]
fn test_load_defaults_without_files() {
    with_isolated_env(|root| {
        let workspace = root.join("ws");
        fs::create_dir_all(&workspace).unwrap();

        let config = ConfigLoader::load(&workspace).unwrap();
        assert_eq!(config.storage.data_dir, workspace.join(".fifoq/queue"));
        assert_eq!(config.storage.cache_capacity, 64 * 1024 * 1024);
        assert_eq!(config.storage.flush_every_ms, 500);
        assert!(config.storage.sync_writes);
        assert_eq!(config.logging.level, "info");
    });
}

#[test]
fn test_global_config_path_prefers_xdg() {
    with_isolated_env(|root| {
        assert_eq!(
            global_config_path().unwrap(),
            root.join("config").join("fifoq").join("config.toml")
        );

        std::env::remove_var("XDG_CONFIG_HOME");
        assert_eq!(
            global_config_path().unwrap(),
            root.join("home").join(".config").join("fifoq").join("config.toml")
        );
    });
}

#[test]
fn test_workspace_file_overrides_global_file() {
    with_isolated_env(|root| {
        let global = root.join("config").join("fifoq");
        fs::create_dir_all(&global).unwrap();
        fs::write(
            global.join("config.toml"),
            "[storage]\ndata_dir = \"global-queue\"\ncache_capacity = 1024\n",
        )
        .unwrap();

        let workspace = root.join("ws");
        fs::create_dir_all(workspace.join("config")).unwrap();
        fs::write(
            workspace.join("config").join("config.toml"),
            "[storage]\ndata_dir = \"workspace-queue\"\n\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let config = ConfigLoader::load(&workspace).unwrap();
        assert_eq!(config.storage.data_dir, workspace.join("workspace-queue"));
        assert_eq!(config.storage.cache_capacity, 1024);
        assert_eq!(config.logging.level, "debug");
    });
}

#[test]
fn test_env_specific_workspace_file() {
    with_isolated_env(|root| {
        let workspace = root.join("ws");
        let config_dir = workspace.join("config");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("config.toml"), "[storage]\nsync_writes = true\n").unwrap();
        fs::write(config_dir.join("production.toml"), "[storage]\nsync_writes = false\n").unwrap();

        std::env::set_var("FIFOQ_ENV", "production");
        let config = ConfigLoader::load(&workspace).unwrap();
        assert!(!config.storage.sync_writes);
    });
}

#[test]
fn test_environment_overrides_files() {
    with_isolated_env(|root| {
        let workspace = root.join("ws");
        fs::create_dir_all(workspace.join("config")).unwrap();
        fs::write(
            workspace.join("config").join("config.toml"),
            "[storage]\ndata_dir = \"from-file\"\n",
        )
        .unwrap();

        let absolute = root.join("from-env");
        std::env::set_var("FIFOQ__STORAGE__DATA_DIR", &absolute);
        std::env::set_var("FIFOQ__STORAGE__CACHE_CAPACITY", "2048");

        let config = ConfigLoader::load(&workspace).unwrap();
        assert_eq!(config.storage.data_dir, absolute);
        assert_eq!(config.storage.cache_capacity, 2048);
    });
}

#[test]
fn test_invalid_config_is_rejected() {
    with_isolated_env(|root| {
        let workspace = root.join("ws");
        fs::create_dir_all(workspace.join("config")).unwrap();
        fs::write(
            workspace.join("config").join("config.toml"),
            "[storage]\ncache_capacity = 0\n\n[logging]\nformat = \"xml\"\n",
        )
        .unwrap();

        match ConfigLoader::load(&workspace) {
            Err(QueueError::ConfigError(msg)) => {
                assert!(msg.contains("Cache capacity"));
                assert!(msg.contains("Invalid log format"));
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    });
}

#[test]
fn test_load_from_file() {
    with_isolated_env(|root| {
        let path = root.join("queue.toml");
        fs::write(&path, "[storage]\ndata_dir = \"/var/lib/fifoq\"\nflush_every_ms = 0\n").unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/fifoq"));
        assert_eq!(config.storage.store_options().flush_every_ms, None);

        assert!(ConfigLoader::load_from_file(&root.join("missing.toml")).is_err());
    });
}

#[test]
fn test_loaded_config_opens_queue() {
    with_isolated_env(|root| {
        let workspace = root.join("ws");
        fs::create_dir_all(&workspace).unwrap();

        let config = ConfigLoader::load(&workspace).unwrap();
        let queue = Queue::open_with_config(&config.storage).unwrap();
        queue.enqueue_str("hello").unwrap();
        assert_eq!(queue.peek().unwrap().as_str().unwrap(), "hello");
        assert!(workspace.join(".fifoq/queue").exists());
    });
}
