//! Config loading facade: builds the layered source stack and validates it.

use super::merge::merge_policy::builder_with_defaults;
use super::sources::{global_file, workspace_file};
use super::FifoqConfig;
use crate::error::QueueError;
use config::{Environment, File};
use std::path::Path;
use tracing::debug;

/// Environment variable prefix; nested keys use `__`, e.g. `FIFOQ__STORAGE__DATA_DIR`.
const ENV_PREFIX: &str = "FIFOQ";
const ENV_SEPARATOR: &str = "__";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (lowest to highest): defaults, global file, workspace
    /// files, environment. A relative `storage.data_dir` is resolved against
    /// `workspace_root`.
    pub fn load(workspace_root: &Path) -> Result<FifoqConfig, QueueError> {
        let builder = builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = builder.add_source(environment());

        let mut config: FifoqConfig = builder.build()?.try_deserialize()?;
        config.storage.resolve_against(workspace_root);
        validate(&config)?;

        debug!(
            workspace_root = %workspace_root.display(),
            data_dir = %config.storage.data_dir.display(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Load configuration from a single file on top of the defaults.
    ///
    /// Environment overrides still apply; global and workspace files do not.
    pub fn load_from_file(path: &Path) -> Result<FifoqConfig, QueueError> {
        let config: FifoqConfig = builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .add_source(environment())
            .build()?
            .try_deserialize()?;
        validate(&config)?;
        Ok(config)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}

fn validate(config: &FifoqConfig) -> Result<(), QueueError> {
    config.validate().map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        QueueError::ConfigError(format!(
            "Configuration validation failed:\n{}",
            error_msgs.join("\n")
        ))
    })
}
