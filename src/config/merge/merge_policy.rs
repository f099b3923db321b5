//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("storage.data_dir", ".fifoq/queue")?
        .set_default("storage.cache_capacity", 64_i64 * 1024 * 1024)?
        .set_default("storage.flush_every_ms", 500_i64)?
        .set_default("storage.sync_writes", true)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stdout")
}
