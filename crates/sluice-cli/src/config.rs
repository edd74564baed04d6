//! Configuration loading.
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. `sluice.toml` in the working directory (optional)
//! 3. The file given with `--config` (required when given)
//! 4. Environment variables (`SLUICE_` prefix, `__` between sections),
//!    e.g. `SLUICE_TRANSFER__CHUNK_SIZE=4096`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Project config file looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "sluice.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "SLUICE";

/// Main sluice configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SluiceConfig {
    pub transfer: TransferConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Bytes moved per buffer.
    pub chunk_size: usize,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self { chunk_size: 8192 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Loads configuration from every source, most specific last.
pub fn load(explicit: Option<&Path>) -> Result<SluiceConfig> {
    load_from(Path::new("."), explicit)
}

/// Loads configuration with an explicit project directory.
pub fn load_from(project_dir: &Path, explicit: Option<&Path>) -> Result<SluiceConfig> {
    let mut builder = config::Config::builder();

    let defaults = SluiceConfig::default();
    builder = builder.add_source(config::Config::try_from(&defaults)?);

    let project_file: PathBuf = project_dir.join(PROJECT_CONFIG_FILE);
    builder = builder.add_source(
        config::File::from(project_file)
            .required(false)
            .format(config::FileFormat::Toml),
    );

    if let Some(path) = explicit {
        builder = builder.add_source(
            config::File::from(path)
                .required(true)
                .format(config::FileFormat::Toml),
        );
    }

    builder = builder.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config: SluiceConfig = builder
        .build()
        .context("failed to read configuration")?
        .try_deserialize()
        .context("invalid configuration")?;

    config.validate()?;
    Ok(config)
}

impl SluiceConfig {
    /// Rejects values no command can work with.
    pub fn validate(&self) -> Result<()> {
        if self.transfer.chunk_size == 0 {
            bail!("transfer.chunk_size must be greater than zero");
        }
        Ok(())
    }
}
