//! Configuration
//!
//! Layered lowest to highest: built-in defaults, a TOML file, then
//! `CALLBRIDGE_*` environment variables.
//!
//! The file is the explicit path if one is given, else `CALLBRIDGE_CONFIG_PATH`,
//! else an optional `callbridge.toml` in the working directory.

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "CALLBRIDGE_CONFIG_PATH";
const ENV_PREFIX: &str = "CALLBRIDGE";
const DEFAULT_CONFIG_FILE: &str = "callbridge";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Directory inserted first in the script module search path
    pub support_module_dir: PathBuf,

    /// Trace every script → host invocation
    pub debug: bool,

    /// Script engine implementation
    pub engine: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            support_module_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/modules")),
            debug: false,
            engine: "scriptlet".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Load the layered configuration
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default(
                "support_module_dir",
                defaults.support_module_dir.to_string_lossy().to_string(),
            )?
            .set_default("debug", defaults.debug)?
            .set_default("engine", defaults.engine)?;

        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from));
        builder = match explicit {
            Some(file) => {
                if !file.is_file() {
                    bail!("config file not found: {}", file.display());
                }
                builder.add_source(File::from(file.as_path()).format(FileFormat::Toml))
            }
            None => builder.add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false)),
        };

        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        let config: Self = builder
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.engine.trim().is_empty() {
            bail!("engine must not be empty");
        }
        if self.support_module_dir.as_os_str().is_empty() {
            bail!("support_module_dir must not be empty");
        }
        Ok(())
    }

    /// The effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to render configuration")
    }
}
