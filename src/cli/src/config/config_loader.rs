use anyhow::{Context, Result};
use config::{Config as RConfig, Environment, File, FileFormat};
use psdelta_common::constants::{DEFAULT_CONFIG_FILE, ENV_PREFIX};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Settings that apply when the matching command-line flag is absent.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Config {
    pub delay_ms: u64,
    pub fallback_exe: bool,
    pub once_only: bool,
    pub skip_cmdline: bool,
    /// Patterns merged into every `--include`.
    pub include: Vec<String>,
    /// Patterns merged into every `--exclude`.
    pub exclude: Vec<String>,
    #[serde(default)]
    pub log_file: Option<String>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Layers built-in defaults, then the configuration file, then
    /// `PSDELTA_*` environment variables.
    ///
    /// An explicit `path` must exist; the implicit `psdelta.toml` in the working
    /// directory is optional.
    pub fn load_config(path: Option<&str>) -> Result<Config> {
        let defaults = Config::default();

        let mut builder = RConfig::builder()
            .set_default("delay_ms", defaults.delay_ms)?
            .set_default("fallback_exe", defaults.fallback_exe)?
            .set_default("once_only", defaults.once_only)?
            .set_default("skip_cmdline", defaults.skip_cmdline)?
            .set_default("include", defaults.include)?
            .set_default("exclude", defaults.exclude)?;

        builder = match path {
            Some(path) => builder.add_source(File::new(path, FileFormat::Toml).required(true)),
            None => builder.add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("include")
                .with_list_parse_key("exclude"),
        );

        let config: Config = builder
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("failed to parse config file")?;

        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }
}
