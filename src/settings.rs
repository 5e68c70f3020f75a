use crate::error::Result;
use crate::utils::constants::{
    CONFIG_ENV_PREFIX, DEFAULT_CONFIG_FILE, DEFAULT_DATA_FILE, DEFAULT_HISTOGRAM_BINS,
    DEFAULT_TABLE_ROWS, DEFAULT_WATCH_INTERVAL_MS,
};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

/// Dashboard settings, layered from defaults, an optional TOML file and
/// `WEATHER_DASHBOARD__*` environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Settings {
    pub data_path: PathBuf,

    #[validate(range(min = 1))]
    pub histogram_bins: usize,

    pub table_rows: usize,

    pub strict_parsing: bool,

    #[validate(range(min = 50))]
    pub watch_interval_ms: u64,
}

impl Settings {
    /// Load settings. An explicit `config_path` must exist; otherwise
    /// `dashboard.toml` in the working directory is used when present.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::load_with_env_prefix(config_path, CONFIG_ENV_PREFIX)
    }

    pub(crate) fn load_with_env_prefix(
        config_path: Option<&Path>,
        env_prefix: &str,
    ) -> Result<Self> {
        let file = match config_path {
            Some(path) => File::from(path).required(true),
            None => File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
        };

        let settings: Settings = Self::defaults()?
            .add_source(file)
            .add_source(
                Environment::with_prefix(env_prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        debug!(?settings, "Settings loaded");
        Ok(settings)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let builder = Config::builder()
            .set_default("data_path", DEFAULT_DATA_FILE)?
            .set_default("histogram_bins", DEFAULT_HISTOGRAM_BINS as i64)?
            .set_default("table_rows", DEFAULT_TABLE_ROWS as i64)?
            .set_default("strict_parsing", true)?
            .set_default("watch_interval_ms", DEFAULT_WATCH_INTERVAL_MS as i64)?;
        Ok(builder)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            table_rows: DEFAULT_TABLE_ROWS,
            strict_parsing: true,
            watch_interval_ms: DEFAULT_WATCH_INTERVAL_MS,
        }
    }
}
