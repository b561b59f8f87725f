use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use category_catalog::{CategoryQueryConfig, CategorySourceConfig};
use config::{Config as HierarchicalConfig, Environment};
use serde::{Deserialize, Serialize};
use tracing::debug;
use xdg::BaseDirectories;

/// Name of the directory holding the config file under `$XDG_CONFIG_DIRS`
const CONFIG_DIR_NAME: &str = "category-catalog";
pub const CONFIG_FILE: &str = "config.toml";
/// Prefix of environment variables overriding config values,
/// e.g. `CATEGORY_CATALOG_SOURCE__CATALOG_URL`.
const ENV_PREFIX: &str = "CATEGORY_CATALOG";

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Where categories are fetched from
    #[serde(default)]
    pub source: CategorySourceConfig,

    /// How categories are cached and ordered
    #[serde(default)]
    pub query: CategoryQueryConfig,

    /// Answer from a JSON file of canned responses instead of the catalog API
    #[serde(default)]
    pub mock_file: Option<PathBuf>,
}

impl Config {
    /// Creates a [Config] from the config files and the environment
    ///
    /// Later sources override earlier ones: XDG config files, the explicit
    /// `config_file`, then `CATEGORY_CATALOG_*` variables.
    pub fn parse(config_file: Option<&Path>) -> Result<Config> {
        let dirs = BaseDirectories::with_prefix(CONFIG_DIR_NAME);

        let mut builder = HierarchicalConfig::builder();

        for file in dirs.find_config_files(CONFIG_FILE) {
            debug!(?file, "reading config file");
            builder = builder.add_source(config::File::from(file).format(config::FileFormat::Toml));
        }

        if let Some(file) = config_file {
            debug!(?file, "reading explicit config file");
            builder = builder.add_source(
                config::File::from(file.to_path_buf()).format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder
            .build()
            .context("Could not read config")?
            .try_deserialize()
            .context("Could not parse config")?;
        Ok(config)
    }
}
