//! Integration with the profile store
//!
//! Logging setup and construction of the REST store from configuration.

use anyhow::Context;
use log::debug;
use std::path::Path;

use icp_core::{RestStore, StoreConfig};

/// Initialise `env_logger` for this binary and `icp_core`.
///
/// `RUST_LOG` wins over the verbosity count when it is set.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = format!("warn,icp_core={level},icp_cli={level}");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}

/// Load store settings from `.env`, the optional TOML file and the environment.
pub fn load_config(file: Option<&Path>) -> anyhow::Result<StoreConfig> {
    if let Ok(path) = dotenv::dotenv() {
        debug!("Loaded environment from {}", path.display());
    }
    let config = StoreConfig::load(file).context("could not load store configuration")?;
    debug!("Using {config:?}");
    Ok(config)
}

/// Open the REST store described by the configuration.
pub fn open_store(file: Option<&Path>) -> anyhow::Result<RestStore> {
    let config = load_config(file)?;
    RestStore::new(config).context("could not create HTTP client")
}
