use std::path::Path;
use std::time::Duration;

use config::Config;
use config::ConfigError;
use config::File;
use config::FileFormat;
use serde::Deserialize;
use tb_ratelimit::TokenBucketOptions;

use crate::workload::WorkloadConfig;

#[derive(Debug, Deserialize)]
pub struct ThrottleConfigFile {
    pub bucket: TokenBucketOptions,
    #[serde(default)]
    pub workload: WorkloadConfig,
}

impl Default for ThrottleConfigFile {
    fn default() -> Self {
        Self { bucket: TokenBucketOptions::new(5, Duration::from_secs(1), 2), workload: WorkloadConfig::default() }
    }
}

pub fn load_throttle_config<P: AsRef<Path>>(path: P) -> Result<ThrottleConfigFile, ConfigError> {
    let config = Config::builder().add_source(File::from(path.as_ref())).build()?;

    config.try_deserialize()
}

/// Parse a TOML document in the same layout as the config file
pub fn parse_throttle_config(source: &str) -> Result<ThrottleConfigFile, ConfigError> {
    let config = Config::builder().add_source(File::from_str(source, FileFormat::Toml)).build()?;

    config.try_deserialize()
}

/// Load throttle config with fallback to default
pub fn load_throttle_config_or_default(path: &str) -> ThrottleConfigFile {
    match load_throttle_config(path) {
        Ok(config) => {
            tracing::info!("Loaded throttle config from {path}");
            config
        }
        Err(err) => {
            tracing::warn!("Failed to load throttle config from {}: {}. Using defaults.", path, err);
            ThrottleConfigFile::default()
        }
    }
}
