use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use config::{Config as RConfig, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use hookfwd_common::constants::DEFAULT_API_BASE_URL;

const DEFAULT_CONFIG_FILE_LOCATION_FROM_HOME: &str = ".config/hookfwd/config.toml";
const DEFAULT_LOG_LEVEL: &str = "info";
const ENV_PREFIX: &str = "HOOKFWD";
const API_KEY_ENV: &str = "HOOKFWD_API_KEY";

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    pub device_name: String,
    pub test_mode_api_key: Option<String>,
    pub live_mode_api_key: Option<String>,
    pub api_base_url: String,
    pub log_level: String,

    pub config_sources: Vec<String>,
}

impl Config {
    /// Key for the requested mode. Missing keys are a configuration error.
    pub fn api_key(&self, livemode: bool) -> Result<String> {
        let (key, mode, field) = if livemode {
            (&self.live_mode_api_key, "live", "live_mode_api_key")
        } else {
            (&self.test_mode_api_key, "test", "test_mode_api_key")
        };

        match key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key.to_string()),
            _ => bail!(
                "No {} mode API key configured. Pass --api-key, set {} or add `{}` to {}",
                mode,
                API_KEY_ENV,
                field,
                self.config_sources
                    .first()
                    .cloned()
                    .unwrap_or_else(|| DEFAULT_CONFIG_FILE_LOCATION_FROM_HOME.to_string())
            ),
        }
    }

    /// A key given on the command line wins over both configured keys.
    pub fn override_api_key(&mut self, api_key: &str) {
        self.test_mode_api_key = Some(api_key.to_string());
        self.live_mode_api_key = Some(api_key.to_string());
    }

    pub fn with_api_base(mut self, api_base: Option<&str>) -> Self {
        if let Some(api_base) = api_base.filter(|base| !base.is_empty()) {
            self.api_base_url = api_base.to_string();
        }
        self
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    fn get_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DEFAULT_CONFIG_FILE_LOCATION_FROM_HOME))
    }

    /// Defaults, then the config file, then `HOOKFWD_*` environment variables.
    ///
    /// A file given explicitly must exist; the default location is optional.
    pub fn load_config(path: Option<&str>) -> Result<Config> {
        let (config_path, required) = match path {
            Some(path) => (Some(PathBuf::from(path)), true),
            None => (Self::get_config_path(), false),
        };

        let mut builder = RConfig::builder()
            .set_default("device_name", whoami::devicename())?
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .set_default("log_level", DEFAULT_LOG_LEVEL)?;

        let mut sources = vec![];
        if let Some(config_path) = &config_path {
            if required || config_path.exists() {
                sources.push(config_path.display().to_string());
            }
            builder = builder.add_source(
                File::from(config_path.as_path())
                    .format(FileFormat::Toml)
                    .required(required),
            );
        }

        builder = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .set_override("config_sources", sources)?;

        let mut config: Config = builder
            .build()
            .with_context(|| match &config_path {
                Some(path) => format!("failed to read config file {}", path.display()),
                None => "failed to build config".to_string(),
            })?
            .try_deserialize()
            .context("failed to parse config file")?;

        if let Ok(api_key) = std::env::var(API_KEY_ENV) {
            if !api_key.is_empty() {
                config.override_api_key(&api_key);
            }
        }

        Ok(config)
    }
}
