//! Layered settings: compiled defaults, then `prompter.toml`, then
//! `PROMPTER_*` environment variables (`__` separates nested keys, e.g.
//! `PROMPTER_SERVICE__BASE_URL`).

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::engine::{DEFAULT_CAPACITY, RemoteFailurePolicy};
use crate::error::{Error, Result};

pub const DEFAULT_CONFIG_FILE: &str = "prompter.toml";
pub const ENV_PREFIX: &str = "PROMPTER_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub service: ServiceConfig,
    pub prompts: PromptConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: PathBuf,
    /// Whether to build the title -> rating lookup.
    pub ratings: bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self { path: PathBuf::from("./imdb-movies.csv"), ratings: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub ping_interval_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://pyapp:80".to_string(),
            timeout_secs: 5,
            ping_interval_secs: 5,
        }
    }
}

impl ServiceConfig {
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(Error::InvalidConfig(format!(
                "service.base_url must be http(s), got '{other}'"
            ))),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub max_candidates: usize,
    pub remote_failure: RemoteFailurePolicy,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            max_candidates: DEFAULT_CAPACITY,
            remote_failure: RemoteFailurePolicy::Strict,
        }
    }
}

impl Config {
    /// Loads from `$PROMPTER_CONFIG` (or `prompter.toml`) plus the environment.
    pub fn load() -> Result<Self> {
        let path = env::var("PROMPTER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::from_figment(Self::figment(path))
    }

    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.prompts.max_candidates == 0 {
            return Err(Error::InvalidConfig("prompts.max_candidates must be at least 1".into()));
        }
        if self.service.timeout_secs == 0 {
            return Err(Error::InvalidConfig("service.timeout_secs must be at least 1".into()));
        }
        if self.service.ping_interval_secs == 0 {
            return Err(Error::InvalidConfig("service.ping_interval_secs must be at least 1".into()));
        }
        self.service.base_url()?;
        Ok(())
    }
}
