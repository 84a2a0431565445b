use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::auth::secret_store::{self, ApiKey};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_QUERY: &str = "newer_than:1d";
pub const DEFAULT_MAX_RESULTS: u32 = 100;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub client_secret_path: String,
    pub token_path: String,
    pub model: String,
    pub query: String,
    pub max_results: u32,
    pub bind_addr: String,
    /// Port for the OAuth loopback redirect; 0 picks a free one.
    pub oauth_port: u16,
    pub open_browser: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_secret_path: "credentials.json".to_string(),
            token_path: "token.json".to_string(),
            model: DEFAULT_MODEL.to_string(),
            query: DEFAULT_QUERY.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            bind_addr: "127.0.0.1:8501".to_string(),
            oauth_port: 0,
            open_browser: true,
        }
    }
}

impl Config {
    pub fn client_secret_path(&self) -> PathBuf {
        PathBuf::from(&self.client_secret_path)
    }

    pub fn token_path(&self) -> PathBuf {
        PathBuf::from(&self.token_path)
    }
}

fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("no config dir available"))?
        .join("daily_briefing"))
}

pub fn config_path() -> Result<PathBuf> {
    let mut p = config_dir()?;
    fs::create_dir_all(&p)?;
    p.push("config.toml");
    Ok(p)
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

/// Reads the config at `path`. A missing file is replaced by a template
/// holding the defaults, which are then used as-is.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        let sample = Config::default();
        let tom = toml::to_string_pretty(&sample)?;
        fs::write(path, tom)?;
        log::info!("Created template config at {}", path.display());
        return Ok(sample);
    }
    let s = fs::read_to_string(path)?;
    let cfg: Config = toml::from_str(&s)?;
    Ok(cfg)
}

/// Secrets resolved once at startup.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    pub api_key: Option<ApiKey>,
}

impl Secrets {
    pub fn resolve() -> Result<Self> {
        Ok(Self {
            api_key: secret_store::resolve_api_key()?,
        })
    }
}

/// Everything the pipeline needs, loaded once and passed by reference.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: Config,
    pub secrets: Secrets,
}

impl Settings {
    pub fn new(config: Config, secrets: Secrets) -> Self {
        Self { config, secrets }
    }

    pub fn load() -> Result<Self> {
        let config = load_config()?;
        let secrets = Secrets::resolve()?;
        Ok(Self::new(config, secrets))
    }
}
