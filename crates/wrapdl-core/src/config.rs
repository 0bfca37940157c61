use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::settings::Credentials;

/// Environment variable overriding `proxy.username`.
pub const PROXY_USER_ENV: &str = "WRAPDL_PROXY_USER";
/// Environment variable overriding `proxy.password`.
pub const PROXY_PASSWORD_ENV: &str = "WRAPDL_PROXY_PASSWORD";

/// Proxy section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Explicit proxy URL. When unset, libcurl's own `http_proxy`/`https_proxy` handling applies.
    #[serde(default)]
    pub url: Option<String>,
    /// Username answered to proxy authentication challenges.
    #[serde(default)]
    pub username: Option<String>,
    /// Proxy password; an unset password is sent as empty.
    #[serde(default)]
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Proxy credentials, present only when a username is configured.
    pub fn credentials(&self) -> Option<Credentials> {
        self.username.as_ref().map(|user| Credentials {
            username: user.clone(),
            password: self.password.clone().unwrap_or_default(),
        })
    }
}

/// Global configuration loaded from `~/.config/wrapdl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrapdlConfig {
    /// Application name reported in the User-Agent.
    pub application_name: String,
    /// Application version reported in the User-Agent.
    pub application_version: String,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Abort when throughput stays below this many bytes/s for `low_speed_time_secs` (None = never).
    #[serde(default)]
    pub low_speed_limit: Option<u32>,
    /// Window in seconds for `low_speed_limit`.
    #[serde(default = "default_low_speed_time")]
    pub low_speed_time_secs: u64,
    #[serde(default)]
    pub proxy: ProxyConfig,
}

fn default_low_speed_time() -> u64 {
    60
}

impl Default for WrapdlConfig {
    fn default() -> Self {
        Self {
            application_name: "wrapdl".to_string(),
            application_version: env!("CARGO_PKG_VERSION").to_string(),
            connect_timeout_secs: 30,
            low_speed_limit: Some(1024),
            low_speed_time_secs: default_low_speed_time(),
            proxy: ProxyConfig::default(),
        }
    }
}

impl WrapdlConfig {
    /// Apply `WRAPDL_PROXY_USER` / `WRAPDL_PROXY_PASSWORD` on top of the file values.
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(PROXY_USER_ENV).ok(),
            std::env::var(PROXY_PASSWORD_ENV).ok(),
        );
    }

    /// Override proxy credentials; `None` keeps the current value.
    pub fn apply_overrides(&mut self, proxy_user: Option<String>, proxy_password: Option<String>) {
        if let Some(user) = proxy_user {
            self.proxy.username = Some(user);
        }
        if let Some(password) = proxy_password {
            self.proxy.password = Some(password);
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("wrapdl")?;
    Ok(xdg_dirs.get_config_home().join("wrapdl").join("config.toml"))
}

/// Load configuration from disk, or defaults if no file exists. Never writes.
pub fn load_or_default() -> Result<WrapdlConfig> {
    let path = config_path()?;
    let mut cfg = load_from(&path)?;
    cfg.apply_env();
    Ok(cfg)
}

/// Load configuration from `path`; a missing file yields defaults.
pub fn load_from(path: &Path) -> Result<WrapdlConfig> {
    if !path.exists() {
        tracing::debug!("no config at {}, using defaults", path.display());
        return Ok(WrapdlConfig::default());
    }
    let data =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: WrapdlConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
