// src/config/settings.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_CONFIG_PATH: &str = "CATALOG_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/catalog.toml";

pub const ENV_VENDOR_A_URL: &str = "VENDOR_A_URL";
pub const ENV_VENDOR_B_URL: &str = "VENDOR_B_URL";
pub const ENV_VENDOR_C_URL: &str = "VENDOR_C_URL";
pub const ENV_API_SECRET: &str = "API_SECRET";
pub const ENV_PORT: &str = "PORT";
pub const ENV_SOURCE_TIMEOUT_MS: &str = "SOURCE_TIMEOUT_MS";
pub const ENV_METRICS_ENABLED: &str = "METRICS_ENABLED";

/// Runtime configuration of the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub vendor_a_url: String,
    pub vendor_b_url: String,
    pub vendor_c_url: String,
    /// Sent as `x-api-key`; omitted when `None`.
    pub api_secret: Option<String>,
    pub port: u16,
    pub source_timeout_ms: u64,
    pub metrics_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vendor_a_url: "http://localhost:3001".into(),
            vendor_b_url: "http://localhost:3002".into(),
            vendor_c_url: "http://localhost:3003".into(),
            api_secret: None,
            port: 3000,
            source_timeout_ms: 5_000,
            metrics_enabled: false,
        }
    }
}

/// Optional TOML file; every key may be left out.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    vendor_a_url: Option<String>,
    vendor_b_url: Option<String>,
    vendor_c_url: Option<String>,
    api_secret: Option<String>,
    port: Option<u16>,
    source_timeout_ms: Option<u64>,
    metrics_enabled: Option<bool>,
}

impl Settings {
    /// Defaults overlaid by environment variables only.
    pub fn from_env() -> Result<Self> {
        let mut s = Self::default();
        s.apply_env()?;
        Ok(s.sanitized())
    }

    /// Config file (if any) overlaid by environment variables:
    /// 1) $CATALOG_CONFIG_PATH (must exist)
    /// 2) config/catalog.toml
    pub fn load() -> Result<Self> {
        let mut s = Self::default();
        if let Some(path) = config_path()? {
            s.apply_file(&path)?;
        }
        s.apply_env()?;
        Ok(s.sanitized())
    }

    /// Defaults overlaid by one TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut s = Self::default();
        s.apply_file(path)?;
        Ok(s.sanitized())
    }

    pub fn source_timeout(&self) -> Duration {
        Duration::from_millis(self.source_timeout_ms)
    }

    fn apply_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading catalog config from {}", path.display()))?;
        let f: FileSettings = toml::from_str(&content)
            .with_context(|| format!("parsing catalog config {}", path.display()))?;

        if let Some(v) = f.vendor_a_url {
            self.vendor_a_url = v;
        }
        if let Some(v) = f.vendor_b_url {
            self.vendor_b_url = v;
        }
        if let Some(v) = f.vendor_c_url {
            self.vendor_c_url = v;
        }
        if f.api_secret.is_some() {
            self.api_secret = f.api_secret;
        }
        if let Some(v) = f.port {
            self.port = v;
        }
        if let Some(v) = f.source_timeout_ms {
            self.source_timeout_ms = v;
        }
        if let Some(v) = f.metrics_enabled {
            self.metrics_enabled = v;
        }
        Ok(())
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(v) = env_nonempty(ENV_VENDOR_A_URL) {
            self.vendor_a_url = v;
        }
        if let Some(v) = env_nonempty(ENV_VENDOR_B_URL) {
            self.vendor_b_url = v;
        }
        if let Some(v) = env_nonempty(ENV_VENDOR_C_URL) {
            self.vendor_c_url = v;
        }
        if let Some(v) = env_nonempty(ENV_API_SECRET) {
            self.api_secret = Some(v);
        }
        if let Some(v) = env_nonempty(ENV_PORT) {
            self.port = v
                .parse()
                .with_context(|| format!("{ENV_PORT} must be a port number, got '{v}'"))?;
        }
        if let Some(v) = env_nonempty(ENV_SOURCE_TIMEOUT_MS) {
            self.source_timeout_ms = v.parse().with_context(|| {
                format!("{ENV_SOURCE_TIMEOUT_MS} must be milliseconds, got '{v}'")
            })?;
        }
        if let Some(v) = env_nonempty(ENV_METRICS_ENABLED) {
            self.metrics_enabled = parse_flag(&v)
                .ok_or_else(|| anyhow!("{ENV_METRICS_ENABLED} must be a boolean, got '{v}'"))?;
        }
        Ok(())
    }

    fn sanitized(mut self) -> Self {
        for url in [
            &mut self.vendor_a_url,
            &mut self.vendor_b_url,
            &mut self.vendor_c_url,
        ] {
            let trimmed = url.trim().trim_end_matches('/').to_string();
            *url = trimmed;
        }
        if self.api_secret.as_deref().is_some_and(|s| s.is_empty()) {
            self.api_secret = None;
        }
        self
    }
}

fn config_path() -> Result<Option<PathBuf>> {
    if let Some(p) = env_nonempty(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return Ok(Some(pb));
        }
        return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_PATH);
    Ok(default.exists().then_some(default))
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
