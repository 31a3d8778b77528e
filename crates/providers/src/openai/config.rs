use anyhow::Context;
use directories::BaseDirs;
use serde::Deserialize;
use std::{env, fs, path::Path, path::PathBuf, time::Duration};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://172.19.96.1:1234";
pub const DEFAULT_MODEL: &str = "google/gemma-3n-e4b";
pub const DEFAULT_TIMEOUT_MS: u64 = 120_000;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct OpenAiFileConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub timeout_ms: Option<u64>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub proxy: Option<String>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            proxy: None,
        }
    }
}

impl OpenAiConfig {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_api_key<S: Into<String>>(mut self, key: S) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Defaults, overlaid by the config file, overlaid by the environment.
    pub fn from_env_and_file() -> anyhow::Result<Self> {
        let file_cfg = Self::config_path().and_then(|p| Self::read_file(&p));
        Self::resolve(file_cfg, |k| env::var(k).ok())
    }

    fn resolve(
        file_cfg: Option<OpenAiFileConfig>,
        var: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let mut cfg = Self::default();

        if let Some(f) = file_cfg {
            if let Some(u) = f.base_url {
                cfg.base_url = u;
            }
            cfg.api_key = f.api_key;
            if let Some(m) = f.model {
                cfg.model = m;
            }
            if let Some(t) = f.timeout_ms {
                cfg.timeout = Duration::from_millis(t);
            }
        }

        if let Some(u) = var("LMCHAT_BASE_URL").or_else(|| var("OPENAI_BASE_URL")) {
            cfg.base_url = u;
        }
        if let Some(k) = var("OPENAI_API_KEY") {
            cfg.api_key = Some(k);
        }
        if let Some(m) = var("LMCHAT_MODEL") {
            cfg.model = m;
        }
        if let Some(t) = var("LMCHAT_TIMEOUT_MS") {
            let ms: u64 = t
                .trim()
                .parse()
                .with_context(|| format!("LMCHAT_TIMEOUT_MS is not a number: {t:?}"))?;
            cfg.timeout = Duration::from_millis(ms);
        }
        // Blank keys mean "no auth", which local servers expect.
        cfg.api_key = cfg.api_key.filter(|k| !k.trim().is_empty());
        cfg.proxy = var("HTTPS_PROXY").or_else(|| var("HTTP_PROXY"));

        cfg.base_url = validate_base_url(&cfg.base_url)?;
        Ok(cfg)
    }

    fn read_file(path: &Path) -> Option<OpenAiFileConfig> {
        if !path.exists() {
            return None;
        }
        let text = match fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) => {
                warn!(target: "providers::openai", "cannot read {}: {}", path.display(), e);
                return None;
            }
        };
        match toml::from_str::<OpenAiFileConfig>(&text) {
            Ok(c) => {
                debug!(target: "providers::openai", "loaded config from {}", path.display());
                Some(c)
            }
            Err(e) => {
                warn!(target: "providers::openai", "ignoring invalid config {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        let p = if cfg!(target_os = "windows") {
            base.home_dir().join(".lmchat").join("config.toml")
        } else {
            base.config_dir().join("lmchat").join("config.toml")
        };
        Some(p)
    }
}

/// Checks the URL is http(s) and strips trailing slashes.
pub fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {other}"),
        }),
    }
}
