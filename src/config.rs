//! Configuration loader and validator for the site's read pipeline.
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub app: App,
    pub supabase: Supabase,
}

/// App-level settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct App {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Hosted store endpoint and access settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Supabase {
    pub url: String,
    pub anon_key: String,
    #[serde(default = "default_schema")]
    pub schema: String,
    #[serde(default)]
    pub category_join: CategoryJoin,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// How post categories are fetched alongside posts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CategoryJoin {
    /// Try the embedded join first and fall back to per-post requests when the
    /// store cannot embed the relationship.
    #[default]
    Auto,
    Embedded,
    PerPost,
}

impl Default for App {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_schema() -> String {
    "public".into()
}

fn default_timeout_seconds() -> u64 {
    10
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Replace the endpoint and key with `SUPABASE_URL` / `SUPABASE_ANON_KEY`
    /// when those are set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(url) = env_non_empty("SUPABASE_URL") {
            self.supabase.url = url;
        }
        if let Some(key) = env_non_empty("SUPABASE_ANON_KEY") {
            self.supabase.anon_key = key;
        }
        self
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Load configuration from a YAML file, apply environment overrides and validate it.
/// - If `path` is None, uses `config.yaml` in the current working directory.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    let cfg = cfg.with_env_overrides();
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if !LOG_LEVELS.contains(&cfg.app.log_level.trim().to_ascii_lowercase().as_str()) {
        return Err(ConfigError::Invalid(
            "app.log_level must be one of trace, debug, info, warn, error",
        ));
    }

    if cfg.supabase.url.trim().is_empty() {
        return Err(ConfigError::Invalid("supabase.url must be non-empty"));
    }
    match Url::parse(cfg.supabase.url.trim()) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        _ => {
            return Err(ConfigError::Invalid(
                "supabase.url must be an absolute http(s) URL",
            ))
        }
    }
    if cfg.supabase.anon_key.trim().is_empty() {
        return Err(ConfigError::Invalid("supabase.anon_key must be non-empty"));
    }
    if cfg.supabase.schema.trim().is_empty() {
        return Err(ConfigError::Invalid("supabase.schema must be non-empty"));
    }
    if cfg.supabase.timeout_seconds == 0 {
        return Err(ConfigError::Invalid("supabase.timeout_seconds must be > 0"));
    }

    Ok(())
}

/// Returns the example YAML content.
pub fn example() -> &'static str {
    r#"app:
  log_level: "info"

supabase:
  url: "https://your-project.supabase.co"
  anon_key: "YOUR_SUPABASE_ANON_KEY"
  schema: "public"
  # auto | embedded | per_post
  category_join: "auto"
  timeout_seconds: 10
"#
}
