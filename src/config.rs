//! Configuration loading and management for vidsumma.
//!
//! Settings come from compiled-in defaults, an optional `vidsumma.toml`, and
//! environment variable overrides, in that order of precedence.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Default Gemini model identifier
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";
/// Default Gemini API version
pub const DEFAULT_API_VERSION: &str = "v1beta";
/// Upper bound on generated tokens, also repeated in the system instruction
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 65_536;
/// Default time allowed for a single generation call
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;
/// Default listen port for the web front-end
pub const DEFAULT_PORT: u16 = 8080;
/// Default Gemini endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Instruction sent alongside every video reference
pub const DEFAULT_PROMPT: &str = "Write a short summary of the video using Markdown. \
Be as information dense as possible. Be thorough. Use bullet lists to break down complex ideas. \
Provide space between sections. Produce an overall summary, list key sections to listen to, \
then add a thoughtful critique of the video. Then include a 'Further Reading' section that \
connects ideas, expands on them, and provide further information with links.";

const CONFIG_FILE: &str = "vidsumma.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Generation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Model identifier (e.g., "gemini-2.5-pro")
    pub model: String,
    /// Provider API version (e.g., "v1beta")
    pub api_version: String,
    pub max_output_tokens: u32,
    /// Seconds before an in-flight generation is abandoned, 0 for no limit
    pub request_timeout_secs: u64,
    /// Provider endpoint, overridable for self-hosted proxies
    pub base_url: String,
    /// Instruction prompt describing the summary style
    pub prompt: String,
}

/// API keys configuration (loaded from environment)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub gemini_key: Option<String>,
}

/// Web server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// Directory served under `/static/`
    pub static_dir: PathBuf,
}

/// Root configuration structure.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            base_url: DEFAULT_BASE_URL.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            static_dir: PathBuf::from("static"),
        }
    }
}

impl Config {
    /// Load configuration from the default location, then apply the environment.
    ///
    /// A missing config file is fine; defaults are used instead.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_file() {
            Some(path) => {
                debug!(path = %path.display(), "reading config file");
                Self::load_from(&path)?
            }
            None => Config::default(),
        };
        config.apply_env(env_lookup)?;
        debug!(
            model = %config.agent.model,
            api_version = %config.agent.api_version,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Load configuration from a specific path, without environment overrides
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Overlay environment variables onto this configuration.
    ///
    /// `lookup` returns `None` for unset variables; empty values count as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        self.agent.model = resolve_or(&lookup, "MODEL_NAME", &self.agent.model);
        self.agent.api_version = resolve_or(&lookup, "API_VERSION", &self.agent.api_version);
        if let Some(key) = get("GEMINI_API_KEY").or_else(|| get("GOOGLE_API_KEY")) {
            self.api.gemini_key = Some(key);
        }
        if let Some(port) = get("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { name: "PORT", value: port })?;
        }
        if let Some(secs) = get("REQUEST_TIMEOUT_SECS") {
            self.agent.request_timeout_secs =
                secs.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    name: "REQUEST_TIMEOUT_SECS",
                    value: secs,
                })?;
        }

        Ok(())
    }

    /// Replace the model while keeping every other setting
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.agent.model = model.into();
        self
    }

    /// Generation time limit; `request_timeout_secs = 0` disables it
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.agent.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from(CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        // Check home directory
        let home_config = dirs::home_dir()?
            .join(".config")
            .join("vidsumma")
            .join(CONFIG_FILE);
        home_config.exists().then_some(home_config)
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Model name from `MODEL_NAME`, or the compiled-in default
pub fn resolve_model() -> String {
    resolve_model_from(env_lookup)
}

/// API version from `API_VERSION`, or the compiled-in default
pub fn resolve_api_version() -> String {
    resolve_api_version_from(env_lookup)
}

pub fn resolve_model_from<F: Fn(&str) -> Option<String>>(lookup: F) -> String {
    resolve_or(lookup, "MODEL_NAME", DEFAULT_MODEL)
}

pub fn resolve_api_version_from<F: Fn(&str) -> Option<String>>(lookup: F) -> String {
    resolve_or(lookup, "API_VERSION", DEFAULT_API_VERSION)
}

fn resolve_or<F: Fn(&str) -> Option<String>>(lookup: F, name: &str, default: &str) -> String {
    lookup(name)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn resolve_model_prefers_environment() {
        assert_eq!(resolve_model_from(env(&[("MODEL_NAME", "foo")])), "foo");
    }

    #[test]
    fn resolve_model_falls_back_to_default() {
        assert_eq!(resolve_model_from(env(&[])), DEFAULT_MODEL);
        assert_eq!(resolve_model_from(env(&[("MODEL_NAME", "")])), DEFAULT_MODEL);
    }

    #[test]
    fn resolve_api_version_prefers_environment() {
        assert_eq!(
            resolve_api_version_from(env(&[("API_VERSION", "v2beta")])),
            "v2beta"
        );
        assert_eq!(resolve_api_version_from(env(&[])), DEFAULT_API_VERSION);
    }

    #[test]
    fn apply_env_overrides_defaults() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                ("MODEL_NAME", "gemini-2.5-flash"),
                ("PORT", "9090"),
                ("GOOGLE_API_KEY", "g-key"),
                ("REQUEST_TIMEOUT_SECS", "12"),
            ]))
            .unwrap();

        assert_eq!(config.agent.model, "gemini-2.5-flash");
        assert_eq!(config.agent.api_version, DEFAULT_API_VERSION);
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.api.gemini_key.as_deref(), Some("g-key"));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(12)));
    }

    #[test]
    fn zero_timeout_disables_the_limit() {
        let mut config = Config::default();
        assert_eq!(
            config.request_timeout(),
            Some(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        );
        config.apply_env(env(&[("REQUEST_TIMEOUT_SECS", "0")])).unwrap();
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn gemini_key_wins_over_google_key() {
        let mut config = Config::default();
        config
            .apply_env(env(&[("GEMINI_API_KEY", "a"), ("GOOGLE_API_KEY", "b")]))
            .unwrap();
        assert_eq!(config.api.gemini_key.as_deref(), Some("a"));
    }

    #[test]
    fn apply_env_rejects_bad_port() {
        let mut config = Config::default();
        let err = config.apply_env(env(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "PORT", .. }));
    }

    #[test]
    fn load_from_merges_partial_file_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[agent]\nmodel = \"gemini-2.0-flash\"\n\n[server]\nport = 3000"
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.agent.model, "gemini-2.0-flash");
        assert_eq!(config.agent.api_version, DEFAULT_API_VERSION);
        assert_eq!(config.agent.max_output_tokens, DEFAULT_MAX_OUTPUT_TOKENS);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.static_dir, PathBuf::from("static"));
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[agent\nmodel = ").unwrap();
        assert!(matches!(
            Config::load_from(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }
}
