//! Configuration management
//!
//! Settings are resolved in the following priority order:
//! 1. Environment variables
//! 2. wa-gateway.toml config file
//! 3. Default values
//!
//! Inside the config file, `${VAR_NAME}` strings are expanded from the
//! environment before parsing.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Error;

/// Delivery provider backend selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Simulated in-process provider (no network)
    #[default]
    Simulated,
    /// Generic HTTP provider (UltraMsg/Fonnte-style APIs)
    Http,
}

/// Delivery provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Which provider backend to use
    #[serde(default)]
    pub kind: ProviderKind,

    /// Remote API endpoint (http provider only)
    pub api_url: Option<String>,

    /// Bearer token for the remote API (http provider only)
    pub token: Option<String>,

    /// Artificial network latency of the simulated provider
    #[serde(default = "default_send_delay_ms")]
    pub send_delay_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Simulated,
            api_url: None,
            token: None,
            send_delay_ms: default_send_delay_ms(),
        }
    }
}

/// Bot reply timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotTimingConfig {
    /// Delay before the bot engine is invoked on an inbound message
    #[serde(default = "default_thinking_delay_ms")]
    pub thinking_delay_ms: u64,

    /// Delay before a matched reply is handed to the provider
    #[serde(default = "default_typing_delay_ms")]
    pub typing_delay_ms: u64,
}

impl Default for BotTimingConfig {
    fn default() -> Self {
        Self {
            thinking_delay_ms: default_thinking_delay_ms(),
            typing_delay_ms: default_typing_delay_ms(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port for the HTTP API server
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

/// Main configuration for wa-gateway
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub bot: BotTimingConfig,
}

fn default_port() -> u16 {
    3001
}

fn default_send_delay_ms() -> u64 {
    800
}

fn default_thinking_delay_ms() -> u64 {
    600
}

fn default_typing_delay_ms() -> u64 {
    800
}

impl Config {
    /// Expand `${VAR_NAME}` references against the environment.
    ///
    /// Unknown variables expand to the empty string.
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next(); // consume '{'

                let mut var_name = String::new();
                while let Some(&c) = chars.peek() {
                    if c == '}' {
                        chars.next(); // consume '}'
                        break;
                    }
                    var_name.push(chars.next().unwrap());
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// Load configuration from a TOML file, then apply env overrides
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let toml_content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let expanded = Self::expand_env_vars(&toml_content);

        let mut config: Config = toml::from_str(&expanded)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from the default locations.
    ///
    /// Tries `./wa-gateway.toml` first, then falls back to environment
    /// variables with built-in defaults.
    pub fn load() -> crate::Result<Self> {
        if Path::new("wa-gateway.toml").exists() {
            return Self::from_toml_file("wa-gateway.toml");
        }

        Self::from_env()
    }

    /// Environment variables take precedence over file values
    fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("WA_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }

        if let Ok(kind) = std::env::var("WA_PROVIDER") {
            self.provider.kind = match kind.to_lowercase().as_str() {
                "http" => ProviderKind::Http,
                _ => ProviderKind::Simulated,
            };
        }

        if let Ok(url) = std::env::var("WA_PROVIDER_URL") {
            self.provider.api_url = Some(url);
        }

        if let Ok(token) = std::env::var("WA_PROVIDER_TOKEN") {
            self.provider.token = Some(token);
        }
    }

    /// Validate provider settings before constructing a backend
    pub fn validate(&self) -> crate::Result<()> {
        if self.provider.kind == ProviderKind::Http {
            if self.provider.api_url.is_none() {
                return Err(Error::Config(
                    "provider.api_url is required for the http provider".to_string(),
                ));
            }
            if self.provider.token.is_none() {
                return Err(Error::Config(
                    "provider.token is required for the http provider".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.provider.kind, ProviderKind::Simulated);
        assert_eq!(config.bot.thinking_delay_ms, 600);
        assert_eq!(config.bot.typing_delay_ms, 800);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            [server]
            port = 8080

            [provider]
            kind = "http"
            api_url = "https://api.example.com/send"
            token = "secret"

            [bot]
            thinking_delay_ms = 0
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.provider.kind, ProviderKind::Http);
        assert_eq!(config.bot.thinking_delay_ms, 0);
        assert_eq!(config.bot.typing_delay_ms, 800);
    }

    #[test]
    fn test_expand_env_vars() {
        unsafe { std::env::set_var("WA_TEST_TOKEN_XYZ", "tok123") };
        let expanded = Config::expand_env_vars("token = \"${WA_TEST_TOKEN_XYZ}\"");
        assert_eq!(expanded, "token = \"tok123\"");

        let missing = Config::expand_env_vars("${WA_TEST_MISSING_XYZ}");
        assert_eq!(missing, "");
    }

    #[test]
    fn test_validate_http_requires_url_and_token() {
        let mut config = Config::default();
        config.provider.kind = ProviderKind::Http;
        assert!(config.validate().is_err());

        config.provider.api_url = Some("https://api.example.com".to_string());
        config.provider.token = Some("t".to_string());
        assert!(config.validate().is_ok());
    }
}
