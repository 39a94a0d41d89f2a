//! Configuration management for TaskFlow.
//!
//! Configuration can be set via environment variables:
//! - `SUPABASE_URL` - Supabase project URL. Required unless `DEV_MODE=true`.
//! - `SUPABASE_ANON_KEY` - Supabase anon (publishable) key. Required unless `DEV_MODE=true`.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `PUBLIC_URL` - Optional. Externally reachable base URL, used as the
//!   OAuth/sign-up redirect target. Defaults to `http://HOST:PORT`.
//! - `DEV_MODE` - Optional. When `true`, runs without a Supabase project:
//!   a fixed dev identity and a non-persistent in-memory task store.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Supabase project URL (unset only in dev mode)
    pub supabase_url: Option<String>,

    /// Supabase anon key, sent as the `apikey` header on every collaborator call
    pub supabase_anon_key: Option<String>,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Externally reachable base URL (OAuth and sign-up redirect target)
    pub public_url: String,

    /// Run without a Supabase project (fixed identity + in-memory store)
    pub dev_mode: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `SUPABASE_URL` or
    /// `SUPABASE_ANON_KEY` is not set outside dev mode, and
    /// `ConfigError::InvalidValue` for unparseable values.
    pub fn from_env() -> Result<Self, ConfigError> {
        let dev_mode = std::env::var("DEV_MODE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let supabase_url = std::env::var("SUPABASE_URL").ok();
        let supabase_anon_key = std::env::var("SUPABASE_ANON_KEY").ok();

        if !dev_mode {
            if supabase_url.is_none() {
                return Err(ConfigError::MissingEnvVar("SUPABASE_URL".to_string()));
            }
            if supabase_anon_key.is_none() {
                return Err(ConfigError::MissingEnvVar("SUPABASE_ANON_KEY".to_string()));
            }
        }

        if let Some(raw) = supabase_url.as_deref() {
            url::Url::parse(raw).map_err(|e| {
                ConfigError::InvalidValue("SUPABASE_URL".to_string(), e.to_string())
            })?;
        }

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let public_url = std::env::var("PUBLIC_URL")
            .unwrap_or_else(|_| format!("http://{}:{}", host, port));

        Ok(Self {
            supabase_url,
            supabase_anon_key,
            host,
            port,
            public_url,
            dev_mode,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(supabase_url: Option<String>, supabase_anon_key: Option<String>) -> Self {
        Self {
            supabase_url,
            supabase_anon_key,
            host: "127.0.0.1".to_string(),
            port: 3000,
            public_url: "http://127.0.0.1:3000".to_string(),
            dev_mode: false,
        }
    }

    /// Create a dev-mode config (no Supabase project).
    pub fn dev() -> Self {
        Self {
            dev_mode: true,
            ..Self::new(None, None)
        }
    }

    /// Redirect target for OAuth and sign-up confirmation links.
    pub fn redirect_target(&self) -> String {
        format!("{}/todos", self.public_url.trim_end_matches('/'))
    }

    /// Redirect target for the OAuth callback relay page.
    pub fn callback_target(&self) -> String {
        format!("{}/auth/callback", self.public_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_targets_strip_trailing_slash() {
        let mut config = Config::new(None, None);
        config.public_url = "https://tasks.example.com/".to_string();
        assert_eq!(config.redirect_target(), "https://tasks.example.com/todos");
        assert_eq!(
            config.callback_target(),
            "https://tasks.example.com/auth/callback"
        );
    }

    #[test]
    fn test_dev_config() {
        let config = Config::dev();
        assert!(config.dev_mode);
        assert!(config.supabase_url.is_none());
        assert_eq!(config.port, 3000);
    }
}
