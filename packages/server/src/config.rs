//! Process configuration, read once at startup.
//!
//! | Variable              | Default                  |
//! |-----------------------|--------------------------|
//! | `CENSUS_API_KEY`      | required                 |
//! | `CENSUS_API_BASE_URL` | `https://api.census.gov` |
//! | `BIND_ADDR`           | `127.0.0.1`              |
//! | `PORT`                | `8080`                   |

use thiserror::Error;
use us_languages_census::client::DEFAULT_BASE_URL;

/// Errors that prevent the server from starting.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `CENSUS_API_KEY` is unset or blank.
    #[error("CENSUS_API_KEY must be set to a Census Bureau API key")]
    MissingApiKey,
}

/// Server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Census Bureau API key sent with every table request.
    pub api_key: String,
    /// Census API host.
    pub census_base_url: String,
    /// Address to bind the HTTP server to.
    pub bind_addr: String,
    /// Port to bind the HTTP server to.
    pub port: u16,
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] if `CENSUS_API_KEY` is unset
    /// or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("CENSUS_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let census_base_url =
            lookup("CENSUS_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string());
        let port: u16 = lookup("PORT").and_then(|p| p.parse().ok()).unwrap_or(8080);

        Ok(Self {
            api_key,
            census_base_url,
            bind_addr,
            port,
        })
    }
}
