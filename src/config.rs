//! Application configuration.
//!
//! Configuration is loaded from a YAML file (default `config.yaml`, optional) and
//! overridden by environment variables. Two environment surfaces are recognized:
//!
//! - `STARDATE_`-prefixed variables, split on `__` for nested keys
//!   (e.g. `STARDATE_PROVIDERS__APOD_API_KEY`)
//! - the bare `PORT`, `DATABASE_URL` and `NASA_API_KEY` variables that the
//!   deployment environment has always provided

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::Error;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "STARDATE_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// All fields have defaults defined in the `Default` implementation; only the
/// database URL has no usable default and must be supplied.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// PostgreSQL connection string, usually supplied via `DATABASE_URL`
    pub database_url: String,
    /// External fact providers (astronomy picture + date trivia)
    pub providers: ProviderConfig,
}

/// Settings for the two outbound HTTP providers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    /// Astronomy picture endpoint, queried as `?date=YYYY-MM-DD&api_key=...`
    pub apod_url: Url,
    /// API key for the astronomy picture endpoint (`NASA_API_KEY`)
    pub apod_api_key: String,
    /// Date trivia endpoint, queried as `/<month>/<day>/date?json`
    pub date_facts_url: Url,
    /// Timeout applied to every outbound provider request (seconds)
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: String::new(),
            providers: ProviderConfig::default(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            apod_url: Url::parse("https://api.nasa.gov/planetary/apod").expect("valid default APOD URL"),
            apod_api_key: "DEMO_KEY".to_string(),
            date_facts_url: Url::parse("http://numbersapi.com").expect("valid default date facts URL"),
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            .merge(Env::prefixed("STARDATE_").split("__"))
            // Common PORT and DATABASE_URL patterns
            .merge(Env::raw().only(&["PORT", "DATABASE_URL"]))
            .merge(
                Env::raw()
                    .only(&["NASA_API_KEY"])
                    .map(|_| "providers.apod_api_key".into())
                    .split("."),
            )
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> Result<(), Error> {
        if self.database_url.is_empty() {
            return Err(Error::Internal {
                operation: "Config validation: no database URL configured. \
                     Please set the DATABASE_URL environment variable or add database_url to the config file."
                    .to_string(),
            });
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
