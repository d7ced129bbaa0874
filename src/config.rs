//! Configuration management for `TripScout`
//!
//! Settings come from built-in defaults, an optional TOML file, `TRIPSCOUT_*`
//! environment variables and finally the conventional provider credential
//! variables (`PEXELS_API_KEY`, ...). The resulting struct is passed
//! explicitly into every adapter, so no component reads the environment on
//! its own.

use crate::TripScoutError;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TripScoutConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Outbound HTTP client settings
    pub http: HttpConfig,
    /// Resolution pipeline settings
    pub pipeline: PipelineConfig,
    /// Photo resolution defaults
    pub photos: PhotoConfig,
    /// Hotel resolution defaults
    pub hotels: HotelConfig,
    /// External provider endpoints and credentials
    pub providers: ProvidersConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for a whole request, adapters included
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
    /// Retries for transient failures (connection errors, 5xx, 429)
    pub max_retries: u32,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Budget for a single adapter before the pipeline moves on
    pub adapter_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoConfig {
    /// Number of photos returned when the caller does not ask for a limit
    pub default_limit: usize,
    /// Requested limits are clamped to this value
    pub max_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HotelConfig {
    /// Hotels per response, live or synthetic
    pub max_results: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub wikimedia: WikimediaConfig,
    pub foursquare: FoursquareConfig,
    pub pexels: PexelsConfig,
    pub booking: BookingConfig,
    pub viator: ViatorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikimediaConfig {
    pub enabled: bool,
    /// MediaWiki action API of the encyclopedia
    pub wikipedia_api_url: String,
    /// MediaWiki action API of the media repository
    pub commons_api_url: String,
    /// Prefix for article links handed back to callers
    pub page_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FoursquareConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub venue_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PexelsConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    pub enabled: bool,
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViatorConfig {
    pub api_key: Option<String>,
    /// Partner API root
    pub api_url: String,
    /// Public website root used by the unauthenticated resolver
    pub public_url: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
    /// OTLP/HTTP collector root, e.g. `http://localhost:4318`
    pub otlp_endpoint: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            request_timeout_seconds: 30,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 5,
            max_retries: 1,
            user_agent: format!(
                "TripScout/{} (https://github.com/tripscout/tripscout)",
                crate::VERSION
            ),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            adapter_timeout_seconds: 6,
        }
    }
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 20,
        }
    }
}

impl Default for HotelConfig {
    fn default() -> Self {
        Self { max_results: 10 }
    }
}

impl Default for WikimediaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            wikipedia_api_url: "https://en.wikipedia.org/w/api.php".to_string(),
            commons_api_url: "https://commons.wikimedia.org/w/api.php".to_string(),
            page_base_url: "https://en.wikipedia.org/wiki/".to_string(),
        }
    }
}

impl Default for FoursquareConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.foursquare.com/v3".to_string(),
            venue_base_url: "https://foursquare.com/v/".to_string(),
        }
    }
}

impl Default for PexelsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.pexels.com/v1".to_string(),
        }
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://www.booking.com".to_string(),
        }
    }
}

impl Default for ViatorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: "https://api.viator.com/partner".to_string(),
            public_url: "https://www.viator.com".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            otlp_endpoint: None,
        }
    }
}

impl TripScoutConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(Self::get_config_path);
        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(FileFormat::Toml),
            );
        }

        // TRIPSCOUT_SERVER__PORT=8080 -> server.port
        builder = builder.add_source(
            Environment::with_prefix("TRIPSCOUT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TripScoutConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_credentials_from(|name| std::env::var(name).ok());
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Config file location: `$TRIPSCOUT_CONFIG` or `./tripscout.toml`
    #[must_use]
    pub fn get_config_path() -> PathBuf {
        std::env::var_os("TRIPSCOUT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("tripscout.toml"))
    }

    /// Fill unset provider credentials from conventional variable names.
    ///
    /// Blank values count as absent so a provider without a usable key is
    /// skipped rather than called.
    pub fn apply_credentials_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let providers = &mut self.providers;
        fill_credential(&mut providers.pexels.api_key, &lookup, "PEXELS_API_KEY");
        fill_credential(&mut providers.foursquare.api_key, &lookup, "FOURSQUARE_API_KEY");
        fill_credential(&mut providers.viator.api_key, &lookup, "VIATOR_API_KEY");
    }

    /// Apply default values to zeroed or blank fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.trim().is_empty() {
            self.server.host = ServerConfig::default().host;
        }
        if self.http.user_agent.trim().is_empty() {
            self.http.user_agent = HttpConfig::default().user_agent;
        }
        if self.logging.level.is_empty() {
            self.logging.level = LoggingConfig::default().level;
        }
        if self.logging.format.is_empty() {
            self.logging.format = LoggingConfig::default().format;
        }
        if self
            .logging
            .otlp_endpoint
            .as_deref()
            .is_some_and(|endpoint| endpoint.trim().is_empty())
        {
            self.logging.otlp_endpoint = None;
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(TripScoutError::config("Server port must be non-zero").into());
        }

        if !(1..=120).contains(&self.server.request_timeout_seconds) {
            return Err(TripScoutError::config(
                "Server request timeout must be between 1 and 120 seconds",
            )
            .into());
        }

        if !(1..=120).contains(&self.http.timeout_seconds) {
            return Err(TripScoutError::config(
                "HTTP timeout must be between 1 and 120 seconds",
            )
            .into());
        }

        if self.http.max_retries > 10 {
            return Err(TripScoutError::config("HTTP max retries cannot exceed 10").into());
        }

        if !(1..=30).contains(&self.pipeline.adapter_timeout_seconds) {
            return Err(TripScoutError::config(
                "Adapter timeout must be between 1 and 30 seconds",
            )
            .into());
        }

        if !(1..=50).contains(&self.photos.max_limit) {
            return Err(TripScoutError::config("Photo max limit must be between 1 and 50").into());
        }

        if self.photos.default_limit == 0 || self.photos.default_limit > self.photos.max_limit {
            return Err(TripScoutError::config(format!(
                "Photo default limit must be between 1 and {}",
                self.photos.max_limit
            ))
            .into());
        }

        if !(1..=50).contains(&self.hotels.max_results) {
            return Err(TripScoutError::config("Hotel max results must be between 1 and 50").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TripScoutError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TripScoutError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let providers = &self.providers;
        let urls = [
            ("providers.wikimedia.wikipedia_api_url", &providers.wikimedia.wikipedia_api_url),
            ("providers.wikimedia.commons_api_url", &providers.wikimedia.commons_api_url),
            ("providers.wikimedia.page_base_url", &providers.wikimedia.page_base_url),
            ("providers.foursquare.base_url", &providers.foursquare.base_url),
            ("providers.foursquare.venue_base_url", &providers.foursquare.venue_base_url),
            ("providers.pexels.base_url", &providers.pexels.base_url),
            ("providers.booking.base_url", &providers.booking.base_url),
            ("providers.viator.api_url", &providers.viator.api_url),
            ("providers.viator.public_url", &providers.viator.public_url),
        ];
        for (key, url) in urls {
            if !is_http_url(url) {
                return Err(TripScoutError::config(format!(
                    "{key} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if let Some(endpoint) = &self.logging.otlp_endpoint {
            if !is_http_url(endpoint) {
                return Err(TripScoutError::config(
                    "logging.otlp_endpoint must be a valid HTTP or HTTPS URL",
                )
                .into());
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn adapter_timeout(&self) -> Duration {
        Duration::from_secs(self.pipeline.adapter_timeout_seconds)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_seconds)
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn fill_credential<F>(slot: &mut Option<String>, lookup: &F, name: &str)
where
    F: Fn(&str) -> Option<String>,
{
    if slot.as_deref().is_some_and(|key| key.trim().is_empty()) {
        *slot = None;
    }
    if slot.is_none() {
        *slot = lookup(name)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = TripScoutConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.pipeline.adapter_timeout_seconds, 6);
        assert_eq!(config.hotels.max_results, 10);
        assert_eq!(config.photos.default_limit, 10);
        assert!(config.providers.pexels.api_key.is_none());
        assert!(config.providers.wikimedia.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_credentials_from_lookup() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("PEXELS_API_KEY", "pexels-key"),
            ("FOURSQUARE_API_KEY", "   "),
        ]);
        let mut config = TripScoutConfig::default();
        config.providers.viator.api_key = Some("from-file".to_string());

        config.apply_credentials_from(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.providers.pexels.api_key.as_deref(), Some("pexels-key"));
        assert!(config.providers.foursquare.api_key.is_none());
        assert_eq!(config.providers.viator.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_blank_configured_key_counts_as_absent() {
        let mut config = TripScoutConfig::default();
        config.providers.pexels.api_key = Some(String::new());
        config.apply_credentials_from(|_| None);
        assert!(config.providers.pexels.api_key.is_none());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = TripScoutConfig::default();
        config.logging.level = "verbose".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_adapter_timeout() {
        let mut config = TripScoutConfig::default();
        config.pipeline.adapter_timeout_seconds = 0;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Adapter timeout"));
    }

    #[test]
    fn test_config_validation_photo_limits() {
        let mut config = TripScoutConfig::default();
        config.photos.default_limit = 30;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = TripScoutConfig::default();
        config.providers.booking.base_url = "booking.com".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("providers.booking.base_url"));
    }

    #[test]
    fn test_apply_defaults_clears_blank_otlp_endpoint() {
        let mut config = TripScoutConfig::default();
        config.logging.otlp_endpoint = Some(" ".to_string());
        config.logging.level = String::new();
        config.apply_defaults();
        assert!(config.logging.otlp_endpoint.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let config =
            TripScoutConfig::load_from_path(Some(PathBuf::from("/nonexistent/tripscout.toml")));
        let config = config.unwrap();
        assert!(config.validate().is_ok());
        assert!(config.bind_address().ends_with(&config.server.port.to_string()));
    }
}
