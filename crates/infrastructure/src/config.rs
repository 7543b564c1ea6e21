//! Runner configuration.
//!
//! Layered, lowest precedence first: built-in defaults, an optional config
//! file, `SONDE_*` environment variables, then explicit overrides (CLI
//! flags). The result is validated before any scenario runs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Default base URL (json-server's default address).
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = concat!("sonde/", env!("CARGO_PKG_VERSION"));

/// Environment variable prefix (`SONDE_BASE_URL`, `SONDE_TIMEOUT_MS`, ...).
pub const ENV_PREFIX: &str = "SONDE";

/// Errors raised while assembling or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    /// The base URL does not parse.
    #[error("invalid base URL '{url}': {message}")]
    InvalidBaseUrl {
        /// The configured value.
        url: String,
        /// Parser message.
        message: String,
    },

    /// The base URL is not http or https.
    #[error("unsupported base URL scheme '{scheme}' (expected http or https)")]
    UnsupportedScheme {
        /// The configured scheme.
        scheme: String,
    },

    /// A zero timeout would fail every request.
    #[error("timeout_ms must be greater than zero")]
    ZeroTimeout,
}

/// Settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Base URL request paths are joined onto.
    pub base_url: String,
    /// Client-level timeout per request, in milliseconds.
    pub timeout_ms: u64,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl RunnerConfig {
    /// Checks the values that would otherwise fail only at request time.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for a malformed or non-http(s) base URL or a
    /// zero timeout.
    pub fn validate(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            message: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme {
                scheme: url.scheme().to_string(),
            });
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(url)
    }
}

/// Values that take precedence over every other source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Base URL from the command line.
    pub base_url: Option<String>,
    /// Timeout from the command line.
    pub timeout_ms: Option<u64>,
}

/// Builds a `RunnerConfig` from its layers.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    suite_base_url: Option<String>,
    use_env: bool,
    overrides: ConfigOverrides,
}

impl ConfigLoader {
    /// Creates a loader that reads defaults and the environment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            use_env: true,
            ..Self::default()
        }
    }

    /// Adds a config file (`.toml`, `.yaml` or `.json`); it must exist.
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Uses the suite's own base URL above the defaults but below every
    /// other source.
    #[must_use]
    pub fn with_suite_base_url(mut self, base_url: Option<String>) -> Self {
        self.suite_base_url = base_url;
        self
    }

    /// Skips `SONDE_*` environment variables.
    #[must_use]
    pub const fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    /// Sets the highest-precedence overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Merges every layer and validates the result.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if a source cannot be read or has the
    /// wrong shape, and a validation error otherwise.
    pub fn load(self) -> Result<RunnerConfig, ConfigError> {
        let defaults = RunnerConfig::default();
        let base_url = self.suite_base_url.unwrap_or(defaults.base_url);
        let mut builder = ::config::Config::builder()
            .set_default("base_url", base_url)?
            .set_default("timeout_ms", defaults.timeout_ms)?
            .set_default("user_agent", defaults.user_agent)?;

        if let Some(path) = &self.file {
            builder = builder.add_source(::config::File::from(path.as_path()).required(true));
        }
        if self.use_env {
            builder = builder
                .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true));
        }

        let settings = builder
            .set_override_option("base_url", self.overrides.base_url)?
            .set_override_option("timeout_ms", self.overrides.timeout_ms)?
            .build()?;

        let config: RunnerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ConfigLoader::new().without_env().load().unwrap();
        assert_eq!(config, RunnerConfig::default());
        assert_eq!(config.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_file_then_overrides() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "base_url = \"http://api.test:8080\"\ntimeout_ms = 1500").unwrap();

        let config = ConfigLoader::new()
            .without_env()
            .with_file(file.path())
            .load()
            .unwrap();
        assert_eq!(config.base_url, "http://api.test:8080");
        assert_eq!(config.timeout_ms, 1500);

        let config = ConfigLoader::new()
            .without_env()
            .with_file(file.path())
            .with_overrides(ConfigOverrides {
                base_url: Some("https://staging.test".into()),
                timeout_ms: None,
            })
            .load()
            .unwrap();
        assert_eq!(config.base_url, "https://staging.test");
        assert_eq!(config.timeout_ms, 1500);
    }

    #[test]
    fn test_suite_base_url_is_lowest_explicit_layer() {
        let config = ConfigLoader::new()
            .without_env()
            .with_suite_base_url(Some("http://suite.test".into()))
            .load()
            .unwrap();
        assert_eq!(config.base_url, "http://suite.test");

        let config = ConfigLoader::new()
            .without_env()
            .with_suite_base_url(Some("http://suite.test".into()))
            .with_overrides(ConfigOverrides {
                base_url: Some("http://cli.test".into()),
                timeout_ms: Some(10),
            })
            .load()
            .unwrap();
        assert_eq!(config.base_url, "http://cli.test");
        assert_eq!(config.timeout_ms, 10);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = ConfigLoader::new()
            .without_env()
            .with_file("/nonexistent/sonde.toml")
            .load();
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_validation() {
        let mut config = RunnerConfig {
            base_url: "not a url".into(),
            ..RunnerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidBaseUrl { .. })));

        config.base_url = "ftp://files.test".into();
        assert!(matches!(config.validate(), Err(ConfigError::UnsupportedScheme { .. })));

        config.base_url = "https://api.test/v1".into();
        config.timeout_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTimeout)));

        config.timeout_ms = 5;
        assert_eq!(config.validate().unwrap().host_str(), Some("api.test"));
    }
}
