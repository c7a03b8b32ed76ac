//! Configuration loading and validation.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::converter::{ConverterKind, epoch_serial};

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// Validation errors for configuration values.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("url cannot be empty")]
    EmptyUrl,

    #[error("invalid url (must start with http:// or https://): {url:?}")]
    InvalidUrl { url: String },

    #[error("output path cannot be empty")]
    EmptyOutputPath,

    #[error("http.timeout_secs must be greater than 0")]
    ZeroTimeout,

    #[error("http.connect_timeout_secs must be greater than 0")]
    ZeroConnectTimeout,
}

/// Allow-list path value that disables allow-listing.
pub const ALLOWLIST_DISABLED: &str = "-";

/// Configuration for one import run.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// URL of the source blocklist.
    #[serde(default = "default_url")]
    pub url: String,

    /// Zone file to write. Truncated and rewritten on every run.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Allow-list file, or `-` to disable allow-listing.
    #[serde(default = "default_allowlist")]
    pub allowlist: PathBuf,

    /// Converter used to render the source list.
    #[serde(default)]
    pub converter: ConverterKind,

    /// SOA serial for synthesized zone headers. Defaults to the current Unix time.
    pub zone_serial: Option<u32>,

    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpSettings,
}

/// HTTP client settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSettings {
    /// Deadline in seconds for the whole transfer.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Deadline in seconds for establishing the connection.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

fn default_url() -> String {
    "https://raw.githubusercontent.com/badmojr/1Hosts/master/Lite/rpz.txt".to_string()
}

fn default_output() -> PathBuf {
    PathBuf::from("/usr/local/etc/namedb/rpz.localhost")
}

fn default_allowlist() -> PathBuf {
    PathBuf::from("/usr/local/etc/namedb/rpz-allowlist")
}

const fn default_timeout() -> u64 {
    300
}

const fn default_connect_timeout() -> u64 {
    30
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Path of the allow-list file, or `None` when allow-listing is disabled.
    pub fn allowlist_path(&self) -> Option<&Path> {
        (self.allowlist.as_os_str() != ALLOWLIST_DISABLED).then_some(self.allowlist.as_path())
    }

    /// SOA serial to use for this run.
    pub fn zone_serial(&self) -> u32 {
        self.zone_serial.unwrap_or_else(epoch_serial)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::EmptyUrl);
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(ValidationError::InvalidUrl {
                url: self.url.clone(),
            });
        }

        if self.output.as_os_str().is_empty() {
            return Err(ValidationError::EmptyOutputPath);
        }

        if self.http.timeout_secs == 0 {
            return Err(ValidationError::ZeroTimeout);
        }
        if self.http.connect_timeout_secs == 0 {
            return Err(ValidationError::ZeroConnectTimeout);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_config() {
        let toml = r#"
            url = "https://example.com/list.txt"
            output = "/var/named/rpz.zone"
            allowlist = "/etc/rpz-allowlist"
            converter = "wildcards"
            zone_serial = 2024010101
        "#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(config.url, "https://example.com/list.txt");
        assert_eq!(config.output, Path::new("/var/named/rpz.zone"));
        assert_eq!(config.allowlist_path(), Some(Path::new("/etc/rpz-allowlist")));
        assert_eq!(config.converter, ConverterKind::Wildcards);
        assert_eq!(config.zone_serial(), 2_024_010_101);
    }

    #[test]
    fn test_default_values() {
        let config = Config::parse("").unwrap();

        assert!(config.url.ends_with("/Lite/rpz.txt"));
        assert_eq!(config.output, Path::new("/usr/local/etc/namedb/rpz.localhost"));
        assert_eq!(
            config.allowlist_path(),
            Some(Path::new("/usr/local/etc/namedb/rpz-allowlist"))
        );
        assert_eq!(config.converter, ConverterKind::Rpz);
        assert!(config.zone_serial.is_none());
        assert_eq!(config.http.timeout_secs, 300);
        assert_eq!(config.http.connect_timeout_secs, 30);
    }

    #[test]
    fn test_dash_disables_allowlist() {
        let config = Config::parse(r#"allowlist = "-""#).unwrap();

        assert!(config.allowlist_path().is_none());
    }

    #[test]
    fn test_http_settings() {
        let toml = r#"
            [http]
            timeout_secs = 60
            connect_timeout_secs = 5
        "#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(config.http.timeout_secs, 60);
        assert_eq!(config.http.connect_timeout_secs, 5);
    }

    #[test]
    fn test_unknown_converter_rejected() {
        let result = Config::parse(r#"converter = "hosts""#);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let result = Config::parse(r#"url = "ftp://example.com/list""#);

        assert!(matches!(
            result,
            Err(ConfigError::Validation(ValidationError::InvalidUrl { .. }))
        ));
    }

    #[test]
    fn test_empty_url_rejected() {
        let result = Config::parse(r#"url = """#);

        assert!(matches!(
            result,
            Err(ConfigError::Validation(ValidationError::EmptyUrl))
        ));
    }

    #[test]
    fn test_empty_output_rejected() {
        let result = Config::parse(r#"output = """#);

        assert!(matches!(
            result,
            Err(ConfigError::Validation(ValidationError::EmptyOutputPath))
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let toml = r#"
            [http]
            timeout_secs = 0
        "#;

        assert!(Config::parse(toml).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let toml = r#"
            unknown_field = "value"
        "#;

        assert!(Config::parse(toml).is_err());
    }
}
