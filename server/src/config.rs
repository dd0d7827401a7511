use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use url::Url;

const DEFAULT_UPSTREAM: &str = "https://api.github.com/repos/obs-ndi/obs-ndi";

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Port cannot be 0")]
    InvalidPort,

    #[error("Upstream user agent cannot be empty")]
    EmptyUserAgent,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ValidationError),
}

/// Server configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Listener for incoming requests
    #[serde(default)]
    pub listener: Listener,
    /// Upstream release repository
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Document store for ping records
    pub store: StoreConfig,
    /// Optional statsd metrics exporter
    pub statsd: Option<StatsdConfig>,
}

impl Config {
    /// Validates the server configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.listener.validate()?;

        if self.upstream.user_agent.is_empty() {
            return Err(ValidationError::EmptyUserAgent);
        }

        if let Some(statsd) = &self.statsd {
            if statsd.port == 0 {
                return Err(ValidationError::InvalidPort);
            }
        }

        Ok(())
    }
}

/// Network listener configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Listener {
    /// Host address to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    /// Port number to listen on
    pub port: u16,
}

impl Listener {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }
}

impl Default for Listener {
    fn default() -> Self {
        Listener {
            host: "127.0.0.1".into(),
            port: 3000,
        }
    }
}

/// Upstream release repository configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct UpstreamConfig {
    /// Repository API base, e.g. "https://api.github.com/repos/obs-ndi/obs-ndi"
    ///
    /// Note: Uses the `url::Url` type so invalid URLs are rejected during
    /// config deserialization.
    #[serde(default = "default_upstream_url")]
    pub url: Url,
    /// User-Agent sent upstream; GitHub rejects requests without one
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        UpstreamConfig {
            url: default_upstream_url(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_upstream_url() -> Url {
    Url::parse(DEFAULT_UPSTREAM).expect("default upstream URL parses")
}

fn default_user_agent() -> String {
    "ndi-update-server".to_string()
}

/// Document store backend for ping records
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
#[serde(tag = "type")]
pub enum StoreConfig {
    /// One JSON document per client id under `<base_dir>/updates/`
    Filesystem { base_dir: String },
    /// Records kept in process memory, lost on restart
    Memory,
}

/// Statsd metrics exporter configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct StatsdConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_statsd_prefix")]
    pub prefix: String,
}

fn default_statsd_prefix() -> String {
    "ndi-update-server".to_string()
}

pub fn load_from_file(path: &Path) -> Result<Config, ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    let config: Config = serde_yaml::from_str(&raw)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
listener:
    host: "0.0.0.0"
    port: 8080
upstream:
    url: "https://api.github.com/repos/obs-ndi/obs-ndi"
    user_agent: "obs-ndi-site"
store:
    type: filesystem
    base_dir: /var/lib/ndi-update-server
statsd:
    host: "127.0.0.1"
    port: 8125
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());

        assert_eq!(config.listener.port, 8080);
        assert_eq!(config.upstream.user_agent, "obs-ndi-site");
        assert_eq!(
            config.store,
            StoreConfig::Filesystem {
                base_dir: "/var/lib/ndi-update-server".to_string()
            }
        );
        let statsd = config.statsd.unwrap();
        assert_eq!(statsd.port, 8125);
        assert_eq!(statsd.prefix, "ndi-update-server");
    }

    #[test]
    fn test_defaults() {
        let yaml = r#"
store:
    type: memory
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());

        assert_eq!(config.listener, Listener::default());
        assert_eq!(config.upstream.url.as_str(), DEFAULT_UPSTREAM);
        assert_eq!(config.store, StoreConfig::Memory);
        assert!(config.statsd.is_none());
    }

    #[test]
    fn test_validation_errors() {
        let base = Config {
            listener: Listener::default(),
            upstream: UpstreamConfig::default(),
            store: StoreConfig::Memory,
            statsd: None,
        };

        let mut config = base.clone();
        config.listener.port = 0;
        assert!(matches!(
            config.validate().unwrap_err(),
            ValidationError::InvalidPort
        ));

        let mut config = base.clone();
        config.upstream.user_agent = String::new();
        assert!(matches!(
            config.validate().unwrap_err(),
            ValidationError::EmptyUserAgent
        ));

        let mut config = base;
        config.statsd = Some(StatsdConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            prefix: default_statsd_prefix(),
        });
        assert!(matches!(
            config.validate().unwrap_err(),
            ValidationError::InvalidPort
        ));
    }

    #[test]
    fn test_deserialization_errors() {
        // Invalid upstream URL
        assert!(
            serde_yaml::from_str::<Config>(
                r#"
upstream: {url: "not-a-url"}
store: {type: memory}
"#
            )
            .is_err()
        );

        // Unknown store backend
        assert!(
            serde_yaml::from_str::<Config>(
                r#"
store: {type: cloud}
"#
            )
            .is_err()
        );

        // Missing store section
        assert!(serde_yaml::from_str::<Config>("listener: {host: a, port: 1}").is_err());
    }
}
