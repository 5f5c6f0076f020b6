//! Layered server configuration.
//!
//! Sources, later wins:
//! 1. compiled defaults
//! 2. the YAML file given with `--config`
//! 3. `AIRTABLE_API_KEY`, as `record_store.api_key`
//! 4. `ELIS__SECTION__KEY` environment variables
//! 5. CLI overrides

use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use ordering::OrderingConfig;
use record_store::RecordStoreConfig;
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "ELIS__";
pub const API_KEY_ENV: &str = "AIRTABLE_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
    pub record_store: RecordStoreConfig,
    pub ordering: OrderingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    /// Requests still running after this are answered with 504.
    #[serde(with = "elis_utils::humantime_serde")]
    pub request_timeout: Duration,
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_owned(),
            port: 3000,
            request_timeout: Duration::from_secs(30),
            body_limit_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// # Errors
    /// Fails when `bind_addr` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .bind_addr
            .parse()
            .with_context(|| format!("server.bind_addr: '{}' is not an IP address", self.bind_addr))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    pub enabled: bool,
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub allow_credentials: bool,
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_owned()],
            allowed_methods: ["GET", "POST", "OPTIONS"].map(str::to_owned).to_vec(),
            allowed_headers: ["Origin", "X-Requested-With", "Content-Type", "Accept"]
                .map(str::to_owned)
                .to_vec(),
            allow_credentials: false,
            max_age_seconds: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

/// Values taken from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
}

impl AppConfig {
    /// Loads defaults, then `path`, then the environment.
    ///
    /// # Errors
    /// Fails on unreadable YAML, unknown keys or values of the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(
                Env::raw()
                    .only(&[API_KEY_ENV])
                    .map(|_| "record_store.api_key".into()),
            )
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid configuration")
    }

    pub fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
    }

    /// Checks everything that can be checked without the network.
    ///
    /// # Errors
    /// Names the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        self.server.socket_addr()?;
        if self.server.request_timeout.is_zero() {
            bail!("server.request_timeout: must be greater than zero");
        }
        if self.server.body_limit_bytes == 0 {
            bail!("server.body_limit_bytes: must be greater than zero");
        }
        if self.cors.enabled
            && self.cors.allow_credentials
            && self.cors.allowed_origins.iter().any(|o| o == "*")
        {
            bail!("cors: allowed_origins ['*'] cannot be combined with allow_credentials");
        }
        if self.ordering.max_pcs_per_order == 0 {
            bail!("ordering.max_pcs_per_order: must be at least 1");
        }
        self.record_store
            .validate()
            .context("record_store configuration")?;
        Ok(())
    }

    /// # Errors
    /// Fails when the configuration cannot be rendered.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).context("failed to render configuration as YAML")
    }
}
