//! Configuration loading: a TOML file per environment with
//! `GATEWAY__`-prefixed environment variable overrides, validated
//! fail-fast before the server binds.

use std::path::PathBuf;

use common_utils::consts;
use domain_types::types::{Connectors, Proxy};

use crate::{error::ConfigurationError, logger::Log};

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Config {
    pub server: Server,
    #[serde(default)]
    pub log: Log,
    #[serde(default)]
    pub proxy: Proxy,
    pub order_module: OrderModule,
    pub connectors: Connectors,
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

impl Server {
    pub async fn tcp_listener(&self) -> Result<tokio::net::TcpListener, ConfigurationError> {
        let loc = format!("{}:{}", self.host, self.port);
        tracing::info!(loc = %loc, "binding the server");
        Ok(tokio::net::TcpListener::bind(loc).await?)
    }
}

/// Where the order module's cart read API lives.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct OrderModule {
    pub base_url: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Env {
    #[default]
    Development,
    Production,
    Sandbox,
}

impl Env {
    pub fn current_env() -> Self {
        std::env::var("RUN_ENV")
            .ok()
            .and_then(|env| env.parse().ok())
            .unwrap_or_default()
    }

    fn config_file_name(self) -> &'static str {
        match self {
            Self::Development => "development.toml",
            Self::Production => "production.toml",
            Self::Sandbox => "sandbox.toml",
        }
    }
}

impl Config {
    /// Builds the configuration from the default locations.
    pub fn new() -> Result<Self, ConfigurationError> {
        Self::new_with_config_path(None)
    }

    pub fn new_with_config_path(
        explicit_config_path: Option<PathBuf>,
    ) -> Result<Self, ConfigurationError> {
        let env = Env::current_env();
        let config_path = Self::config_path(env, explicit_config_path);

        let config = config::Config::builder()
            .add_source(config::File::from(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(consts::ENV_PREFIX)
                    .try_parsing(true)
                    .separator("__"),
            )
            .build()?;

        let config: Self = serde_path_to_error::deserialize(config)
            .map_err(|error| ConfigurationError::InvalidConfig(error.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn config_path(env: Env, explicit_config_path: Option<PathBuf>) -> PathBuf {
        let mut config_path = PathBuf::new();
        if let Some(explicit) = explicit_config_path {
            config_path.push(explicit);
        } else {
            config_path.push(workspace_path());
            config_path.push("config");
            config_path.push(env.config_file_name());
        }
        config_path
    }

    /// Every field a request would need must be present at startup, so
    /// a misconfigured deployment fails here and not mid-payment.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.server.host.is_empty() {
            return Err(ConfigurationError::InvalidConfig(
                "server.host must be set".to_string(),
            ));
        }
        if self.order_module.base_url.is_empty() {
            return Err(ConfigurationError::InvalidConfig(
                "order_module.base_url must be set".to_string(),
            ));
        }
        self.connectors
            .ottu
            .validate("ottu")
            .map_err(ConfigurationError::InvalidConfig)?;
        self.connectors
            .upayments
            .validate("upayments")
            .map_err(ConfigurationError::InvalidConfig)?;
        Ok(())
    }
}

pub fn workspace_path() -> PathBuf {
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let mut path = PathBuf::from(manifest_dir);
        path.pop();
        path.pop();
        path
    } else {
        PathBuf::from(".")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use common_utils::masking::Secret;
    use domain_types::types::ConnectorParams;

    use super::*;

    fn params(merchant_id: &str) -> ConnectorParams {
        ConnectorParams {
            base_url: "https://api.example.com".to_string(),
            merchant_id: Secret::new(merchant_id.to_string()),
            secret_key: Secret::new("s3cr3t".to_string()),
            return_url: "https://shop.example.com/return".to_string(),
        }
    }

    fn config() -> Config {
        Config {
            server: Server {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            log: Log::default(),
            proxy: Proxy::default(),
            order_module: OrderModule {
                base_url: "http://orders.internal".to_string(),
            },
            connectors: Connectors {
                ottu: params("merchant_1"),
                upayments: params("merchant_2"),
            },
        }
    }

    #[test]
    fn complete_config_validates() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn missing_connector_secret_fails_naming_the_field() {
        let mut config = config();
        config.connectors.upayments.secret_key = Secret::new(String::new());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("upayments.secret_key"));
    }

    #[test]
    fn missing_order_module_url_fails() {
        let mut config = config();
        config.order_module.base_url = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("order_module.base_url"));
    }
}
