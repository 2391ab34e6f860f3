//! Tracing setup for the gateway service.

use serde::Deserialize;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Log {
    pub console: LogConsole,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LogConsole {
    pub enabled: bool,
    pub level: String,
    pub log_format: LogFormat,
    /// Directive which sets the log level for one or more
    /// crates/modules, e.g. `server=debug,hyper=warn`.
    pub filtering_directive: Option<String>,
}

impl Default for LogConsole {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            log_format: LogFormat::default(),
            filtering_directive: None,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Default,
    #[default]
    Json,
}

/// Installs the global subscriber. `RUST_LOG` wins over the config
/// file's filtering directive, which wins over the configured level.
pub fn setup(config: &Log) {
    if !config.console.enabled {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = config
            .console
            .filtering_directive
            .clone()
            .unwrap_or_else(|| config.console.level.clone());
        EnvFilter::new(directive)
    });

    let fmt_layer = match config.console.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Default => fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
