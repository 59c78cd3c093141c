//! Shared configuration for the opshell binaries.
//!
//! Values are layered by `ortho_config`: built-in defaults, then a
//! configuration file (`--config-path` or `OPSHELL_CONFIG_PATH`), then
//! `OPSHELL_*` environment variables, then command-line flags.
//!
//! ```toml
//! log_filter = "opshell_core=debug,info"
//! log_format = "json"
//! node_name = "O=Bank A, L=London, C=GB"
//! ```

mod defaults;
mod logging;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_NODE_NAME, default_log_filter, default_log_filter_string,
    default_log_format, default_node_name_string,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Configuration consumed by the CLI and the in-process node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "OPSHELL")]
pub struct Config {
    /// Tracing filter expression (`EnvFilter` syntax).
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format of log records.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Legal name reported by the node.
    #[ortho_config(default = default_node_name_string())]
    pub node_name: String,
}

impl Config {
    /// Returns the tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the log record format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns the node's legal name.
    #[must_use]
    pub fn node_name(&self) -> &str {
        &self.node_name
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            node_name: default_node_name_string(),
        }
    }
}
