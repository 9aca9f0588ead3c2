//! Configuration for scriptdex

use crate::decode::{TYPE_ANNOTATION, TYPE_LIST_SEPARATOR};
use crate::ScriptdexError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration as TOML
pub const DEFAULT_CONFIG: &str = r#"# scriptdex configuration

[delimiters]
# Separates the fields of an index record (must match the writer)
primary = "\u0000"
# Separates the entries of a list-valued field
sub = ","

[query]
# Type listings with members attach in parallel above this many types
parallel_threshold = 64

[log]
# tracing filter used when SCRIPTDEX_LOG is unset
filter = "warn"
"#;

/// scriptdex configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub delimiters: Delimiters,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Field separators of the record encoding. Neither may appear in a type or
/// member name, nor be `:` or `|`, which annotate parameter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delimiters {
    #[serde(default = "default_primary")]
    pub primary: char,
    #[serde(default = "default_sub")]
    pub sub: char,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Delimiters {
    /// Separators used by the index writer.
    pub const DEFAULT: Delimiters = Delimiters {
        primary: '\0',
        sub: ',',
    };
}

// Default value functions
fn default_primary() -> char {
    Delimiters::DEFAULT.primary
}
fn default_sub() -> char {
    Delimiters::DEFAULT.sub
}
fn default_parallel_threshold() -> usize {
    64
}
fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Err(ScriptdexError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse config from TOML string
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| ScriptdexError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> crate::Result<()> {
        if self.delimiters.primary == self.delimiters.sub {
            return Err(ScriptdexError::ConfigParse(format!(
                "primary and sub delimiters must differ (both {:?})",
                self.delimiters.primary
            )));
        }
        for delimiter in [self.delimiters.primary, self.delimiters.sub] {
            if delimiter == TYPE_ANNOTATION || TYPE_LIST_SEPARATOR.contains(delimiter) {
                return Err(ScriptdexError::ConfigParse(format!(
                    "{delimiter:?} is reserved for parameter types and cannot be a delimiter"
                )));
            }
        }
        Ok(())
    }
}
