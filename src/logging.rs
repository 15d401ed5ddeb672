use std::collections::HashMap;

use env_logger::Builder;
use log::{debug, warn, LevelFilter};
use serde::{Deserialize, Serialize};

/// Logging subsystems of the songcredits engine
///
/// Lets an embedding application turn up attribution tracing without
/// drowning in database logs, and vice versa.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LoggingSubsystem {
    /// Everything in the crate not covered by a more specific subsystem
    #[serde(rename = "main")]
    Main,
    /// Attribution engine and stats roll-up
    #[serde(rename = "attribution")]
    Attribution,
    /// Splitting, normalization and resolution helpers
    #[serde(rename = "helpers")]
    Helpers,
    /// Store implementations
    #[serde(rename = "stores")]
    Stores,
    /// SQLite store specifically
    #[serde(rename = "database")]
    Database,
}

impl LoggingSubsystem {
    /// The module path this subsystem's filter applies to
    pub fn module_path(&self) -> &'static str {
        match self {
            LoggingSubsystem::Main => "songcredits",
            LoggingSubsystem::Attribution => "songcredits::attribution",
            LoggingSubsystem::Helpers => "songcredits::helpers",
            LoggingSubsystem::Stores => "songcredits::stores",
            LoggingSubsystem::Database => "songcredits::stores::sqlite",
        }
    }

    /// Look a subsystem up by its configuration name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "main" => Some(LoggingSubsystem::Main),
            "attribution" => Some(LoggingSubsystem::Attribution),
            "helpers" => Some(LoggingSubsystem::Helpers),
            "stores" => Some(LoggingSubsystem::Stores),
            "database" => Some(LoggingSubsystem::Database),
            _ => None,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

/// Logging configuration for applications embedding the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level for everything without an override
    #[serde(default = "default_level")]
    pub level: String,

    /// Per-subsystem level overrides, keyed by subsystem name
    #[serde(default)]
    pub subsystems: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            subsystems: HashMap::new(),
        }
    }
}

/// Parse a level name; unknown values fall back to Info
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "off" | "none" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Initialize env_logger from the configuration
///
/// Safe to call more than once; later calls leave the first
/// configuration in place.
pub fn init_logging(config: &LoggingConfig) {
    let mut builder = Builder::new();
    builder.filter_level(parse_level(&config.level));

    let mut unknown: Vec<&str> = Vec::new();
    for (name, level) in &config.subsystems {
        match LoggingSubsystem::from_name(name) {
            Some(subsystem) => {
                builder.filter_module(subsystem.module_path(), parse_level(level));
            }
            None => unknown.push(name),
        }
    }

    if builder.try_init().is_err() {
        debug!("Logger already initialized, keeping existing configuration");
    }

    for name in unknown {
        warn!("Unknown logging subsystem '{}' ignored", name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level("WARN"), LevelFilter::Warn);
        assert_eq!(parse_level("warning"), LevelFilter::Warn);
        assert_eq!(parse_level("off"), LevelFilter::Off);
        assert_eq!(parse_level("bogus"), LevelFilter::Info);
    }

    #[test]
    fn test_subsystem_names_round_trip() {
        for subsystem in [
            LoggingSubsystem::Main,
            LoggingSubsystem::Attribution,
            LoggingSubsystem::Helpers,
            LoggingSubsystem::Stores,
            LoggingSubsystem::Database,
        ] {
            let path = subsystem.module_path();
            assert!(path.starts_with("songcredits"));
        }
        assert_eq!(
            LoggingSubsystem::from_name("Attribution"),
            Some(LoggingSubsystem::Attribution)
        );
        assert_eq!(LoggingSubsystem::from_name("nope"), None);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: LoggingConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.level, "info");
        assert!(config.subsystems.is_empty());

        let config: LoggingConfig = serde_json::from_str(
            r#"{ "level": "warn", "subsystems": { "database": "debug" } }"#,
        )
        .unwrap();
        assert_eq!(config.level, "warn");
        assert_eq!(config.subsystems.get("database").map(String::as_str), Some("debug"));
    }
}
