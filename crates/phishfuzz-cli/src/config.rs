// crates/phishfuzz-cli/src/config.rs
//
// Runtime configuration for the phishfuzz CLI.
// Loaded from a TOML file or populated with sensible defaults.

use std::fs;
use std::path::PathBuf;

use phishfuzz_core::RuleBaseVersion;
use phishfuzz_extract::Sentinels;
use serde::Deserialize;

/// CLI configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Rule base to score with: "v1" (legacy) or "v2".
    #[serde(default)]
    pub rule_base: RuleBaseVersion,

    /// Output format: "table" or "json".
    #[serde(default = "default_output")]
    pub output: String,

    /// Values substituted for network signals that could not be obtained.
    #[serde(default)]
    pub sentinels: Sentinels,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_output() -> String {
    "table".to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            rule_base: RuleBaseVersion::default(),
            output: default_output(),
            sentinels: Sentinels::default(),
        }
    }
}

impl ScanConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: ScanConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// `<config dir>/phishfuzz/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("phishfuzz").join("config.toml"))
    }
}
