//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.wordfreq.toml` files.

use crate::models::WORD_FREQUENCY_SUBJECT;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = ".wordfreq.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Bus listener settings.
    #[serde(default)]
    pub bus: BusConfig,

    /// Analyzer settings.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
}

/// Bus listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusConfig {
    /// Address the listener binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Subject the frequency handler subscribes to.
    #[serde(default = "default_subject")]
    pub subject: String,

    /// Largest accepted envelope, in bytes.
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,

    /// How long shutdown waits for open connections to finish, in seconds.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            subject: default_subject(),
            max_message_bytes: default_max_message_bytes(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

fn default_listen_addr() -> String {
    "127.0.0.1:7878".to_string()
}

fn default_subject() -> String {
    WORD_FREQUENCY_SUBJECT.to_string()
}

fn default_max_message_bytes() -> usize {
    1024 * 1024 // 1MB
}

fn default_shutdown_timeout_secs() -> u64 {
    30
}

/// Analyzer settings for the one-shot CLI mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// topN used when `--top-n` is not given.
    #[serde(default = "default_top_n")]
    pub default_top_n: i64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            default_top_n: default_top_n(),
        }
    }
}

fn default_top_n() -> i64 {
    10
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from `.wordfreq.toml` inside `dir`.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Try to load configuration from the current directory.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref listen) = args.listen {
            self.bus.listen_addr = listen.clone();
        }
        if let Some(ref subject) = args.subject {
            self.bus.subject = subject.clone();
        }
        if let Some(max) = args.max_message_bytes {
            self.bus.max_message_bytes = max;
        }
        if let Some(top_n) = args.top_n {
            self.analyzer.default_top_n = top_n;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.bus.subject, "word.frequency");
        assert_eq!(config.bus.max_message_bytes, 1024 * 1024);
        assert_eq!(config.analyzer.default_top_n, 10);
        assert_eq!(config.bus.shutdown_timeout_secs, 30);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[bus]
listen_addr = "0.0.0.0:9000"
max_message_bytes = 4096
shutdown_timeout_secs = 5

[analyzer]
default_top_n = 3
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.bus.listen_addr, "0.0.0.0:9000");
        assert_eq!(config.bus.subject, "word.frequency");
        assert_eq!(config.bus.max_message_bytes, 4096);
        assert_eq!(config.bus.shutdown_timeout_secs, 5);
        assert_eq!(config.analyzer.default_top_n, 3);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[bus]"));
        assert!(toml_str.contains("[analyzer]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.bus.listen_addr, Config::default().bus.listen_addr);
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[bus]\nsubject = \"text.words\"\n",
        )
        .unwrap();

        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.bus.subject, "text.words");
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[bus\nlisten_addr = 1").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        let mut args = make_args();
        args.listen = Some("127.0.0.1:1".to_string());
        args.top_n = Some(4);

        config.merge_with_args(&args);

        assert_eq!(config.bus.listen_addr, "127.0.0.1:1");
        assert_eq!(config.bus.subject, "word.frequency");
        assert_eq!(config.analyzer.default_top_n, 4);
    }

    #[test]
    fn test_generated_config_only_has_settings_that_apply() {
        // Verbosity is a command-line concern (-v / -q), never a file setting.
        let toml_str = Config::default_toml();
        assert!(!toml_str.contains("[general]"));
        assert!(!toml_str.contains("verbose"));

        // Files written by older versions still load.
        let config: Config = toml::from_str("[general]\nverbose = true\n").unwrap();
        assert_eq!(config.bus.subject, "word.frequency");
    }
}
