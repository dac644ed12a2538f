//! Configuration loading and typed config structures for Refinder.
//!
//! The configuration lives in `refinder-config.yaml` in the working
//! directory. Every field has a default, so an empty or partial file is
//! valid. A handful of environment variables override the file after
//! parsing (see [`RefinderConfig::apply_env_overrides`]).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "refinder-config.yaml";

/// Overrides `saves.directory`.
pub const ENV_SAVE_DIR: &str = "REFINDER_SAVE_DIR";
/// Overrides `observer.port`.
pub const ENV_OBSERVER_PORT: &str = "REFINDER_OBSERVER_PORT";
/// Any non-empty value enables `debug.dump_json`.
pub const ENV_DEBUG_SAVE_JSON: &str = "DEBUG_SAVE_JSON";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RefinderConfig {
    /// Save folder location and file naming.
    #[serde(default)]
    pub saves: SavesConfig,

    /// Live-sync loop tuning.
    #[serde(default)]
    pub sync: SyncConfig,

    /// Observer HTTP server.
    #[serde(default)]
    pub observer: ObserverConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Debugging aids.
    #[serde(default)]
    pub debug: DebugConfig,
}

impl RefinderConfig {
    /// Load configuration from a YAML file at the given path, then apply
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string. No environment overrides
    /// are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply overrides from the process environment:
    /// - `REFINDER_SAVE_DIR` overrides `saves.directory`
    /// - `REFINDER_OBSERVER_PORT` overrides `observer.port` (ignored when
    ///   not a valid port)
    /// - `DEBUG_SAVE_JSON` (non-empty) enables `debug.dump_json`
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(ENV_SAVE_DIR).filter(|v| !v.is_empty()) {
            self.saves.directory = Some(PathBuf::from(dir));
        }
        if let Some(port) = lookup(ENV_OBSERVER_PORT).and_then(|v| v.parse().ok()) {
            self.observer.port = port;
        }
        if lookup(ENV_DEBUG_SAVE_JSON).is_some_and(|v| !v.is_empty()) {
            self.debug.dump_json = true;
        }
    }
}

/// Save folder location and file naming.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SavesConfig {
    /// Explicit save folder; bypasses discovery when set.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Ordered roots searched for a user folder.
    #[serde(default = "default_search_roots")]
    pub search_roots: Vec<PathBuf>,

    /// Profile file name.
    #[serde(default = "default_profile_file")]
    pub profile_file: String,

    /// Prefix of per-character save files (`<prefix>_<id>.<ext>`).
    #[serde(default = "default_character_file_prefix")]
    pub character_file_prefix: String,

    /// Save file extension, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl SavesConfig {
    /// File name of character `id`'s session save.
    pub fn character_file(&self, id: impl std::fmt::Display) -> String {
        format!("{}_{id}.{}", self.character_file_prefix, self.extension)
    }
}

impl Default for SavesConfig {
    fn default() -> Self {
        Self {
            directory: None,
            search_roots: default_search_roots(),
            profile_file: default_profile_file(),
            character_file_prefix: default_character_file_prefix(),
            extension: default_extension(),
        }
    }
}

/// Live-sync loop tuning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SyncConfig {
    /// Capacity of the bounded notification queue.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Coalescing window in milliseconds; 0 disables debouncing.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl SyncConfig {
    /// The coalescing window.
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// Observer HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObserverConfig {
    /// Whether the observer server is started.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Bind address.
    #[serde(default = "default_observer_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_observer_port")]
    pub port: u16,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_observer_host(),
            port: default_observer_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default log level when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Debugging aids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DebugConfig {
    /// Write every decoded archive next to its save as `<file>.json`.
    #[serde(default)]
    pub dump_json: bool,
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

/// `<USERPROFILE|HOME>/Saved Games/Remnant2/Steam`, then
/// `<USERPROFILE|HOME>/Saved Games/Remnant2`.
fn default_search_roots() -> Vec<PathBuf> {
    let Some(home) = std::env::var_os("USERPROFILE").or_else(|| std::env::var_os("HOME")) else {
        return Vec::new();
    };
    let base = PathBuf::from(home).join("Saved Games").join("Remnant2");
    vec![base.join("Steam"), base]
}

fn default_profile_file() -> String {
    "profile.sav".to_owned()
}

fn default_character_file_prefix() -> String {
    "save".to_owned()
}

fn default_extension() -> String {
    "sav".to_owned()
}

const fn default_queue_capacity() -> usize {
    64
}

const fn default_debounce_ms() -> u64 {
    250
}

const fn default_true() -> bool {
    true
}

fn default_observer_host() -> String {
    "127.0.0.1".to_owned()
}

const fn default_observer_port() -> u16 {
    8787
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = RefinderConfig::default();
        assert_eq!(config.saves.profile_file, "profile.sav");
        assert_eq!(config.saves.character_file(5), "save_5.sav");
        assert_eq!(config.sync.queue_capacity, 64);
        assert_eq!(config.sync.debounce(), Duration::from_millis(250));
        assert!(config.observer.enabled);
        assert_eq!(config.observer.port, 8787);
        assert_eq!(config.logging.level, "info");
        assert!(!config.debug.dump_json);
        assert!(config.saves.directory.is_none());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
saves:
  directory: "/tmp/saves"
  search_roots:
    - "/a"
    - "/b"
  profile_file: "prof.sav"
  character_file_prefix: "slot"
  extension: "dat"

sync:
  queue_capacity: 8
  debounce_ms: 0

observer:
  enabled: false
  host: "0.0.0.0"
  port: 9000

logging:
  level: "debug"

debug:
  dump_json: true
"#;
        let config = RefinderConfig::parse(yaml).unwrap();
        assert_eq!(config.saves.directory, Some(PathBuf::from("/tmp/saves")));
        assert_eq!(config.saves.search_roots.len(), 2);
        assert_eq!(config.saves.character_file(2), "slot_2.dat");
        assert_eq!(config.sync.debounce_ms, 0);
        assert!(!config.observer.enabled);
        assert_eq!(config.observer.port, 9000);
        assert_eq!(config.logging.level, "debug");
        assert!(config.debug.dump_json);
    }

    #[test]
    fn parse_partial_yaml_uses_defaults() {
        let config = RefinderConfig::parse("observer:\n  port: 1234\n").ok();
        assert_eq!(config.as_ref().map(|c| c.observer.port), Some(1234));
        assert_eq!(
            config.as_ref().map(|c| c.observer.host.as_str()),
            Some("127.0.0.1")
        );
        assert_eq!(config.map(|c| c.sync.queue_capacity), Some(64));
    }

    #[test]
    fn empty_yaml_is_default() {
        let config = RefinderConfig::parse("").ok();
        assert_eq!(config, Some(RefinderConfig::default()));
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(matches!(
            RefinderConfig::parse("sync: [unclosed"),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn overrides_are_applied() {
        let vars: BTreeMap<&str, &str> = [
            (ENV_SAVE_DIR, "/env/saves"),
            (ENV_OBSERVER_PORT, "7000"),
            (ENV_DEBUG_SAVE_JSON, "1"),
        ]
        .into_iter()
        .collect();
        let mut config = RefinderConfig::default();
        config.apply_overrides(|name| vars.get(name).map(|v| (*v).to_owned()));
        assert_eq!(config.saves.directory, Some(PathBuf::from("/env/saves")));
        assert_eq!(config.observer.port, 7000);
        assert!(config.debug.dump_json);
    }

    #[test]
    fn invalid_port_override_is_ignored() {
        let mut config = RefinderConfig::default();
        config.apply_overrides(|name| (name == ENV_OBSERVER_PORT).then(|| "nope".to_owned()));
        assert_eq!(config.observer.port, 8787);
        assert!(!config.debug.dump_json);
    }
}
