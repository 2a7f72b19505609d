//! TOML-based configuration persistence for the station.
//!
//! Reads and writes `AppConfig` to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\PlantingWall\config.toml`
//! - Linux:    `~/.config/plantingwall/config.toml`
//! - macOS:    `~/Library/Application Support/PlantingWall/config.toml`
//!
//! A `--config <PATH>` flag on the command line overrides the platform path.
//!
//! # What is TOML? (for beginners)
//!
//! TOML (Tom's Obvious Minimal Language) is a configuration file format designed
//! to be easy to read and write.  It looks similar to INI files but with more
//! data types.  Example:
//!
//! ```toml
//! [wall]
//! rows = 3
//! columns = 4
//!
//! [scan]
//! removal_delay_ms = 2000
//!
//! [station]
//! log_level = "info"
//! default_csv = "orders.csv"
//! ```
//!
//! # Serde default values
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when the field is absent from the TOML file.  A missing
//! section falls back to its `Default` impl, so an empty file is a valid
//! config.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The config parsed but holds values the station cannot run with.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level application configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub wall: WallConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub station: StationConfig,
}

/// Grid dimensions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WallConfig {
    #[serde(default = "default_rows")]
    pub rows: usize,
    #[serde(default = "default_columns")]
    pub columns: usize,
}

/// Scan confirmation behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanConfig {
    /// Milliseconds between a confirmed scan and removal of the picked order.
    #[serde(default = "default_removal_delay_ms")]
    pub removal_delay_ms: u64,
}

/// General station behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StationConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Order file imported when `run` starts without `--csv`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_csv: Option<PathBuf>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_rows() -> usize {
    3
}
fn default_columns() -> usize {
    4
}
fn default_removal_delay_ms() -> u64 {
    2000
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            columns: default_columns(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            removal_delay_ms: default_removal_delay_ms(),
        }
    }
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            default_csv: None,
        }
    }
}

impl AppConfig {
    /// Checks values that deserialize fine but cannot drive a wall.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when either grid dimension is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wall.rows == 0 || self.wall.columns == 0 {
            return Err(ConfigError::Invalid(format!(
                "wall must have at least one row and one column (got {}x{})",
                self.wall.rows, self.wall.columns
            )));
        }
        Ok(())
    }

    pub fn removal_delay(&self) -> Duration {
        Duration::from_millis(self.scan.removal_delay_ms)
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from the platform path, returning `AppConfig::default()`
/// if the file does not yet exist.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found"
/// and [`ConfigError::Parse`] if the TOML is malformed.  Values are not
/// validated here; command-line overrides are applied first, then the
/// caller runs [`AppConfig::validate`].
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str::<AppConfig>(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Persists `config` to `path`, creating the parent directory if needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config directory including the `PlantingWall` part.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("PlantingWall"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("plantingwall"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("PlantingWall")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("wall_config_test_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    // ── AppConfig defaults ────────────────────────────────────────────────────

    #[test]
    fn test_app_config_default_is_three_by_four() {
        // Arrange / Act
        let cfg = AppConfig::default();

        // Assert
        assert_eq!(cfg.wall.rows, 3);
        assert_eq!(cfg.wall.columns, 4);
    }

    #[test]
    fn test_app_config_default_removal_delay_is_two_seconds() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.removal_delay(), Duration::from_millis(2000));
    }

    #[test]
    fn test_station_config_default_log_level_is_info() {
        let cfg = StationConfig::default();
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.default_csv.is_none());
    }

    // ── TOML round-trip ───────────────────────────────────────────────────────

    #[test]
    fn test_app_config_serializes_and_deserializes_round_trip() {
        // Arrange
        let mut cfg = AppConfig::default();
        cfg.wall.columns = 6;
        cfg.scan.removal_delay_ms = 500;
        cfg.station.default_csv = Some(PathBuf::from("orders.csv"));

        // Act
        let toml_str = toml::to_string_pretty(&cfg).expect("serialize");
        let restored: AppConfig = toml::from_str(&toml_str).expect("deserialize");

        // Assert
        assert_eq!(cfg, restored);
    }

    #[test]
    fn test_absent_default_csv_is_omitted_from_toml() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).expect("serialize");
        assert!(!toml_str.contains("default_csv"), "None default_csv must be omitted");
    }

    #[test]
    fn test_deserialize_empty_toml_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").expect("deserialize empty");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_deserialize_partial_wall_overrides_defaults() {
        // Arrange
        let toml_str = r#"
[wall]
rows = 5
"#;

        // Act
        let cfg: AppConfig = toml::from_str(toml_str).expect("deserialize partial");

        // Assert
        assert_eq!(cfg.wall.rows, 5);
        // Unspecified fields keep their defaults
        assert_eq!(cfg.wall.columns, 4);
        assert_eq!(cfg.scan.removal_delay_ms, 2000);
    }

    #[test]
    fn test_deserialize_invalid_toml_returns_parse_error() {
        let result: Result<AppConfig, toml::de::Error> = toml::from_str("[[[ not valid toml");
        assert!(result.is_err());
    }

    // ── validate ──────────────────────────────────────────────────────────────

    #[test]
    fn test_validate_rejects_zero_columns() {
        let mut cfg = AppConfig::default();
        cfg.wall.columns = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_accepts_single_slot_wall() {
        let mut cfg = AppConfig::default();
        cfg.wall.rows = 1;
        cfg.wall.columns = 1;
        assert!(cfg.validate().is_ok());
    }

    // ── load / save through explicit paths ────────────────────────────────────

    #[test]
    fn test_load_config_from_missing_file_returns_default() {
        let dir = temp_dir();
        let cfg = load_config_from(&dir.join("config.toml")).unwrap();
        assert_eq!(cfg, AppConfig::default());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_and_load_config_round_trip_via_temp_dir() {
        // Arrange: nested directory that does not exist yet
        let dir = temp_dir();
        let path = dir.join("nested").join("config.toml");
        let mut cfg = AppConfig::default();
        cfg.wall.rows = 2;
        cfg.station.log_level = "debug".to_string();

        // Act
        save_config_to(&cfg, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();

        // Assert
        assert_eq!(loaded.wall.rows, 2);
        assert_eq!(loaded.station.log_level, "debug");

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_config_from_zero_rows_loads_but_fails_validation() {
        // Arrange
        let dir = temp_dir();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[wall]\nrows = 0\n").unwrap();

        // Act
        let cfg = load_config_from(&path).unwrap();

        // Assert: loading leaves validation to the caller
        assert_eq!(cfg.wall.rows, 0);
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_config_from_malformed_file_is_parse_error() {
        let dir = temp_dir();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[wall\nrows = ").unwrap();

        let result = load_config_from(&path);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    // ── config_dir path formation ─────────────────────────────────────────────

    #[test]
    fn test_platform_config_dir_returns_some_on_this_platform() {
        // It may be None in a stripped container without HOME.
        let result = platform_config_dir();
        #[cfg(target_os = "windows")]
        if std::env::var_os("APPDATA").is_some() {
            assert!(result.is_some());
        }
        #[cfg(target_os = "linux")]
        {
            let has_xdg = std::env::var_os("XDG_CONFIG_HOME").is_some();
            let has_home = std::env::var_os("HOME").is_some();
            if has_xdg || has_home {
                assert!(result.is_some());
            }
        }
        #[cfg(target_os = "macos")]
        if std::env::var_os("HOME").is_some() {
            assert!(result.is_some());
        }
    }

    #[test]
    fn test_config_file_path_ends_with_config_toml() {
        if let Ok(path) = config_file_path() {
            assert!(
                path.ends_with("config.toml"),
                "config file must be named config.toml, got {path:?}"
            );
        }
    }
}
