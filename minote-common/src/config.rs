//! Configuration loading, path resolution and atomic writes
//!
//! Every section of the TOML file is optional. A missing file never stops
//! the journal: it logs a warning and runs on built-in defaults.
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. `MINOTE_CONFIG` environment variable
//! 3. Platform config dir: `<config_dir>/minote/config.toml`
//! 4. Built-in defaults (no file)

use crate::tags::TagCatalog;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "MINOTE_CONFIG";

/// Longest accepted `reconcile.lookback_days` (about a century)
pub const MAX_LOOKBACK_DAYS: u32 = 36_500;

/// Complete journal configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Duplicate detection tiers used by CSV import
    #[serde(default)]
    pub duplicates: DuplicateConfig,

    /// External-source reconciliation settings
    #[serde(default)]
    pub reconcile: ReconcileConfig,

    /// Mood/activity labels offered by the journal
    #[serde(default)]
    pub tags: TagCatalog,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Duplicate detection tiers
///
/// The exact tier is always on. The loose tier (wider window plus fuzzy
/// note match) comes from earlier export formats and is off by default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateConfig {
    /// Exact tier: maximum event-time distance in seconds
    #[serde(default = "default_exact_time_tolerance")]
    pub exact_time_tolerance_secs: u64,

    #[serde(default)]
    pub loose_tier_enabled: bool,

    /// Loose tier: maximum event-time distance in seconds
    #[serde(default = "default_loose_time_tolerance")]
    pub loose_time_tolerance_secs: u64,

    /// Loose tier: note similarity must be strictly greater than this
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            exact_time_tolerance_secs: default_exact_time_tolerance(),
            loose_tier_enabled: false,
            loose_time_tolerance_secs: default_loose_time_tolerance(),
            similarity_threshold: default_similarity_threshold(),
        }
    }
}

impl DuplicateConfig {
    /// Defaults with the loose tier switched on
    pub fn with_loose_tier() -> Self {
        Self {
            loose_tier_enabled: true,
            ..Self::default()
        }
    }
}

/// External-source reconciliation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// An incoming record within this many seconds of a local record is skipped
    #[serde(default = "default_time_window")]
    pub time_window_secs: u64,

    /// Activity assigned to records created from an external source
    #[serde(default = "default_synced_activity")]
    pub default_activity: String,

    /// How far back a pull fetches from the external source
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            time_window_secs: default_time_window(),
            default_activity: default_synced_activity(),
            lookback_days: default_lookback_days(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_exact_time_tolerance() -> u64 {
    1
}

fn default_loose_time_tolerance() -> u64 {
    300
}

fn default_similarity_threshold() -> f64 {
    0.8
}

fn default_time_window() -> u64 {
    60
}

fn default_synced_activity() -> String {
    "synced".to_string()
}

fn default_lookback_days() -> u32 {
    30
}

impl TomlConfig {
    /// Parse configuration text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no tier can work with
    pub fn validate(&self) -> Result<()> {
        let threshold = self.duplicates.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(Error::Config(format!(
                "duplicates.similarity_threshold must be within [0, 1], got {}",
                threshold
            )));
        }
        if self.duplicates.loose_time_tolerance_secs < self.duplicates.exact_time_tolerance_secs {
            return Err(Error::Config(format!(
                "duplicates.loose_time_tolerance_secs ({}) is narrower than exact_time_tolerance_secs ({})",
                self.duplicates.loose_time_tolerance_secs, self.duplicates.exact_time_tolerance_secs
            )));
        }
        if self.reconcile.time_window_secs == 0 {
            return Err(Error::Config(
                "reconcile.time_window_secs must be positive".to_string(),
            ));
        }
        if self.reconcile.lookback_days > MAX_LOOKBACK_DAYS {
            return Err(Error::Config(format!(
                "reconcile.lookback_days must be at most {}, got {}",
                MAX_LOOKBACK_DAYS, self.reconcile.lookback_days
            )));
        }
        if self.reconcile.default_activity.trim().is_empty() {
            return Err(Error::Config(
                "reconcile.default_activity must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

/// Resolve which config file to read, if any
///
/// Returns `None` when no argument or environment override is given and no
/// file exists in the platform config dir.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config dir
    default_config_path().filter(|p| p.exists())
}

/// `<config_dir>/minote/config.toml` for the current platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("minote").join("config.toml"))
}

/// Load configuration, degrading to defaults when the file is missing
///
/// A file that exists but fails to parse or validate is an error.
pub fn load_config(path: Option<&Path>) -> Result<TomlConfig> {
    let Some(path) = path else {
        info!("No config file found, using built-in defaults");
        return Ok(TomlConfig::default());
    };

    match std::fs::read_to_string(path) {
        Ok(content) => {
            let config = TomlConfig::from_toml_str(&content)?;
            info!("Loaded configuration from {}", path.display());
            Ok(config)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(
                "Config file {} not found, using built-in defaults",
                path.display()
            );
            Ok(TomlConfig::default())
        }
        Err(e) => Err(Error::Config(format!(
            "Read config {} failed: {}",
            path.display(),
            e
        ))),
    }
}

/// Write configuration atomically (temp file + rename)
///
/// On Unix the file is created with permissions 0600.
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;
    write_atomic(path, content.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

/// Write `bytes` to `path` via a sibling temp file and a rename
///
/// Creates missing parent directories. The temp file is removed if the
/// rename fails.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut temp_name = path
        .file_name()
        .ok_or_else(|| Error::InvalidInput(format!("Not a file path: {}", path.display())))?
        .to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    std::fs::write(&temp_path, bytes)?;
    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(Error::Io(e));
    }
    Ok(())
}
