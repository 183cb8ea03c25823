//! Configuration loading and root folder resolution
//!
//! Root folder priority order:
//! 1. Command-line argument (handled by each binary before calling the resolver)
//! 2. Environment variable (`XIAMIU_ROOT_FOLDER`, then `XIAMIU_ROOT`)
//! 3. TOML config file (`~/.config/xiamiu/<module>.toml`, then `/etc/xiamiu/<module>.toml`)
//! 4. OS-dependent compiled default
//!
//! A missing or malformed TOML file never stops startup: the resolver logs a
//! warning and carries on with the next tier.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "xiamiu.db";

/// Default bearer token lifetime
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

/// Pick the token lifetime from `(source, value)` tiers in priority order
///
/// A value below one minute would expire every token on issue; it is
/// skipped with a warning and the next tier is consulted.
pub fn resolve_token_ttl<'a>(tiers: impl IntoIterator<Item = (&'a str, Option<i64>)>) -> i64 {
    for (source, value) in tiers {
        match value {
            Some(minutes) if minutes >= 1 => return minutes,
            Some(minutes) => warn!(
                "Ignoring token_ttl_minutes = {} from {} (must be at least 1)",
                minutes, source
            ),
            None => {}
        }
    }
    DEFAULT_TOKEN_TTL_MINUTES
}

/// Bootstrap configuration read from `<module>.toml`
///
/// Every field is optional so that partial files stay valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Folder holding `xiamiu.db`
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Interface to bind the HTTP server on
    #[serde(default)]
    pub bind_address: Option<String>,

    /// HTTP port
    #[serde(default)]
    pub port: Option<u16>,

    /// Bearer token lifetime in minutes
    #[serde(default)]
    pub token_ttl_minutes: Option<i64>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (logs to stderr if not specified)
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

fn default_log_level() -> String {
    "info".to_string()
}

/// Values used when neither CLI, environment nor TOML supply one
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub bind_address: String,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl CompiledDefaults {
    /// Defaults for the platform this binary was built for
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            bind_address: "127.0.0.1".to_string(),
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/xiamiu (or /var/lib/xiamiu for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("xiamiu"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/xiamiu"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/xiamiu
        dirs::data_dir()
            .map(|d| d.join("xiamiu"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/xiamiu"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\xiamiu
        dirs::data_local_dir()
            .map(|d| d.join("xiamiu"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\xiamiu"))
    } else {
        PathBuf::from("./xiamiu_data")
    }
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Resolves the root folder and TOML config for one service
pub struct RootFolderResolver {
    module_name: String,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
        }
    }

    /// Resolve root folder (environment → TOML → compiled default)
    pub fn resolve(&self) -> PathBuf {
        if let Ok(path) = std::env::var("XIAMIU_ROOT_FOLDER") {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Ok(path) = std::env::var("XIAMIU_ROOT") {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(root_folder) = self.load_toml().root_folder {
            return root_folder;
        }

        CompiledDefaults::for_current_platform().root_folder
    }

    /// Load this module's TOML config, or defaults when absent/unreadable
    pub fn load_toml(&self) -> TomlConfig {
        let Some(path) = self.config_file_path() else {
            debug!("No config file for {}, using defaults", self.module_name);
            return TomlConfig::default();
        };

        match load_toml_config(&path) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("{} (continuing with defaults)", e);
                TomlConfig::default()
            }
        }
    }

    /// First existing config file for this module, user config before system config
    fn config_file_path(&self) -> Option<PathBuf> {
        let file_name = format!("{}.toml", self.module_name);

        let user_config = dirs::config_dir().map(|d| d.join("xiamiu").join(&file_name));
        if let Some(path) = user_config {
            if path.exists() {
                return Some(path);
            }
        }

        if cfg!(unix) {
            let system_config = PathBuf::from("/etc/xiamiu").join(&file_name);
            if system_config.exists() {
                return Some(system_config);
            }
        }

        None
    }
}

/// Prepares the root folder on disk
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    /// Create the root folder (and parents) if missing; idempotent
    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }

    pub fn database_exists(&self) -> bool {
        self.database_path().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_logging_defaults() {
        let logging = LoggingConfig::default();
        assert_eq!(logging.level, "info");
        assert!(logging.file.is_none());
    }

    #[test]
    fn test_resolve_token_ttl_priority() {
        assert_eq!(
            resolve_token_ttl([("cli", Some(10)), ("toml", Some(20))]),
            10
        );
        assert_eq!(resolve_token_ttl([("cli", None), ("toml", Some(20))]), 20);
        assert_eq!(
            resolve_token_ttl([("cli", None), ("toml", None)]),
            DEFAULT_TOKEN_TTL_MINUTES
        );
    }

    #[test]
    fn test_resolve_token_ttl_skips_non_positive() {
        assert_eq!(
            resolve_token_ttl([("cli", Some(0)), ("toml", Some(15))]),
            15
        );
        assert_eq!(
            resolve_token_ttl([("cli", Some(-5)), ("settings", None)]),
            DEFAULT_TOKEN_TTL_MINUTES
        );
    }

    #[test]
    fn test_partial_toml_parses() {
        let config: TomlConfig = toml::from_str("port = 9000\n").unwrap();
        assert_eq!(config.port, Some(9000));
        assert_eq!(config.root_folder, None);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_toml_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "root_folder = \"/srv/xiamiu\"\ntoken_ttl_minutes = 5\n[logging]\nlevel = \"debug\""
        )
        .unwrap();

        let config = load_toml_config(file.path()).unwrap();
        assert_eq!(config.root_folder, Some(PathBuf::from("/srv/xiamiu")));
        assert_eq!(config.token_ttl_minutes, Some(5));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_toml_config_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number").unwrap();

        let result = load_toml_config(file.path());
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
