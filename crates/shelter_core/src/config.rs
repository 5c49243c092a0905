//! Runtime settings for the shelter store.
//!
//! # Responsibility
//! - Resolve the store file location.
//! - Resolve logging level and directory.
//!
//! # Invariants
//! - Explicit caller values win over environment variables, which win over
//!   built-in defaults.
//! - Blank environment values are treated as unset.

use crate::db::DATABASE_NAME;
use crate::logging::default_log_level;
use std::path::{Path, PathBuf};

/// Overrides the store file location.
pub const DB_PATH_ENV: &str = "SHELTER_DB_PATH";
/// Overrides the log level (`trace|debug|info|warn|error`).
pub const LOG_LEVEL_ENV: &str = "SHELTER_LOG_LEVEL";
/// Enables file logging into the given absolute directory.
pub const LOG_DIR_ENV: &str = "SHELTER_LOG_DIR";

/// Resolves the store file path.
///
/// Order: `explicit`, then `SHELTER_DB_PATH`, then `<temp_dir>/shelter.db`.
pub fn resolve_db_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    env_value(DB_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(DATABASE_NAME))
}

/// Logging settings resolved from arguments and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    /// `None` leaves file logging disabled.
    pub log_dir: Option<String>,
}

impl LogSettings {
    /// Resolves level and directory; explicit values take precedence.
    pub fn resolve(level: Option<&str>, log_dir: Option<&str>) -> Self {
        let level = level
            .map(str::to_string)
            .or_else(|| env_value(LOG_LEVEL_ENV))
            .unwrap_or_else(|| default_log_level().to_string());
        let log_dir = log_dir
            .map(str::to_string)
            .or_else(|| env_value(LOG_DIR_ENV));
        Self { level, log_dir }
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{resolve_db_path, LogSettings, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use crate::logging::default_log_level;
    use std::path::{Path, PathBuf};

    #[test]
    fn explicit_db_path_wins() {
        let path = Path::new("/var/lib/shelter/pets.db");
        assert_eq!(resolve_db_path(Some(path)), path);
    }

    #[test]
    fn explicit_log_settings_win() {
        let settings = LogSettings::resolve(Some("warn"), Some("/tmp/shelter-logs"));
        assert_eq!(settings.level, "warn");
        assert_eq!(settings.log_dir.as_deref(), Some("/tmp/shelter-logs"));
    }

    // Process environment is global: every env-dependent case lives in this
    // one test so parallel tests never observe a half-set variable.
    #[test]
    fn env_values_fill_in_missing_arguments() {
        std::env::set_var(DB_PATH_ENV, "  /srv/shelter/pets.db  ");
        assert_eq!(resolve_db_path(None), PathBuf::from("/srv/shelter/pets.db"));

        std::env::set_var(DB_PATH_ENV, "   ");
        assert_eq!(
            resolve_db_path(None),
            std::env::temp_dir().join("shelter.db")
        );

        std::env::remove_var(DB_PATH_ENV);
        assert_eq!(
            resolve_db_path(None),
            std::env::temp_dir().join("shelter.db")
        );

        std::env::set_var(LOG_LEVEL_ENV, " debug ");
        std::env::set_var(LOG_DIR_ENV, "/var/log/shelter");
        let settings = LogSettings::resolve(None, None);
        assert_eq!(settings.level, "debug");
        assert_eq!(settings.log_dir.as_deref(), Some("/var/log/shelter"));

        let settings = LogSettings::resolve(Some("error"), Some("/tmp/explicit"));
        assert_eq!(settings.level, "error");
        assert_eq!(settings.log_dir.as_deref(), Some("/tmp/explicit"));

        std::env::set_var(LOG_LEVEL_ENV, "");
        std::env::remove_var(LOG_DIR_ENV);
        let settings = LogSettings::resolve(None, None);
        assert_eq!(settings.level, default_log_level());
        assert_eq!(settings.log_dir, None);

        std::env::remove_var(LOG_LEVEL_ENV);
    }
}
