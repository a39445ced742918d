// ⚙️ Configuration - Where the store lives and how loud logging is

use std::path::PathBuf;

/// Store file used when nothing else is configured
pub const DEFAULT_DB_FILE: &str = "gpa-ledger.db";

/// Environment variable naming the store file
pub const DB_ENV_VAR: &str = "GPA_LEDGER_DB";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite file holding the course and theme snapshots
    pub db_path: PathBuf,

    /// `EnvFilter` directive; `None` keeps logging off
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            log_filter: None,
        }
    }
}

impl Config {
    /// Log file next to the store, used while the terminal UI is up
    pub fn log_file(&self) -> PathBuf {
        self.db_path.with_extension("log")
    }

    /// Merge explicit settings over the defaults
    pub fn resolve(db_path: Option<PathBuf>, log_filter: Option<String>) -> Self {
        let defaults = Config::default();
        Config {
            db_path: db_path.unwrap_or(defaults.db_path),
            log_filter: log_filter.filter(|f| !f.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::resolve(None, None);
        assert_eq!(config.db_path, PathBuf::from("gpa-ledger.db"));
        assert_eq!(config.log_filter, None);
    }

    #[test]
    fn test_overrides() {
        let config = Config::resolve(Some(PathBuf::from("/tmp/x.db")), Some("debug".into()));
        assert_eq!(config.db_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.log_filter.as_deref(), Some("debug"));

        let blank = Config::resolve(None, Some("  ".into()));
        assert_eq!(blank.log_filter, None);
    }

    #[test]
    fn test_log_file_sits_next_to_store() {
        let config = Config::resolve(Some(PathBuf::from("/tmp/grades.db")), None);
        assert_eq!(config.log_file(), PathBuf::from("/tmp/grades.log"));
    }
}
