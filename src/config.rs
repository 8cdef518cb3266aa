use std::path::{Path, PathBuf};

use crate::logging::default_log_level;

const APP_DIR: &str = "taskdeck";
const STORE_FILE: &str = "store.json";
const LOG_DIR: &str = "logs";

/// Where the store and the logs live, and how verbose the logs are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| absolute(Path::new(".")))
            .join(APP_DIR);
        Self::in_dir(&data_dir)
    }
}

/// `path` made absolute against the working directory. Falls back to the
/// filesystem root when the working directory is gone.
fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| Path::new("/").join(path))
}

impl Config {
    /// Store and logs under `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            store_path: data_dir.join(STORE_FILE),
            log_dir: data_dir.join(LOG_DIR),
            log_level: default_log_level().to_string(),
        }
    }

    /// Applies command line overrides. Logs follow a relocated store.
    pub fn with_overrides(mut self, store_path: Option<PathBuf>, log_level: Option<String>) -> Self {
        if let Some(store_path) = store_path {
            let store_path = absolute(&store_path);
            if let Some(parent) = store_path.parent() {
                self.log_dir = parent.join(LOG_DIR);
            }
            self.store_path = store_path;
        }
        if let Some(log_level) = log_level {
            self.log_level = log_level;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_dir_layout() {
        let config = Config::in_dir(Path::new("/data/taskdeck"));
        assert_eq!(config.store_path, PathBuf::from("/data/taskdeck/store.json"));
        assert_eq!(config.log_dir, PathBuf::from("/data/taskdeck/logs"));
        assert_eq!(config.log_level, default_log_level());
    }

    #[test]
    fn test_default_ends_in_app_dir() {
        let config = Config::default();
        assert!(config.store_path.ends_with("taskdeck/store.json"));
    }

    #[test]
    fn test_default_paths_are_absolute() {
        let config = Config::default();
        assert!(config.store_path.is_absolute());
        assert!(config.log_dir.is_absolute());
    }

    #[test]
    fn test_relative_store_override_keeps_logs_beside_it() {
        let config = Config::in_dir(Path::new("/data/taskdeck"))
            .with_overrides(Some(PathBuf::from("tasks.json")), None);
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(config.store_path, cwd.join("tasks.json"));
        assert_eq!(config.log_dir, cwd.join("logs"));
        assert!(absolute(Path::new(".")).is_absolute());
    }

    #[test]
    fn test_overrides() {
        let config = Config::in_dir(Path::new("/data/taskdeck"))
            .with_overrides(Some(PathBuf::from("/tmp/work/tasks.json")), Some("warn".into()));
        assert_eq!(config.store_path, PathBuf::from("/tmp/work/tasks.json"));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/work/logs"));
        assert_eq!(config.log_level, "warn");

        let untouched = Config::in_dir(Path::new("/data/taskdeck")).with_overrides(None, None);
        assert_eq!(untouched, Config::in_dir(Path::new("/data/taskdeck")));
    }
}
