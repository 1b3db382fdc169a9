/// User configuration from `config.toml`.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::db;
use crate::export::ExportColumns;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Overrides the default database location.
    #[serde(default)]
    pub database: Option<PathBuf>,
    /// Window used by `today --recent` and the recent job list.
    #[serde(default = "default_recent_weeks")]
    pub recent_weeks: u32,
    #[serde(default)]
    pub export: ExportColumns,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database: None,
            recent_weeks: default_recent_weeks(),
            export: ExportColumns::default(),
        }
    }
}

fn default_recent_weeks() -> u32 {
    6
}

impl Config {
    pub fn database_path(&self) -> PathBuf {
        self.database.clone().unwrap_or_else(db::default_db_path)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("daylog").join("config.toml"))
}

/// Loads the config file; a missing file means defaults.
pub fn load(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config: Config =
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert!(!config.export.sync_columns);
        assert!(config.export.show_index);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "database = \"/tmp/work.db\"\n\n[export]\nsync_columns = true\nshow_timestamp = false\n",
        )
        .unwrap();
        let config = load(&path).unwrap();
        assert_eq!(config.database_path(), PathBuf::from("/tmp/work.db"));
        assert_eq!(config.recent_weeks, 6);
        assert!(config.export.sync_columns);
        assert!(!config.export.show_timestamp);
        assert!(config.export.show_job_id);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "recent_weeks = \"many\"").unwrap();
        assert!(load(&path).is_err());
    }
}
