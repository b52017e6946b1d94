use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ManningConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManningConfig {
    /// Global ceiling on a group's absence percentage for one day.
    #[serde(default = "default_max_absence_percent")]
    pub max_absence_percent: f64,
}

fn default_max_absence_percent() -> f64 {
    4.5
}

impl Default for ManningConfig {
    fn default() -> Self {
        Self {
            max_absence_percent: default_max_absence_percent(),
        }
    }
}

// ---------------------------------------------------------------------------
// AssignmentConfig
// ---------------------------------------------------------------------------

/// How the batch run derives its assignment window from the annual schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentConfig {
    #[serde(default = "default_lead_days")]
    pub lead_days: i64,
    #[serde(default = "default_tail_days")]
    pub tail_days: i64,
    #[serde(default = "default_skip_weekends")]
    pub skip_weekends: bool,
}

fn default_lead_days() -> i64 {
    7
}

fn default_tail_days() -> i64 {
    21
}

fn default_skip_weekends() -> bool {
    true
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            lead_days: default_lead_days(),
            tail_days: default_tail_days(),
            skip_weekends: default_skip_weekends(),
        }
    }
}

// ---------------------------------------------------------------------------
// StorageConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_database")]
    pub database: PathBuf,
}

fn default_database() -> PathBuf {
    PathBuf::from(paths::DEFAULT_DATABASE)
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub manning: ManningConfig,
    #[serde(default)]
    pub assignment: AssignmentConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load `.roster/config.yaml` under `root`, falling back to defaults
    /// when the file does not exist.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn database_path(&self, root: &Path) -> PathBuf {
        paths::database_path(root, &self.storage.database)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        let ceiling = self.manning.max_absence_percent;
        if !(ceiling > 0.0 && ceiling <= 100.0) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "manning.max_absence_percent={ceiling} must be in (0, 100]"
                ),
            });
        } else if ceiling > 50.0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "manning.max_absence_percent={ceiling} lets half a group be absent"
                ),
            });
        }

        if self.assignment.lead_days < 0 || self.assignment.tail_days < 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "assignment.lead_days and assignment.tail_days must not be negative"
                    .to_string(),
            });
        }

        if self.storage.database.as_os_str().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "storage.database is empty".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.manning.max_absence_percent, 4.5);
        assert_eq!(cfg.assignment.lead_days, 7);
        assert_eq!(cfg.assignment.tail_days, 21);
        assert!(cfg.assignment.skip_weekends);
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::default();
        cfg.manning.max_absence_percent = 10.0;
        cfg.assignment.skip_weekends = false;
        cfg.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.manning.max_absence_percent, 10.0);
        assert!(!loaded.assignment.skip_weekends);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml = "manning:\n  max_absence_percent: 12.5\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.manning.max_absence_percent, 12.5);
        assert_eq!(cfg.assignment.tail_days, 21);
        assert_eq!(cfg.storage.database, PathBuf::from(".roster/roster.redb"));
    }

    #[test]
    fn validate_flags_bad_ceiling_and_offsets() {
        let mut cfg = Config::default();
        cfg.manning.max_absence_percent = 0.0;
        cfg.assignment.lead_days = -1;
        let warnings = cfg.validate();
        assert_eq!(
            warnings
                .iter()
                .filter(|w| w.level == WarnLevel::Error)
                .count(),
            2
        );
    }

    #[test]
    fn validate_warns_on_generous_ceiling() {
        let mut cfg = Config::default();
        cfg.manning.max_absence_percent = 60.0;
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Warning);
    }
}
