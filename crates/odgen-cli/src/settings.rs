//! Run settings: input/output locations and generation knobs.
//!
//! Settings come from an optional TOML file; keys left out take the
//! defaults of the standard production folder layout:
//!
//! ```toml
//! breakdown = "arquivos/DECUPAGEM.csv"
//! plan = "arquivos/PLANO_FINAL.pdf"
//! config = "config_dias_filmagem.json"
//! output_dir = "arquivos/ODs"
//! scenes_per_day = 3
//! shoot_date = "2025-08-25"
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use odgen_core::DEFAULT_SCENES_PER_DAY;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings error
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Cannot read settings {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings in {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Scene breakdown CSV
    pub breakdown: PathBuf,
    /// Shooting plan (PDF, or an extracted .txt)
    pub plan: PathBuf,
    /// Project configuration JSON, rewritten on every run
    pub config: PathBuf,
    /// Directory receiving one spreadsheet per day
    pub output_dir: PathBuf,
    /// Group size when the plan has no day markers
    pub scenes_per_day: usize,
    /// Date printed on the sheet banner; today when unset
    pub shoot_date: Option<NaiveDate>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            breakdown: PathBuf::from("arquivos/DECUPAGEM.csv"),
            plan: PathBuf::from("arquivos/PLANO_FINAL.pdf"),
            config: PathBuf::from("config_dias_filmagem.json"),
            output_dir: PathBuf::from("arquivos/ODs"),
            scenes_per_day: DEFAULT_SCENES_PER_DAY,
            shoot_date: None,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| SettingsError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SettingsError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Input files that do not exist on disk
    pub fn missing_inputs(&self) -> Vec<&Path> {
        [self.breakdown.as_path(), self.plan.as_path()]
            .into_iter()
            .filter(|p| !p.is_file())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_production_layout() {
        let settings = Settings::default();
        assert_eq!(settings.breakdown, Path::new("arquivos/DECUPAGEM.csv"));
        assert_eq!(settings.plan, Path::new("arquivos/PLANO_FINAL.pdf"));
        assert_eq!(settings.config, Path::new("config_dias_filmagem.json"));
        assert_eq!(settings.output_dir, Path::new("arquivos/ODs"));
        assert_eq!(settings.scenes_per_day, 3);
        assert_eq!(settings.shoot_date, None);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odgen.toml");
        std::fs::write(&path, "plan = \"plano.txt\"\nshoot_date = \"2025-08-25\"\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.plan, Path::new("plano.txt"));
        assert_eq!(settings.shoot_date, NaiveDate::from_ymd_opt(2025, 8, 25));
        assert_eq!(settings.breakdown, Settings::default().breakdown);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odgen.toml");
        std::fs::write(&path, "output = \"out\"\n").unwrap();
        assert!(matches!(Settings::load(&path), Err(SettingsError::Toml { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Settings::load(Path::new("/nonexistent/odgen.toml")).unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
        assert_eq!(Settings::load_or_default(None).unwrap(), Settings::default());
    }

    #[test]
    fn reports_missing_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("DECUPAGEM.csv");
        std::fs::write(&csv, "CENA\n").unwrap();
        let settings = Settings {
            breakdown: csv,
            plan: dir.path().join("PLANO_FINAL.pdf"),
            ..Settings::default()
        };
        assert_eq!(settings.missing_inputs(), vec![settings.plan.as_path()]);
    }
}
