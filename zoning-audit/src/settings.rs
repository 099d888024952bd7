use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which zone name becomes canonical inside a duplicate-zone group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Smallest zone name wins.
    #[default]
    Lexicographic,
    /// The zone referenced first in the configuration wins.
    FirstOccurrence,
}

/// Tunables of one aggregation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSettings {
    #[serde(default = "default_lsan_prefix")]
    pub lsan_zone_prefix: String,
    #[serde(default = "default_gateway_modes")]
    pub gateway_switch_modes: Vec<String>,
    #[serde(default)]
    pub canonical_tie_break: TieBreak,
    #[serde(default = "default_true")]
    pub storage_model_check: bool,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            lsan_zone_prefix: default_lsan_prefix(),
            gateway_switch_modes: default_gateway_modes(),
            canonical_tie_break: TieBreak::default(),
            storage_model_check: true,
        }
    }
}

impl AuditSettings {
    pub fn is_lsan_zone(&self, zone_name: &str) -> bool {
        let prefix = self.lsan_zone_prefix.to_ascii_lowercase();
        !prefix.is_empty() && zone_name.to_ascii_lowercase().starts_with(&prefix)
    }

    pub fn is_gateway_mode(&self, switch_mode: &str) -> bool {
        let mode = switch_mode.trim();
        self.gateway_switch_modes
            .iter()
            .any(|m| m.eq_ignore_ascii_case(mode))
    }
}

/// Errors returned when loading settings files.
#[derive(Debug, Error)]
pub enum SettingsLoadError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Load settings from a TOML file. Keys left out keep their defaults.
pub fn load_settings(path: &Path) -> Result<AuditSettings, SettingsLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| SettingsLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_settings(&raw, path.display().to_string())
}

/// Built-in settings shipped with the crate.
pub fn default_settings() -> AuditSettings {
    let embedded = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/settings/default.toml"
    ));
    parse_settings(embedded, "embedded settings".to_string()).unwrap_or_default()
}

fn parse_settings(raw: &str, path: String) -> Result<AuditSettings, SettingsLoadError> {
    toml::from_str(raw).map_err(|source| SettingsLoadError::Parse { path, source })
}

fn default_lsan_prefix() -> String {
    "lsan_".to_string()
}

fn default_gateway_modes() -> Vec<String> {
    vec!["access gateway".to_string(), "ag".to_string()]
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{default_settings, load_settings, AuditSettings, SettingsLoadError, TieBreak};

    #[test]
    fn embedded_defaults_match_code_defaults() {
        assert_eq!(default_settings(), AuditSettings::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("audit.toml");
        fs::write(&path, "canonical_tie_break = \"first_occurrence\"\n").expect("write");

        let settings = load_settings(&path).expect("load");
        assert_eq!(settings.canonical_tie_break, TieBreak::FirstOccurrence);
        assert_eq!(settings.lsan_zone_prefix, "lsan_");
        assert!(settings.storage_model_check);
    }

    #[test]
    fn invalid_file_reports_parse_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("audit.toml");
        fs::write(&path, "canonical_tie_break = 3\n").expect("write");

        let err = load_settings(&path).expect_err("invalid");
        assert!(matches!(err, SettingsLoadError::Parse { .. }));
    }

    #[test]
    fn lsan_prefix_is_case_insensitive() {
        let settings = AuditSettings::default();
        assert!(settings.is_lsan_zone("LSAN_host1_array2"));
        assert!(!settings.is_lsan_zone("host1_array2"));
        assert!(settings.is_gateway_mode("Access Gateway"));
        assert!(!settings.is_gateway_mode("native"));
    }
}
