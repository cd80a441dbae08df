//! Layered settings resolution.
//!
//! Settings are loaded from two levels with increasing priority:
//!
//! 1. **User** - `{config_dir}/speckit/settings.json`
//! 2. **Project** - `.specify/settings.json` in the project root
//!
//! Higher levels override lower ones, with deep merging for nested objects.
//! Arrays are replaced, not concatenated. Missing files are skipped.
//!
//! # Example
//!
//! ```rust,ignore
//! use speckit::config::SettingsLoader;
//! use std::path::Path;
//!
//! let (settings, sources) = SettingsLoader::new().load_with_sources(Path::new("."))?;
//! for source in &sources {
//!     println!("{}: {} ({})", source.level, source.path.display(), source.loaded);
//! }
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{ImplementConfig, SpeckitSettings};
use crate::error::{Result, SpeckitError};

// ============================================================================
// Settings Level
// ============================================================================

/// Level in the settings hierarchy. User < Project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SettingsLevel {
    User,
    Project,
}

impl std::fmt::Display for SettingsLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Project => write!(f, "project"),
        }
    }
}

/// A settings file that was (or could have been) loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsSource {
    pub level: SettingsLevel,
    pub path: PathBuf,
    /// `false` when the file does not exist.
    pub loaded: bool,
}

// ============================================================================
// Settings Loader
// ============================================================================

/// Loads [`SpeckitSettings`] with user and project layering.
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    user_path: Option<PathBuf>,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsLoader {
    /// Create a loader using the platform's user config directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            user_path: Self::default_user_path(),
        }
    }

    /// Default user settings path, `None` if the config dir is unknown.
    #[must_use]
    pub fn default_user_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("speckit").join("settings.json"))
    }

    /// Use a custom user settings path.
    #[must_use]
    pub fn with_user_path(mut self, path: PathBuf) -> Self {
        self.user_path = Some(path);
        self
    }

    /// Ignore user-level settings.
    #[must_use]
    pub fn without_user_settings(mut self) -> Self {
        self.user_path = None;
        self
    }

    /// Load merged settings for `project_root`.
    ///
    /// # Errors
    ///
    /// Returns [`SpeckitError::Config`] if a settings file exists but is not
    /// valid JSON for [`SpeckitSettings`].
    pub fn load(&self, project_root: &Path) -> Result<SpeckitSettings> {
        self.load_with_sources(project_root).map(|(settings, _)| settings)
    }

    /// Load merged settings and report which files took part.
    ///
    /// # Errors
    ///
    /// See [`SettingsLoader::load`].
    pub fn load_with_sources(
        &self,
        project_root: &Path,
    ) -> Result<(SpeckitSettings, Vec<SettingsSource>)> {
        let mut merged = serde_json::to_value(SpeckitSettings::default())?;
        let mut sources = Vec::new();

        let levels = [
            (SettingsLevel::User, self.user_path.clone()),
            (
                SettingsLevel::Project,
                Some(ImplementConfig::settings_path(project_root)),
            ),
        ];

        for (level, path) in levels {
            let Some(path) = path else { continue };
            let loaded = path.is_file();
            if loaded {
                debug!("Loading {} settings from {}", level, path.display());
                let layer = read_layer(&path)?;
                deep_merge(&mut merged, layer);
            }
            sources.push(SettingsSource {
                level,
                path,
                loaded,
            });
        }

        let settings = serde_json::from_value(merged)
            .map_err(|e| SpeckitError::config(format!("invalid settings: {e}")))?;
        Ok((settings, sources))
    }
}

fn read_layer(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| SpeckitError::config_with_path(e.to_string(), path.to_path_buf()))?;
    serde_json::from_str(&content)
        .map_err(|e| SpeckitError::config_with_path(e.to_string(), path.to_path_buf()))
}

/// Merge `child` into `parent`; objects merge recursively, anything else is replaced.
fn deep_merge(parent: &mut serde_json::Value, child: serde_json::Value) {
    match (parent, child) {
        (serde_json::Value::Object(parent_map), serde_json::Value::Object(child_map)) => {
            for (key, child_value) in child_map {
                match parent_map.get_mut(&key) {
                    Some(parent_value) => deep_merge(parent_value, child_value),
                    None => {
                        parent_map.insert(key, child_value);
                    }
                }
            }
        }
        (parent, child) => {
            *parent = child;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_settings_level_ordering() {
        assert!(SettingsLevel::User < SettingsLevel::Project);
        assert_eq!(SettingsLevel::Project.to_string(), "project");
    }

    #[test]
    fn test_load_defaults_when_missing() {
        let temp = TempDir::new().unwrap();
        let loader = SettingsLoader::new().with_user_path(temp.path().join("user.json"));
        let (settings, sources) = loader.load_with_sources(temp.path()).unwrap();
        assert_eq!(settings, SpeckitSettings::default());
        assert_eq!(sources.len(), 2);
        assert!(sources.iter().all(|s| !s.loaded));
    }

    #[test]
    fn test_project_overrides_user() {
        let temp = TempDir::new().unwrap();
        let user = temp.path().join("user/settings.json");
        write(
            &user,
            r#"{ "prerequisites": { "interpreter": "powershell", "enabled": false } }"#,
        );
        write(
            &ImplementConfig::settings_path(temp.path()),
            r#"{ "prerequisites": { "interpreter": "pwsh-preview" } }"#,
        );

        let settings = SettingsLoader::new()
            .with_user_path(user)
            .load(temp.path())
            .unwrap();
        assert_eq!(settings.prerequisites.interpreter, "pwsh-preview");
        assert!(!settings.prerequisites.enabled);
    }

    #[test]
    fn test_arrays_are_replaced() {
        let temp = TempDir::new().unwrap();
        write(
            &ImplementConfig::settings_path(temp.path()),
            r#"{ "checklists": { "affirmativeAnswers": ["go"] } }"#,
        );
        let settings = SettingsLoader::new()
            .without_user_settings()
            .load(temp.path())
            .unwrap();
        assert_eq!(settings.checklists.affirmative_answers, vec!["go"]);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = ImplementConfig::settings_path(temp.path());
        write(&path, "{ not json");
        let err = SettingsLoader::new()
            .without_user_settings()
            .load(temp.path())
            .unwrap_err();
        match err {
            SpeckitError::Config { path: Some(p), .. } => assert_eq!(p, path),
            other => panic!("Wrong error variant: {other:?}"),
        }
    }

    #[test]
    fn test_deep_merge_nested() {
        let mut parent = json!({ "a": { "b": 1, "c": 2 }, "d": [1, 2] });
        deep_merge(&mut parent, json!({ "a": { "c": 3 }, "d": [9] }));
        assert_eq!(parent, json!({ "a": { "b": 1, "c": 3 }, "d": [9] }));
    }
}
