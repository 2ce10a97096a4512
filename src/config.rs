use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::engine::DEFAULT_NEGATIVE_MARKER;
use crate::error::{TagPickError, TagPickResult};
use crate::loader::LoaderOptions;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Manifest path, relative to `source`
    pub manifest: String,
    /// Directory or http(s) base URL holding the manifest and tag files
    pub source: String,
    pub fetch_timeout_secs: u64,
    pub skip_broken_files: bool,
    pub negative_marker: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest: "easyPromptSelector.txt".to_string(),
            source: "tags".to_string(),
            fetch_timeout_secs: 10,
            skip_broken_files: false,
            negative_marker: DEFAULT_NEGATIVE_MARKER.to_string(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> TagPickResult<Self> {
        let content = fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| TagPickError::Config(e.to_string()))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> TagPickResult<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        let content =
            serde_yaml::to_string(self).map_err(|e| TagPickError::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Per-user state directory, `~/.tagpick`.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tagpick")
    }

    pub fn get_config_path() -> PathBuf {
        Self::home_dir().join("config.yaml")
    }

    /// Read `path`, falling back to defaults when it is missing or broken.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::get_config_path);

        if config_path.exists() {
            match Self::load_from_file(&config_path) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(
                    path = %config_path.display(),
                    error = %e,
                    "ignoring unreadable config"
                ),
            }
        }

        Self::default()
    }

    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs.max(1)),
            skip_broken_files: self.skip_broken_files,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trips_through_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let config = Config {
            manifest: "list.txt".into(),
            source: "http://localhost:7860/file=tags".into(),
            fetch_timeout_secs: 3,
            skip_broken_files: true,
            negative_marker: "n:".into(),
        };

        config.save_to_file(&path).unwrap();
        assert_eq!(Config::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: Config = serde_yaml::from_str("source: /srv/tags\n").unwrap();
        assert_eq!(config.source, "/srv/tags");
        assert_eq!(config.negative_marker, "neg-");
        assert_eq!(config.fetch_timeout_secs, 10);
    }

    #[test]
    fn broken_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "fetch_timeout_secs: [not a number]").unwrap();
        assert_eq!(Config::load_or_default(Some(path.as_path())), Config::default());
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let config = Config {
            fetch_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.loader_options().fetch_timeout, Duration::from_secs(1));
    }
}
