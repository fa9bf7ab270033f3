//! CLI configuration
//!
//! Read from `<config_dir>/im-isbn/config.toml` unless a path is given:
//!
//! ```toml
//! # RangeMessage.xml to use instead of the embedded table
//! range_message = "/usr/share/isbn/RangeMessage.xml"
//! # Refuse 9- and 12-digit inputs without check character
//! exact = false
//! # Print JSON instead of text
//! json = false
//! # "shared_range" (default) or "per_group"
//! group_layout = "shared_range"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::RangeDataError;
use crate::ranges::{GroupLayout, RangeData, RangeTree};

const CONFIG_FILE: &str = "config.toml";
const APP_DIR: &str = "im-isbn";

/// Errors that can occur when loading the configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("TOML parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub range_message: Option<PathBuf>,
    pub exact: bool,
    pub json: bool,
    pub group_layout: GroupLayout,
}

impl Config {
    /// Default location, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing default file yields the defaults; a missing explicit
    /// file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// The range tree this configuration asks for.
    ///
    /// Falls back to the process-wide embedded tree when neither the
    /// table nor the layout is overridden.
    pub fn range_tree(&self) -> Result<RangeTreeHandle, RangeDataError> {
        let data = match &self.range_message {
            Some(path) => RangeData::from_path(path)?,
            None if self.group_layout == GroupLayout::default() => {
                return Ok(RangeTreeHandle::Shared(RangeTree::shared()?));
            }
            None => RangeData::embedded()?,
        };
        Ok(RangeTreeHandle::Owned(RangeTree::from_data_with(&data, self.group_layout)?))
    }
}

/// Either the shared embedded tree or one loaded from a file
#[derive(Debug)]
pub enum RangeTreeHandle {
    Shared(&'static RangeTree),
    Owned(RangeTree),
}

impl std::ops::Deref for RangeTreeHandle {
    type Target = RangeTree;

    fn deref(&self) -> &RangeTree {
        match self {
            RangeTreeHandle::Shared(tree) => tree,
            RangeTreeHandle::Owned(tree) => tree,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_parse() {
        let config = Config::from_toml("range_message = \"/tmp/r.xml\"\nexact = true\n").unwrap();
        assert_eq!(config.range_message, Some(PathBuf::from("/tmp/r.xml")));
        assert!(config.exact);
        assert!(!config.json);
    }

    #[test]
    fn test_group_layout() {
        let config = Config::from_toml("group_layout = \"per_group\"").unwrap();
        assert_eq!(config.group_layout, GroupLayout::PerGroup);
        assert!(Config::from_toml("group_layout = \"nested\"").is_err());

        let tree = config.range_tree().unwrap();
        assert!(matches!(tree, RangeTreeHandle::Owned(_)));
        assert!(matches!(Config::default().range_tree().unwrap(), RangeTreeHandle::Shared(_)));
    }

    #[test]
    fn test_unknown_key() {
        assert!(matches!(
            Config::from_toml("hyphenate = true"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(Config::load(Some(&path)), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_range_tree_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("RangeMessage.xml");
        std::fs::write(
            &path,
            "<ISBNRangeMessage><EAN.UCCPrefixes><EAN.UCC><Prefix>978</Prefix><Rules>\
             <Rule><Range>0000000-5999999</Range><Length>1</Length></Rule>\
             </Rules></EAN.UCC></EAN.UCCPrefixes></ISBNRangeMessage>",
        )
        .unwrap();

        let config = Config {
            range_message: Some(path),
            ..Config::default()
        };
        let tree = config.range_tree().unwrap();
        assert!(matches!(tree, RangeTreeHandle::Owned(_)));
        assert_eq!(tree.roots()[0].children.len(), 1);
    }
}
