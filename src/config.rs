//! Enumeration settings, read from TOML and then overridden from the command line.
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::artifact::Alphabet;
use crate::coloring::ColoringMode;

/// Errors from loading or validating an [`EnumerationConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnumerationConfig {
    /// Smallest tree size to enumerate.
    pub min_vertices: usize,
    /// Largest tree size to enumerate.
    pub max_vertices: usize,
    /// Number of available colors `k`.
    pub colors: usize,
    pub mode: ColoringMode,
    /// Directory artifacts are written to.
    pub output_dir: PathBuf,
    pub file_prefix: String,
    /// Worker threads; rayon's default when unset.
    pub threads: Option<usize>,
    /// Classify each shape's colorings in parallel as well as the shapes themselves.
    pub parallel_colorings: bool,
}

impl Default for EnumerationConfig {
    fn default() -> Self {
        EnumerationConfig {
            min_vertices: 2,
            max_vertices: 6,
            colors: 3,
            mode: ColoringMode::default(),
            output_dir: PathBuf::from("."),
            file_prefix: "colorings".to_string(),
            threads: None,
            parallel_colorings: false,
        }
    }
}

impl EnumerationConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&contents).map_err(|message| ConfigError::ParseError {
            path: path.to_path_buf(),
            message,
        })
    }

    fn from_toml_str(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| e.to_string())
    }

    /// Reject settings the driver cannot honour with `alphabet`.
    pub fn validate(&self, alphabet: &Alphabet) -> Result<(), ConfigError> {
        if self.max_vertices == 0 {
            return Err(ConfigError::InvalidValue(
                "max_vertices must be at least 1".into(),
            ));
        }
        if self.min_vertices > self.max_vertices {
            return Err(ConfigError::InvalidValue(format!(
                "min_vertices ({}) exceeds max_vertices ({})",
                self.min_vertices, self.max_vertices
            )));
        }
        if self.colors > alphabet.len() {
            return Err(ConfigError::InvalidValue(format!(
                "{} colors do not fit the {}-symbol alphabet",
                self.colors,
                alphabet.len()
            )));
        }
        // Prüfer entries run up to n - 1
        if self.max_vertices > alphabet.len() {
            return Err(ConfigError::InvalidValue(format!(
                "trees with {} vertices do not fit the {}-symbol alphabet",
                self.max_vertices,
                alphabet.len()
            )));
        }
        if self.threads == Some(0) {
            return Err(ConfigError::InvalidValue("threads must be positive".into()));
        }
        if self.file_prefix.contains(std::path::is_separator) {
            return Err(ConfigError::InvalidValue(format!(
                "file_prefix '{}' contains a path separator",
                self.file_prefix
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = EnumerationConfig::default();
        assert_eq!(config.min_vertices, 2);
        assert_eq!(config.max_vertices, 6);
        assert_eq!(config.colors, 3);
        assert_eq!(config.mode, ColoringMode::Total);
        assert!(config.validate(&Alphabet::default()).is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EnumerationConfig::from_toml_str(
            r#"
            max_vertices = 4
            mode = "proper"
            output_dir = "out"
            "#,
        )
        .unwrap();
        assert_eq!(config.max_vertices, 4);
        assert_eq!(config.mode, ColoringMode::Proper);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.colors, 3);
        assert_eq!(config.file_prefix, "colorings");
    }

    #[test]
    fn test_from_toml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("treecolor.toml");
        fs::write(&path, "colors = 2\nthreads = 4\n").unwrap();

        let config = EnumerationConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.colors, 2);
        assert_eq!(config.threads, Some(4));
    }

    #[test]
    fn test_file_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            EnumerationConfig::from_toml_file(&missing),
            Err(ConfigError::ReadError { .. })
        ));

        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "colours = 2\n").unwrap();
        assert!(matches!(
            EnumerationConfig::from_toml_file(&bad),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_validate_rejects() {
        let alphabet = Alphabet::default();
        let cases = [
            EnumerationConfig {
                max_vertices: 0,
                min_vertices: 0,
                ..Default::default()
            },
            EnumerationConfig {
                min_vertices: 5,
                max_vertices: 4,
                ..Default::default()
            },
            EnumerationConfig {
                colors: 31,
                ..Default::default()
            },
            EnumerationConfig {
                max_vertices: 31,
                ..Default::default()
            },
            EnumerationConfig {
                threads: Some(0),
                ..Default::default()
            },
            EnumerationConfig {
                file_prefix: "a/b".into(),
                ..Default::default()
            },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(&alphabet), Err(ConfigError::InvalidValue(_))),
                "{config:?}"
            );
        }
    }
}
