use std::{fs, path::Path};

use gyou::{errors::SeparatorError, Separator};
use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

use crate::errors::{FileFormat, FileOperation, IoError, ParseError};

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("I/O error within config domain")]
    #[diagnostic(code(kaigyo::config::io))]
    Io(#[from] IoError),

    #[error("Unable to parse config file")]
    #[diagnostic(code(kaigyo::config::parse))]
    Parse(#[from] ParseError),

    #[error("Invalid `separator` in config file: {source}")]
    #[diagnostic(
        code(kaigyo::config::separator),
        help("Use one of: \"crlf\", \"lf\", \"cr\"")
    )]
    Separator {
        #[source]
        source: SeparatorError,
    },
}

/// Per-project settings, read from `.kaigyo/config.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Default target for `convert` when none is given on the command line.
    pub separator: Option<String>,
    /// Replaces the built-in ignored name patterns when set.
    pub ignored_names: Option<Vec<String>>,
    /// Added to the built-in binary extensions.
    pub binary_extensions: Vec<String>,
    /// Paths relative to the project base that are never rewritten.
    pub protected_files: Vec<String>,
    pub sniff_content: bool,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            separator: None,
            ignored_names: None,
            binary_extensions: Vec::new(),
            protected_files: Vec::new(),
            sniff_content: true,
        }
    }
}
impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

        let parsed: Config = toml::from_str(&content)
            .map_err(|error| ParseError::new(FileFormat::Toml, path.to_path_buf(), error))?;

        Ok(parsed)
    }

    pub fn separator(&self) -> Result<Option<Separator>, ConfigError> {
        self.separator
            .as_deref()
            .map(str::parse::<Separator>)
            .transpose()
            .map_err(|source| ConfigError::Separator { source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_reads_every_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
separator = "crlf"
ignored_names = ["*.log"]
binary_extensions = ["dat"]
protected_files = ["project.ipr"]
sniff_content = false
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.separator().unwrap(), Some(Separator::Crlf));
        assert_eq!(config.ignored_names, Some(vec!["*.log".to_string()]));
        assert_eq!(config.binary_extensions, vec!["dat".to_string()]);
        assert_eq!(config.protected_files, vec!["project.ipr".to_string()]);
        assert!(!config.sniff_content);
    }

    #[test]
    fn test_from_file_defaults_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "").unwrap();

        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.separator().unwrap(), None);
        assert!(config.ignored_names.is_none());
        assert!(config.sniff_content);
    }

    #[test]
    fn test_from_file_rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "line_ending = \"lf\"\n").unwrap();

        let result = Config::from_file(&path);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_invalid_separator_is_reported() {
        let config = Config {
            separator: Some("nel".to_string()),
            ..Config::default()
        };

        assert!(matches!(
            config.separator(),
            Err(ConfigError::Separator { .. })
        ));
    }
}
