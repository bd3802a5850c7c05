use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use miette::Diagnostic;
use thiserror::Error;

use crate::{
    classify::BinaryClassifier,
    config::{Config, ConfigError},
    patterns::{IgnorePatterns, PatternError},
    utils::{identity, normalize_path},
};

/// Name of the per-project metadata-store directory.
pub const METADATA_DIR: &str = ".kaigyo";
/// Name of the config file inside the metadata store.
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug, Diagnostic)]
pub enum ProjectError {
    #[error("Project base '{path}' is not a directory")]
    #[diagnostic(
        code(kaigyo::project::not_a_directory),
        help("Pass an existing directory with --project")
    )]
    NotADirectory { path: PathBuf },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

/// Entries that must never be rewritten, keyed by identity.
#[derive(Debug, Default, Clone)]
pub struct IgnoreSet(HashSet<PathBuf>);
impl IgnoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &Path) -> bool {
        self.0.insert(identity(path))
    }

    pub fn contains(&self, path: &Path) -> bool {
        !self.0.is_empty() && self.0.contains(&identity(path))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
impl<P: AsRef<Path>> FromIterator<P> for IgnoreSet {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut set = Self::new();
        for path in iter {
            set.insert(path.as_ref());
        }
        set
    }
}

/// The context a conversion runs in: a base directory, its metadata store and the settings
/// read from it.
#[derive(Debug, Clone)]
pub struct Project {
    pub base_dir: PathBuf,
    pub config: Config,
}
impl Project {
    /// Opens `base_dir` as a project, reading `.kaigyo/config.toml` when it exists.
    pub fn open(base_dir: &Path) -> Result<Self, ProjectError> {
        if !base_dir.is_dir() {
            return Err(ProjectError::NotADirectory {
                path: base_dir.to_path_buf(),
            });
        }

        let config_file = base_dir.join(METADATA_DIR).join(CONFIG_FILE);

        let config = if config_file.is_file() {
            log::debug!("reading project config from {}", config_file.display());
            Config::from_file(&config_file)?
        } else {
            Config::default()
        };

        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            config,
        })
    }

    /// Opens the closest ancestor of `start` (itself included) that holds a metadata store,
    /// falling back to `start` itself.
    pub fn discover(start: &Path) -> Result<Self, ProjectError> {
        let start = identity(start);

        let base = start
            .ancestors()
            .find(|dir| dir.join(METADATA_DIR).is_dir())
            .unwrap_or(start.as_path())
            .to_path_buf();

        Self::open(&base)
    }

    pub fn metadata_store(&self) -> PathBuf {
        self.base_dir.join(METADATA_DIR)
    }

    pub fn config_file(&self) -> PathBuf {
        self.metadata_store().join(CONFIG_FILE)
    }

    /// The config file plus every configured protected file.
    pub fn ignore_set(&self) -> IgnoreSet {
        let mut set = IgnoreSet::new();

        set.insert(&self.config_file());

        for relative in &self.config.protected_files {
            let path = self.base_dir.join(normalize_path(Path::new(relative)));
            set.insert(&path);
        }

        set
    }

    pub fn ignore_patterns(&self) -> Result<IgnorePatterns, PatternError> {
        match &self.config.ignored_names {
            Some(names) => IgnorePatterns::new(names),
            None => Ok(IgnorePatterns::default()),
        }
    }

    pub fn classifier(&self) -> BinaryClassifier {
        BinaryClassifier::new(&self.config.binary_extensions, self.config.sniff_content)
    }
}
