use glob::Pattern;
use miette::Diagnostic;
use thiserror::Error;

/// Names skipped by default: VCS bookkeeping, OS litter and compiled artifacts.
pub const DEFAULT_IGNORED_NAMES: &[&str] = &[
    "CVS",
    "SCCS",
    "RCS",
    "rcs",
    ".DS_Store",
    ".svn",
    ".pyc",
    "*.pyc",
    "*.pyo",
    "*.rbc",
    "*~",
    ".git",
    ".hg",
    "__pycache__",
    "_svn",
    "vssver.scc",
    "vssver2.scc",
    "*.hprof",
];

#[derive(Debug, Error, Diagnostic)]
#[error("Unable to compile ignored name pattern '{pattern}'")]
#[diagnostic(
    code(kaigyo::patterns::compile),
    help("Patterns are file-name globs: `*` matches any run of characters, `?` one character and `[...]` a set")
)]
pub struct PatternError {
    pub pattern: String,
    #[source]
    pub source: glob::PatternError,
}

/// File names that are never converted and, for directories, never descended into.
#[derive(Debug, Clone)]
pub struct IgnorePatterns {
    patterns: Vec<Pattern>,
}
impl IgnorePatterns {
    /// Compiles `patterns` into whole-name matchers. An empty list matches nothing.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, PatternError> {
        let patterns = patterns
            .iter()
            .map(|p| p.as_ref().trim())
            .filter(|p| !p.is_empty())
            .map(|p| {
                Pattern::new(p).map_err(|source| PatternError {
                    pattern: p.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(name))
    }
}
impl Default for IgnorePatterns {
    fn default() -> Self {
        lazy_static::lazy_static! {
            static ref DEFAULT_PATTERNS: IgnorePatterns =
                IgnorePatterns::new(DEFAULT_IGNORED_NAMES).expect("valid default ignore patterns");
        }

        DEFAULT_PATTERNS.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_vcs_directories() {
        let patterns = IgnorePatterns::default();

        assert!(patterns.is_ignored(".git"));
        assert!(patterns.is_ignored(".svn"));
        assert!(patterns.is_ignored("__pycache__"));
        assert!(!patterns.is_ignored("src"));
        assert!(!patterns.is_ignored(".gitignore"));
    }

    #[test]
    fn test_wildcards_match_whole_name() {
        let patterns = IgnorePatterns::new(&["*.pyc", "backup?", "*~"]).unwrap();

        assert!(patterns.is_ignored("module.pyc"));
        assert!(!patterns.is_ignored("module.pyc.txt"));
        assert!(patterns.is_ignored("backup1"));
        assert!(!patterns.is_ignored("backup12"));
        assert!(patterns.is_ignored("notes.txt~"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let patterns = IgnorePatterns::new(&["a+b.(c)"]).unwrap();

        assert!(patterns.is_ignored("a+b.(c)"));
        assert!(!patterns.is_ignored("aab.(c)"));
    }

    #[test]
    fn test_wildcard_matches_names_with_newlines() {
        let patterns = IgnorePatterns::new(&["*.pyc"]).unwrap();

        assert!(patterns.is_ignored("odd\nname.pyc"));
    }

    #[test]
    fn test_character_sets() {
        let patterns = IgnorePatterns::new(&["vssver[0-9].scc"]).unwrap();

        assert!(patterns.is_ignored("vssver2.scc"));
        assert!(!patterns.is_ignored("vssverx.scc"));
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let error = IgnorePatterns::new(&["*.log", "build["]).unwrap_err();

        assert_eq!(error.pattern, "build[");
    }

    #[test]
    fn test_empty_list_matches_nothing() {
        let patterns = IgnorePatterns::new::<&str>(&[]).unwrap();

        assert!(!patterns.is_ignored(".git"));
    }
}
