use std::path::Path;

use crate::{
    classify::BinaryClassifier, entry::FileEntry, patterns::IgnorePatterns, project::IgnoreSet,
    utils::identity,
};

/// Why an entry was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Directory,
    Symlink,
    ReadOnly,
    Protected,
    IgnoredName,
    Binary,
}
impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Directory => "directory",
            Self::Symlink => "symbolic link",
            Self::ReadOnly => "read-only",
            Self::Protected => "protected project file",
            Self::IgnoredName => "ignored name",
            Self::Binary => "binary content",
        };
        write!(f, "{}", text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    Ineligible(SkipReason),
}

/// Runs every eligibility check in order and reports the first one that fails.
///
/// Only the binary check may read file content, and only when the classifier sniffs.
pub fn check(
    entry: &FileEntry,
    ignored: &IgnoreSet,
    patterns: &IgnorePatterns,
    classifier: &BinaryClassifier,
) -> Eligibility {
    let reason = if entry.is_dir {
        SkipReason::Directory
    } else if entry.is_symlink {
        SkipReason::Symlink
    } else if !entry.is_writable {
        SkipReason::ReadOnly
    } else if ignored.contains(&entry.path) {
        SkipReason::Protected
    } else if patterns.is_ignored(&entry.name) {
        SkipReason::IgnoredName
    } else if classifier.is_binary(&entry.path) {
        SkipReason::Binary
    } else {
        return Eligibility::Eligible;
    };

    Eligibility::Ineligible(reason)
}

pub fn is_eligible(
    entry: &FileEntry,
    ignored: &IgnoreSet,
    patterns: &IgnorePatterns,
    classifier: &BinaryClassifier,
) -> bool {
    check(entry, ignored, patterns, classifier) == Eligibility::Eligible
}

/// A directory is descended into unless it is the project's metadata store or its name is
/// ignored (e.g. `.git`).
pub fn should_descend(
    entry: &FileEntry,
    metadata_store: Option<&Path>,
    patterns: &IgnorePatterns,
) -> bool {
    if patterns.is_ignored(&entry.name) {
        return false;
    }

    match metadata_store {
        Some(store) => identity(&entry.path) != identity(store),
        None => true,
    }
}
