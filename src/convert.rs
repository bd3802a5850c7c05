use std::{
    collections::HashSet,
    fmt,
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use gyou::Separator;

use crate::{
    classify::BinaryClassifier,
    entry::FileEntry,
    errors::{FileOperation, IoError},
    filter::{self, Eligibility, SkipReason},
    patterns::IgnorePatterns,
    project::IgnoreSet,
    report::Report,
    transactions::{Active, Change, Transaction},
    utils::identity,
    walk::process_recursively,
};

/// Writes the new content of a file.
pub type PersistFn = Box<dyn FnMut(&Path, &[u8]) -> io::Result<()>>;
/// Saves any in-memory edits of a file before it is read for conversion.
pub type FlushFn = Box<dyn FnMut(&Path) -> io::Result<()>>;

/// Describes one conversion, for the undo journal and for humans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeLabel {
    /// `None` when the file had no line endings.
    pub from: Option<Separator>,
    pub to: Separator,
}
impl fmt::Display for ChangeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.from {
            Some(from) => write!(f, "Changed line separators from {} to {}", from, self.to),
            None => write!(f, "Changed line separators to {}", self.to),
        }
    }
}

/// What happened to one file during a walk.
#[derive(Debug)]
pub enum Outcome {
    /// `rewritten` is `false` when the new content is identical to the old one, which only
    /// happens for files without line endings.
    Converted { label: ChangeLabel, rewritten: bool },
    AlreadyMatching(Separator),
    Skipped(SkipReason),
    Failed(IoError),
}

struct Storage {
    persist: PersistFn,
    flush: FlushFn,
}

/// Rewrites line separators of files and trees to one target.
pub struct Converter {
    target: Separator,
    dry_run: bool,
    keep_originals: bool,
    patterns: IgnorePatterns,
    classifier: BinaryClassifier,
    storage: Storage,
}
impl Converter {
    pub fn new(target: Separator) -> Self {
        Self {
            target,
            dry_run: false,
            keep_originals: true,
            patterns: IgnorePatterns::default(),
            classifier: BinaryClassifier::default(),
            storage: Storage {
                persist: Box::new(write_in_place),
                flush: Box::new(|_| Ok(())),
            },
        }
    }

    pub fn with_patterns(mut self, patterns: IgnorePatterns) -> Self {
        self.patterns = patterns;
        self
    }

    pub fn with_classifier(mut self, classifier: BinaryClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_persist(mut self, persist: impl FnMut(&Path, &[u8]) -> io::Result<()> + 'static) -> Self {
        self.storage.persist = Box::new(persist);
        self
    }

    pub fn with_flush(mut self, flush: impl FnMut(&Path) -> io::Result<()> + 'static) -> Self {
        self.storage.flush = Box::new(flush);
        self
    }

    /// In a dry run nothing is flushed or written and no change is recorded.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Whether recorded changes carry the original bytes. Without them the transaction only
    /// keeps labels and cannot restore anything.
    pub fn keep_originals(mut self, keep_originals: bool) -> Self {
        self.keep_originals = keep_originals;
        self
    }

    pub fn target(&self) -> Separator {
        self.target
    }

    /// Title of the transaction a run of this converter belongs to.
    pub fn title(&self) -> String {
        format!("Convert line separators to {}", self.target)
    }

    /// Walks every root depth-first and converts each eligible file once.
    ///
    /// Directories matching the ignored names, and `metadata_store`, are not entered. Files
    /// in `ignored` are never written, even when given as roots. Per-file failures are
    /// logged and recorded in the report; the walk always runs to completion.
    pub fn convert_tree(
        &mut self,
        roots: &[PathBuf],
        ignored: &IgnoreSet,
        metadata_store: Option<&Path>,
        trx: &mut Transaction<Active>,
    ) -> Report {
        let mut report = Report::new(self.target, self.dry_run);
        let mut seen: HashSet<PathBuf> = HashSet::new();

        for root in roots {
            if let Err(error) = FileEntry::from_path(root) {
                log::warn!("{}", error);
                report.record(root.clone(), Outcome::Failed(error));
                continue;
            }

            log::debug!("walking {}", root.display());

            process_recursively(
                root,
                |dir| filter::should_descend(dir, metadata_store, &self.patterns),
                |entry| {
                    if entry.is_dir {
                        return true;
                    }

                    if !seen.insert(identity(&entry.path)) {
                        log::debug!("already visited {}", entry.path.display());
                        return true;
                    }

                    let outcome =
                        match filter::check(entry, ignored, &self.patterns, &self.classifier) {
                            Eligibility::Eligible => rewrite(
                                &mut self.storage,
                                self.target,
                                self.dry_run,
                                self.keep_originals,
                                &entry.path,
                                trx,
                            ),
                            Eligibility::Ineligible(reason) => {
                                log::debug!("skipping {}: {}", entry.path.display(), reason);
                                Outcome::Skipped(reason)
                            }
                        };

                    report.record(entry.path.clone(), outcome);

                    true
                },
            );
        }

        report
    }

    /// Converts a single file without any eligibility checks.
    pub fn convert_file(&mut self, path: &Path, trx: &mut Transaction<Active>) -> Outcome {
        rewrite(
            &mut self.storage,
            self.target,
            self.dry_run,
            self.keep_originals,
            path,
            trx,
        )
    }
}

fn rewrite(
    storage: &mut Storage,
    target: Separator,
    dry_run: bool,
    keep_originals: bool,
    path: &Path,
    trx: &mut Transaction<Active>,
) -> Outcome {
    if !dry_run {
        if let Err(error) = (storage.flush)(path) {
            log::warn!("unable to flush {} before converting: {}", path.display(), error);
        }
    }

    let original = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(error) => {
            let error = IoError::new(FileOperation::Read, path.to_path_buf(), error);
            log::warn!("{}", error);
            return Outcome::Failed(error);
        }
    };

    let current = gyou::detect(&original);

    if current == Some(target) {
        log::debug!("{} already uses {}", path.display(), target);
        return Outcome::AlreadyMatching(target);
    }

    let label = ChangeLabel {
        from: current,
        to: target,
    };

    let converted = gyou::convert(&original, target);

    if converted == original {
        return Outcome::Converted {
            label,
            rewritten: false,
        };
    }

    if dry_run {
        return Outcome::Converted {
            label,
            rewritten: true,
        };
    }

    if let Err(error) = (storage.persist)(path, &converted) {
        let error = IoError::new(FileOperation::Write, path.to_path_buf(), error);
        log::warn!("{}", error);
        return Outcome::Failed(error);
    }

    log::info!("{}: {}", path.display(), label);

    let change = if keep_originals {
        Change::new(path.to_path_buf(), label, original)
    } else {
        Change::label_only(path.to_path_buf(), label)
    };
    trx.add_change(change);

    Outcome::Converted {
        label,
        rewritten: true,
    }
}

/// Rewrites `path` in place: the file is truncated and refilled, so its inode, links,
/// ownership and permissions stay as they were.
pub fn write_in_place(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).truncate(true).open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

/// Whether converting `selection` to `target` could change anything.
///
/// A single file that already uses `target` cannot; an empty selection never can; any other
/// selection may, so it is reported as available without looking further.
pub fn is_conversion_available(selection: &[PathBuf], target: Separator) -> bool {
    match selection {
        [] => false,
        [single] if single.is_file() => match fs::read(single) {
            Ok(content) => gyou::detect(&content) != Some(target),
            Err(_) => true,
        },
        _ => true,
    }
}
