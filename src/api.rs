use std::{fs, path::PathBuf};

use gyou::{Census, Separator};
use indexmap::IndexMap;

use crate::{
    config::ConfigError,
    convert::Converter,
    errors::{FileOperation, IoError},
    filter,
    patterns::PatternError,
    project::{Project, ProjectError},
    prompt::{self, PromptError},
    report::Report,
    transactions::{Active, FinalTransactionState, Transaction},
    walk::process_recursively,
};

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum KaigyoError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Patterns(#[from] PatternError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Prompt(#[from] PromptError),

    #[error("No target line separator given")]
    #[diagnostic(
        code(kaigyo::missing_separator),
        help("Pass --to with one of crlf, lf, cr, or set `separator` in .kaigyo/config.toml")
    )]
    MissingSeparator,
}

#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Falls back to the project's configured separator when `None`.
    pub target: Option<Separator>,
    pub dry_run: bool,
    /// Ask before keeping the changes; a "no" rolls every file back.
    pub confirm: bool,
    pub verbose: bool,
}

pub struct ConvertResult {
    pub report: Report,
    pub state: FinalTransactionState,
}

/// The separator to convert to: the requested one, else the one configured for `project`.
///
/// # Errors
///
/// Returns [`KaigyoError::MissingSeparator`] when neither is set, or a config error when the
/// configured value is not a separator.
pub fn resolve_target(
    project: &Project,
    requested: Option<Separator>,
) -> Result<Separator, KaigyoError> {
    match requested {
        Some(separator) => Ok(separator),
        None => project
            .config
            .separator()?
            .ok_or(KaigyoError::MissingSeparator),
    }
}

/// Converts every eligible file in `selection` as one transaction and prints the outcome.
///
/// Without a project or with an empty selection there is nothing to do and `Ok(None)` is
/// returned. Original contents are only held in memory when `options.confirm` asks for a
/// chance to roll back.
///
/// # Errors
///
/// Returns a [`KaigyoError`] if:
///
/// - No target separator is requested or configured.
/// - The project's ignored name patterns do not compile.
/// - The confirmation prompt fails, in which case every change is rolled back.
///
/// Failures on individual files are not errors; they are part of the report.
pub fn convert_paths(
    project: Option<&Project>,
    selection: &[PathBuf],
    options: &ConvertOptions,
) -> Result<Option<ConvertResult>, KaigyoError> {
    let Some(project) = project else {
        log::debug!("no project context, nothing to convert");
        return Ok(None);
    };

    if selection.is_empty() {
        log::debug!("empty selection, nothing to convert");
        return Ok(None);
    }

    let target = resolve_target(project, options.target)?;

    let mut converter = Converter::new(target)
        .with_patterns(project.ignore_patterns()?)
        .with_classifier(project.classifier())
        .keep_originals(options.confirm)
        .dry_run(options.dry_run);

    let mut trx = Transaction::<Active>::new(converter.title());

    let metadata_store = project.metadata_store();

    let report = converter.convert_tree(
        selection,
        &project.ignore_set(),
        Some(metadata_store.as_path()),
        &mut trx,
    );

    report.print(options.verbose);

    let changed = trx.changes().len();

    let state = if options.confirm && changed > 0 && !prompt::keep_changes(changed)? {
        FinalTransactionState::Canceled(trx.cancel())
    } else {
        FinalTransactionState::Committed(trx.commit())
    };

    Ok(Some(ConvertResult { report, state }))
}

/// Counts the line endings of every text file in `selection`, walking directories the same
/// way a conversion would.
///
/// # Errors
///
/// Returns a [`KaigyoError`] if the project's ignored name patterns do not compile. Files
/// that cannot be read are reported individually.
pub fn detect_paths(
    project: &Project,
    selection: &[PathBuf],
) -> Result<IndexMap<PathBuf, Result<Census, IoError>>, KaigyoError> {
    let patterns = project.ignore_patterns()?;
    let classifier = project.classifier();
    let metadata_store = project.metadata_store();

    let mut results = IndexMap::new();

    for root in selection {
        process_recursively(
            root,
            |dir| filter::should_descend(dir, Some(metadata_store.as_path()), &patterns),
            |entry| {
                if entry.is_dir
                    || entry.is_symlink
                    || patterns.is_ignored(&entry.name)
                    || classifier.is_binary(&entry.path)
                {
                    return true;
                }

                let census = fs::read(&entry.path)
                    .map(|content| gyou::census(&content))
                    .map_err(|error| {
                        IoError::new(FileOperation::Read, entry.path.clone(), error)
                    });

                results.insert(entry.path.clone(), census);

                true
            },
        );
    }

    Ok(results)
}
