use std::path::{Path, PathBuf};

use colored::Colorize;
use gyou::Separator;
use indexmap::IndexMap;

use crate::convert::Outcome;

/// Outcome of every file a walk looked at, in walk order.
#[derive(Debug)]
pub struct Report {
    target: Separator,
    dry_run: bool,
    outcomes: IndexMap<PathBuf, Outcome>,
}
impl Report {
    pub fn new(target: Separator, dry_run: bool) -> Self {
        Self {
            target,
            dry_run,
            outcomes: IndexMap::new(),
        }
    }

    pub fn record(&mut self, path: PathBuf, outcome: Outcome) {
        self.outcomes.insert(path, outcome);
    }

    pub fn get(&self, path: &Path) -> Option<&Outcome> {
        self.outcomes.get(path)
    }

    pub fn outcomes(&self) -> impl Iterator<Item = (&PathBuf, &Outcome)> {
        self.outcomes.iter()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn target(&self) -> Separator {
        self.target
    }

    /// Files whose content was (or, in a dry run, would be) rewritten.
    pub fn converted(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Converted { rewritten: true, .. }))
    }

    /// Eligible files that needed no rewrite.
    pub fn unchanged(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                Outcome::AlreadyMatching(_) | Outcome::Converted { rewritten: false, .. }
            )
        })
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    fn count(&self, predicate: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.values().filter(|o| predicate(*o)).count()
    }

    /// One status line per file; unchanged and skipped files only when `verbose`.
    pub fn lines(&self, verbose: bool) -> Vec<String> {
        let mut lines = Vec::new();

        for (path, outcome) in &self.outcomes {
            let line = match outcome {
                Outcome::Converted {
                    label,
                    rewritten: true,
                } => {
                    let verb = if self.dry_run { "would convert" } else { "convert" };
                    format!("{} {} ({})", verb.green(), path.display(), label)
                }
                Outcome::Converted {
                    label,
                    rewritten: false,
                } if verbose => {
                    format!("{} {} ({})", "keep".blue(), path.display(), label)
                }
                Outcome::AlreadyMatching(separator) if verbose => {
                    format!(
                        "{} {} (already {})",
                        "keep".blue(),
                        path.display(),
                        separator
                    )
                }
                Outcome::Skipped(reason) if verbose => {
                    format!("{} {} ({})", "skip".yellow(), path.display(), reason)
                }
                Outcome::Failed(error) => {
                    let cause = error.source.to_string();
                    format!("{} {}: {}", "fail".red(), error, cause)
                }
                _ => continue,
            };

            lines.push(line);
        }

        lines
    }

    pub fn summary(&self) -> String {
        let verb = if self.dry_run {
            "would be converted"
        } else {
            "converted"
        };

        format!(
            "{} {} to {}, {} unchanged, {} skipped, {} failed",
            self.converted(),
            verb,
            self.target,
            self.unchanged(),
            self.skipped(),
            self.failed()
        )
    }

    pub fn print(&self, verbose: bool) {
        for line in self.lines(verbose) {
            println!("{}", line);
        }

        println!("{}", self.summary().bold());
    }
}
