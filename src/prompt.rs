use inquire::Confirm;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum PromptError {
    #[error("Unable to read confirmation")]
    #[diagnostic(
        code(kaigyo::prompt::confirm),
        help("Run without --confirm when there is no interactive terminal")
    )]
    Confirm {
        #[source]
        source: inquire::InquireError,
    },
}

/// Asks whether the `count` files just converted should stay that way.
pub fn keep_changes(count: usize) -> Result<bool, PromptError> {
    Confirm::new(&format!("Keep the {} converted file(s)?", count))
        .with_default(true)
        .with_help_message("Answering no restores every file to its previous content")
        .prompt()
        .map_err(|source| PromptError::Confirm { source })
}
