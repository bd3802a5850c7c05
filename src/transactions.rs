use std::{fs, marker::PhantomData, path::PathBuf};

use crate::convert::ChangeLabel;

/// A single rewritten file, with what is needed to put it back.
#[derive(Debug, Clone)]
pub struct Change {
    pub path: PathBuf,
    pub label: ChangeLabel,
    original: Option<Vec<u8>>,
}
impl Change {
    pub fn new(path: PathBuf, label: ChangeLabel, original: Vec<u8>) -> Self {
        Self {
            path,
            label,
            original: Some(original),
        }
    }

    /// A change that is only reported; rolling it back leaves the file as it is.
    pub fn label_only(path: PathBuf, label: ChangeLabel) -> Self {
        Self {
            path,
            label,
            original: None,
        }
    }

    pub fn can_restore(&self) -> bool {
        self.original.is_some()
    }
}
/// Active Transaction
pub struct Active;
/// Committed Transaction
pub struct Committed;
/// Canceled Transaction
pub struct Canceled;
/// A trait that tells us if rollback should occur when dropped.
pub trait TransactionState {
    const SHOULD_ROLLBACK: bool;
}
impl TransactionState for Active {
    const SHOULD_ROLLBACK: bool = true;
}
impl TransactionState for Committed {
    const SHOULD_ROLLBACK: bool = false;
}
impl TransactionState for Canceled {
    const SHOULD_ROLLBACK: bool = true;
}
/// Represents the final state of a transaction after it has been explicitly resolved.
///
/// - `Committed`: the changes stay; the transaction keeps their labels for auditing.
/// - `Canceled`: every change is reverted when the transaction is dropped.
pub enum FinalTransactionState {
    Committed(Transaction<Committed>),
    Canceled(Transaction<Canceled>),
}
impl FinalTransactionState {
    pub fn changes(&self) -> &[Change] {
        match self {
            Self::Committed(trx) => trx.changes(),
            Self::Canceled(trx) => trx.changes(),
        }
    }
}
/// One conversion run, recorded as a unit of work that can be undone.
///
/// The state parameter decides what happens on drop: `Active` and `Canceled` transactions
/// restore the original bytes of every recorded file that kept them, newest first;
/// `Committed` ones do nothing. Dropping an `Active` transaction therefore undoes the run, so callers resolve it
/// with [`Transaction::commit`] or [`Transaction::cancel`].
///
/// # Example
///
/// ```no_run
/// use kaigyo::transactions::{Active, Transaction};
///
/// let trx = Transaction::<Active>::new("Convert line separators to LF");
/// // ... record changes while converting ...
/// let committed = trx.commit(); // No rollback will happen
/// assert!(committed.changes().is_empty());
/// ```
pub struct Transaction<State: TransactionState> {
    title: String,
    changes: Vec<Change>,
    state: PhantomData<State>,
}
impl<S: TransactionState> Transaction<S> {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    fn into_state<T: TransactionState>(mut self) -> Transaction<T> {
        let title = std::mem::take(&mut self.title);
        let changes = std::mem::take(&mut self.changes);

        Transaction {
            title,
            changes,
            state: PhantomData,
        }
    }
}
impl Transaction<Active> {
    pub fn new(title: impl Into<String>) -> Self {
        Transaction {
            title: title.into(),
            changes: vec![],
            state: PhantomData,
        }
    }
    /// Records a file that was rewritten as part of this transaction.
    pub fn add_change(&mut self, change: Change) {
        self.changes.push(change);
    }
    /// Finalizes the transaction, keeping every change on disk.
    pub fn commit(self) -> Transaction<Committed> {
        self.into_state()
    }
    /// Cancels the transaction; the returned value restores every file when dropped.
    pub fn cancel(self) -> Transaction<Canceled> {
        self.into_state()
    }
}
impl<S: TransactionState> Drop for Transaction<S> {
    fn drop(&mut self) {
        if S::SHOULD_ROLLBACK && !self.changes.is_empty() {
            log::debug!("rolling back '{}'", self.title);
            while let Some(change) = self.changes.pop() {
                let Some(original) = change.original else {
                    log::debug!("nothing to restore for {}", change.path.display());
                    continue;
                };
                log::debug!("restoring {}", change.path.display());
                if let Err(error) = fs::write(&change.path, &original) {
                    log::warn!("unable to restore {}: {}", change.path.display(), error);
                }
            }
        } else if !S::SHOULD_ROLLBACK {
            log::debug!("committing '{}'", self.title);
        }
    }
}
