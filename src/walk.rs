use std::path::Path;

use walkdir::WalkDir;

use crate::entry::FileEntry;

/// Visits `root` and everything below it, depth-first and pre-order, siblings sorted by name.
///
/// `descend` is asked about every directory, `root` included; a directory it rejects is
/// neither visited nor entered. `process` sees every other entry; returning `false` from it
/// stops the walk, and so does this function's `false` return.
///
/// Entries that cannot be read are logged and skipped.
pub fn process_recursively<D, P>(root: &Path, mut descend: D, mut process: P) -> bool
where
    D: FnMut(&FileEntry) -> bool,
    P: FnMut(&FileEntry) -> bool,
{
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|dir_entry| {
            if !dir_entry.file_type().is_dir() {
                return true;
            }

            match FileEntry::from_dir_entry(dir_entry) {
                Ok(entry) => {
                    let descending = descend(&entry);
                    if !descending {
                        log::debug!("not descending into {}", entry.path.display());
                    }
                    descending
                }
                Err(error) => {
                    log::warn!("{}", error);
                    false
                }
            }
        });

    for dir_entry in walker {
        let dir_entry = match dir_entry {
            Ok(e) => e,
            Err(error) => {
                let path = error.path().unwrap_or_else(|| Path::new("")).to_path_buf();
                log::warn!("skipping {}: {}", path.display(), error);
                continue;
            }
        };

        let entry = match FileEntry::from_dir_entry(&dir_entry) {
            Ok(entry) => entry,
            Err(error) => {
                log::warn!("{}", error);
                continue;
            }
        };

        if !process(&entry) {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, path::PathBuf};

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("b").join("skip")).unwrap();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::write(root.join("a").join("1.txt"), "1").unwrap();
        fs::write(root.join("b").join("2.txt"), "2").unwrap();
        fs::write(root.join("b").join("skip").join("3.txt"), "3").unwrap();
        fs::write(root.join("c.txt"), "c").unwrap();
        dir
    }

    fn relative(root: &Path, seen: Vec<PathBuf>) -> Vec<PathBuf> {
        seen.iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect()
    }

    #[test]
    fn test_walk_is_depth_first_pre_order() {
        let dir = tree();
        let mut seen = Vec::new();

        let completed = process_recursively(
            dir.path(),
            |_| true,
            |entry| {
                seen.push(entry.path.clone());
                true
            },
        );

        assert!(completed);
        assert_eq!(
            relative(dir.path(), seen),
            vec![
                PathBuf::new(),
                PathBuf::from("a"),
                Path::new("a").join("1.txt"),
                PathBuf::from("b"),
                Path::new("b").join("2.txt"),
                Path::new("b").join("skip"),
                Path::new("b").join("skip").join("3.txt"),
                PathBuf::from("c.txt"),
            ]
        );
    }

    #[test]
    fn test_rejected_directories_are_not_entered() {
        let dir = tree();
        let mut seen = Vec::new();

        process_recursively(
            dir.path(),
            |entry| entry.name != "skip",
            |entry| {
                if !entry.is_dir {
                    seen.push(entry.name.clone());
                }
                true
            },
        );

        assert_eq!(seen, vec!["1.txt", "2.txt", "c.txt"]);
    }

    #[test]
    fn test_rejected_root_visits_nothing() {
        let dir = tree();
        let mut count = 0;

        process_recursively(dir.path(), |_| false, |_| {
            count += 1;
            true
        });

        assert_eq!(count, 0);
    }

    #[test]
    fn test_file_root_is_processed_once() {
        let dir = tree();
        let mut seen = Vec::new();

        process_recursively(&dir.path().join("c.txt"), |_| true, |entry| {
            seen.push(entry.name.clone());
            true
        });

        assert_eq!(seen, vec!["c.txt"]);
    }

    #[test]
    fn test_process_can_stop_the_walk() {
        let dir = tree();
        let mut count = 0;

        let completed = process_recursively(dir.path(), |_| true, |_| {
            count += 1;
            count < 2
        });

        assert!(!completed);
        assert_eq!(count, 2);
    }
}
