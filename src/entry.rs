use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::errors::{FileOperation, IoError};

/// A file-system node as seen by the converter.
///
/// Built from symlink metadata, so a link reports `is_symlink` rather than the kind of its
/// target.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    /// Final path component, or the whole path when there is none (e.g. `/`).
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
    pub is_writable: bool,
}
impl FileEntry {
    pub fn from_path(path: &Path) -> Result<Self, IoError> {
        let metadata = fs::symlink_metadata(path)
            .map_err(|error| IoError::new(FileOperation::Metadata, path.to_path_buf(), error))?;

        Ok(Self::from_metadata(path, &metadata))
    }

    pub fn from_dir_entry(entry: &walkdir::DirEntry) -> Result<Self, IoError> {
        let metadata = entry.metadata().map_err(|error| {
            IoError::new(FileOperation::Metadata, entry.path().to_path_buf(), error.into())
        })?;

        Ok(Self::from_metadata(entry.path(), &metadata))
    }

    fn from_metadata(path: &Path, metadata: &fs::Metadata) -> Self {
        let name = path
            .file_name()
            .map(|os| os.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            path: path.to_path_buf(),
            name,
            is_dir: metadata.is_dir(),
            is_symlink: metadata.file_type().is_symlink(),
            is_writable: !metadata.permissions().readonly(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_reads_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("readme.md");
        fs::write(&file, "hello\n").unwrap();

        let entry = FileEntry::from_path(&file).unwrap();
        let parent = FileEntry::from_path(dir.path()).unwrap();

        assert_eq!(entry.name, "readme.md");
        assert!(!entry.is_dir);
        assert!(entry.is_writable);
        assert!(parent.is_dir);
    }

    #[test]
    fn test_readonly_file_is_not_writable() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("locked.txt");
        fs::write(&file, "hello\n").unwrap();
        let mut permissions = fs::metadata(&file).unwrap().permissions();
        permissions.set_readonly(true);
        fs::set_permissions(&file, permissions).unwrap();

        let entry = FileEntry::from_path(&file).unwrap();

        assert!(!entry.is_writable);
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let result = FileEntry::from_path(Path::new("/definitely/not/here"));

        assert!(matches!(
            result,
            Err(IoError {
                operation: FileOperation::Metadata,
                ..
            })
        ));
    }
}
