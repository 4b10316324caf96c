use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::ToolError;

/// File name without its final extension, lossily converted to UTF-8.
pub fn file_stem_string(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Extension including the leading dot, or an empty string when there is none.
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Directory containing `path`; a bare file name lives in the current directory.
pub fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

/// Create a single directory level. An existing directory is fine; missing
/// parents are an error.
pub fn ensure_dir(dir: &Path) -> Result<(), ToolError> {
    match fs::create_dir(dir) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(err) => Err(ToolError::filesystem(dir, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_and_extension() {
        let path = Path::new("/media/show.part1.mkv");
        assert_eq!(file_stem_string(path), "show.part1");
        assert_eq!(dotted_extension(path), ".mkv");
        assert_eq!(dotted_extension(Path::new("/media/noext")), "");
    }

    #[test]
    fn parent_of_bare_name_is_empty() {
        assert_eq!(parent_dir(Path::new("show.mkv")), PathBuf::new());
        assert_eq!(parent_dir(Path::new("/media/show.mkv")), PathBuf::from("/media"));
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("show");
        ensure_dir(&dir).unwrap();
        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn ensure_dir_does_not_create_parents() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("missing").join("show");
        assert!(matches!(
            ensure_dir(&dir),
            Err(ToolError::Filesystem { .. })
        ));
    }

    #[test]
    fn ensure_dir_rejects_existing_file() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("show");
        std::fs::write(&file, b"").unwrap();
        assert!(ensure_dir(&file).is_err());
    }
}
