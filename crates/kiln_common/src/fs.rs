//! Filesystem helpers shared by the analysis store and the bridge cache.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Writes `bytes` to `path` so that readers observe either the old file or
/// the complete new one.
///
/// The data goes to a temporary file in the destination directory, is
/// flushed to disk, and is then renamed over `path`. Missing parent
/// directories are created.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut staged = stage_in_parent(path)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Creates an empty temporary file next to `path`, ready to be renamed over it.
pub fn stage_in_parent(path: &Path) -> io::Result<tempfile::NamedTempFile> {
    let dir = parent_dir(path);
    std::fs::create_dir_all(dir)?;
    tempfile::Builder::new()
        .prefix(".kiln-")
        .suffix(".tmp")
        .tempfile_in(dir)
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Lists every entry below `root` (excluding `root` itself) accepted by
/// `filter`, sorted by path.
///
/// Directories are visited in file-name order, so the result is stable for
/// identical trees.
pub fn list_directory(root: &Path, filter: impl Fn(&Path) -> bool) -> io::Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if filter(entry.path()) {
            entries.push(entry.into_path());
        }
    }
    entries.sort();
    Ok(entries)
}

/// Returns `path` relative to `root` with `/` separators, as used for
/// archive entry names. Returns `None` when `path` is not below `root`.
pub fn relative_entry_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("target").join("analysis").join("compile");
        write_atomic(&path, b"payload").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"payload");
    }

    #[test]
    fn write_atomic_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store");
        write_atomic(&path, b"old").unwrap();
        write_atomic(&path, b"new").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn write_atomic_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        write_atomic(&dir.path().join("store"), b"data").unwrap();
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn list_directory_is_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("b/c")).unwrap();
        std::fs::write(dir.path().join("b/c/Z.scala"), "").unwrap();
        std::fs::write(dir.path().join("a.java"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let files = list_directory(dir.path(), |p| {
            p.is_file() && p.extension().is_some_and(|e| e == "scala" || e == "java")
        })
        .unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("a.java"), dir.path().join("b/c/Z.scala")]
        );
    }

    #[test]
    fn list_directory_includes_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("pkg")).unwrap();
        std::fs::write(dir.path().join("pkg/A.class"), "").unwrap();
        let all = list_directory(dir.path(), |_| true).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].is_dir());
    }

    #[test]
    fn relative_entry_name_uses_forward_slashes() {
        let root = Path::new("/tmp/classes");
        let path = root.join("xsbt").join("Compat.class");
        assert_eq!(
            relative_entry_name(root, &path).as_deref(),
            Some("xsbt/Compat.class")
        );
    }

    #[test]
    fn relative_entry_name_outside_root() {
        assert!(relative_entry_name(Path::new("/a"), Path::new("/b/c")).is_none());
        assert!(relative_entry_name(Path::new("/a"), Path::new("/a")).is_none());
    }
}
