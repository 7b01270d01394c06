use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use handler_core::CodeLoadError;
use sha2::{Digest, Sha256};

/// A regular file inside an asset, keyed by its `/`-separated path relative
/// to the asset root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AssetEntry {
    pub relative_path: String,
    pub path: PathBuf,
}

/// Lists every file under `root` in relative-path order.
///
/// Directory symlinks are skipped; file symlinks are read through.
pub fn collect_entries(root: &Path) -> Result<Vec<AssetEntry>, CodeLoadError> {
    let mut entries = Vec::new();
    walk(root, root, &mut entries)?;
    entries.sort();
    Ok(entries)
}

fn walk(root: &Path, dir: &Path, entries: &mut Vec<AssetEntry>) -> Result<(), CodeLoadError> {
    let read_dir = fs::read_dir(dir).map_err(|source| io_error(dir, source))?;
    for item in read_dir {
        let item = item.map_err(|source| io_error(dir, source))?;
        let path = item.path();
        let file_type = item.file_type().map_err(|source| io_error(&path, source))?;

        let is_file = if file_type.is_dir() {
            walk(root, &path, entries)?;
            false
        } else if file_type.is_symlink() {
            fs::metadata(&path)
                .map(|metadata| metadata.is_file())
                .unwrap_or(false)
        } else {
            file_type.is_file()
        };

        if is_file {
            entries.push(AssetEntry {
                relative_path: relative_key(root, &path),
                path,
            });
        }
    }
    Ok(())
}

fn relative_key(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// SHA-256 over each entry's relative path, content length and content.
pub fn fingerprint_entries(entries: &[AssetEntry]) -> Result<String, CodeLoadError> {
    let mut hasher = Sha256::new();
    for entry in entries {
        hasher.update(entry.relative_path.as_bytes());
        hasher.update([0u8]);
        let length = fs::metadata(&entry.path)
            .map_err(|source| io_error(&entry.path, source))?
            .len();
        hasher.update(length.to_le_bytes());
        hash_file(&mut hasher, &entry.path)?;
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// SHA-256 of a single file's content.
pub fn fingerprint_file(path: &Path) -> Result<String, CodeLoadError> {
    let mut hasher = Sha256::new();
    hash_file(&mut hasher, path)?;
    Ok(format!("{:x}", hasher.finalize()))
}

fn hash_file(hasher: &mut Sha256, path: &Path) -> Result<(), CodeLoadError> {
    let mut file = File::open(path).map_err(|source| io_error(path, source))?;
    io::copy(&mut file, hasher).map_err(|source| io_error(path, source))?;
    Ok(())
}

fn io_error(path: &Path, source: io::Error) -> CodeLoadError {
    CodeLoadError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_sorted_by_relative_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("lib/nested")).expect("mkdir");
        fs::write(dir.path().join("zeta.js"), "z").expect("write");
        fs::write(dir.path().join("lib/nested/util.js"), "u").expect("write");
        fs::write(dir.path().join("index.js"), "i").expect("write");

        let entries = collect_entries(dir.path()).expect("entries");
        let keys: Vec<&str> = entries
            .iter()
            .map(|entry| entry.relative_path.as_str())
            .collect();
        assert_eq!(keys, vec!["index.js", "lib/nested/util.js", "zeta.js"]);
    }

    #[test]
    fn file_fingerprint_matches_known_digest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("empty.js");
        fs::write(&path, "").expect("write");

        assert_eq!(
            fingerprint_file(&path).expect("fingerprint"),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn moving_content_between_files_changes_fingerprint() {
        let first = tempfile::tempdir().expect("tempdir");
        fs::write(first.path().join("a.js"), "ab").expect("write");
        fs::write(first.path().join("b.js"), "").expect("write");

        let second = tempfile::tempdir().expect("tempdir");
        fs::write(second.path().join("a.js"), "a").expect("write");
        fs::write(second.path().join("b.js"), "b").expect("write");

        let first_hash =
            fingerprint_entries(&collect_entries(first.path()).expect("entries")).expect("hash");
        let second_hash =
            fingerprint_entries(&collect_entries(second.path()).expect("entries")).expect("hash");
        assert_ne!(first_hash, second_hash);
    }
}
