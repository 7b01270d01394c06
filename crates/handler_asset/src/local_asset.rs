use std::fs;
use std::path::Path;

use handler_core::{CodeLoadError, CodeLoader, CodeReference};
use tracing::debug;

use crate::fingerprint::{collect_entries, fingerprint_entries, fingerprint_file};

/// Loads handler code from a local file or directory.
///
/// The returned reference carries the path as given and a content
/// fingerprint; nothing is copied or bundled.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalAssetLoader;

impl LocalAssetLoader {
    pub fn new() -> Self {
        Self
    }
}

impl CodeLoader for LocalAssetLoader {
    fn load(&self, path: &Path) -> Result<CodeReference, CodeLoadError> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Err(CodeLoadError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(source) => {
                return Err(CodeLoadError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let (fingerprint, file_count) = if metadata.is_dir() {
            let entries = collect_entries(path)?;
            if entries.is_empty() {
                return Err(CodeLoadError::EmptyAsset {
                    path: path.to_path_buf(),
                });
            }
            (fingerprint_entries(&entries)?, entries.len())
        } else {
            (fingerprint_file(path)?, 1)
        };

        debug!(
            location = %path.display(),
            file_count,
            fingerprint = %fingerprint,
            "loaded handler code asset"
        );

        Ok(CodeReference {
            location: path.to_path_buf(),
            fingerprint,
        })
    }
}
