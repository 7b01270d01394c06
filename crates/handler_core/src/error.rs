use std::path::PathBuf;

use thiserror::Error;

/// Failures while parsing or resolving runtime identifiers.
///
/// All variants are authoring mistakes; none of them are retryable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("at least one compatible runtime must be specified")]
    EmptyCandidateSet,

    #[error(
        "compatible runtimes must share one family: expected '{expected}', found '{found}' in '{runtime}'"
    )]
    MixedFamily {
        expected: String,
        found: String,
        runtime: String,
    },

    #[error("unparseable runtime identifier '{identifier}': {reason}")]
    UnparseableRuntimeIdentifier { identifier: String, reason: String },

    #[error("latest compatible runtime '{runtime}' is deprecated")]
    DeprecatedRuntime { runtime: String },
}

impl RuntimeError {
    pub(crate) fn unparseable(identifier: &str, reason: impl Into<String>) -> Self {
        Self::UnparseableRuntimeIdentifier {
            identifier: identifier.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failures while building a [`crate::RuntimeRegistry`] from configuration.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("malformed runtime catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read runtime catalog '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid alias '{alias}' -> '{family}': names must be ASCII letters and aliases cannot chain")]
    InvalidAlias { alias: String, family: String },

    #[error("invalid deprecated runtime: {0}")]
    InvalidDeprecated(#[source] RuntimeError),
}

/// Failures reported by a [`crate::CodeLoader`].
#[derive(Debug, Error)]
pub enum CodeLoadError {
    #[error("code asset '{}' does not exist", .path.display())]
    NotFound { path: PathBuf },

    #[error("code asset '{}' contains no files", .path.display())]
    EmptyAsset { path: PathBuf },

    #[error("failed to read code asset '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures while creating a [`crate::HandlerDescriptor`].
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("entrypoint '{entrypoint}' is invalid: it must be a non-empty name")]
    InvalidEntrypoint { entrypoint: String },

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    CodeLoad(#[from] CodeLoadError),
}
