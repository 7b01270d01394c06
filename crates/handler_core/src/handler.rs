use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::RuntimeCatalog;
use crate::contract::HandlerManifest;
use crate::error::{CodeLoadError, HandlerError, RuntimeError};
use crate::resolver::determine_latest_runtime;
use crate::runtime::RuntimeIdentifier;

/// Opaque reference to loaded handler code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeReference {
    pub location: PathBuf,
    /// Lowercase hex SHA-256 of the asset content.
    pub fingerprint: String,
}

/// Loads handler code from a path. Implementations may touch the filesystem;
/// nothing else in this crate does.
pub trait CodeLoader {
    fn load(&self, path: &Path) -> Result<CodeReference, CodeLoadError>;
}

/// Authoring-time properties of a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerProps {
    /// Name of the function the serverless runtime calls.
    pub entrypoint: String,
    /// Runtimes the code is known to work on.
    pub compatible_runtimes: Vec<RuntimeIdentifier>,
}

impl HandlerProps {
    pub fn new(entrypoint: impl Into<String>, compatible_runtimes: Vec<RuntimeIdentifier>) -> Self {
        Self {
            entrypoint: entrypoint.into(),
            compatible_runtimes,
        }
    }

    pub fn from_names<S: AsRef<str>>(
        entrypoint: impl Into<String>,
        runtime_names: &[S],
    ) -> Result<Self, RuntimeError> {
        let compatible_runtimes = runtime_names
            .iter()
            .map(|name| RuntimeIdentifier::parse(name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(entrypoint, compatible_runtimes))
    }
}

/// Code bound to an entrypoint and the latest compatible runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerDescriptor {
    code: CodeReference,
    entrypoint: String,
    runtime: RuntimeIdentifier,
}

impl HandlerDescriptor {
    /// Builds a descriptor for the code at `path`.
    ///
    /// The entrypoint and runtimes are checked before the loader runs, so
    /// authoring mistakes never touch the filesystem.
    pub fn from_asset<C, L>(
        path: impl AsRef<Path>,
        props: &HandlerProps,
        catalog: &C,
        loader: &L,
    ) -> Result<Self, HandlerError>
    where
        C: RuntimeCatalog + ?Sized,
        L: CodeLoader + ?Sized,
    {
        if props.entrypoint.trim().is_empty() {
            return Err(HandlerError::InvalidEntrypoint {
                entrypoint: props.entrypoint.clone(),
            });
        }

        let runtime = determine_latest_runtime(&props.compatible_runtimes, catalog)?;
        let code = loader.load(path.as_ref())?;

        debug!(
            location = %code.location.display(),
            entrypoint = %props.entrypoint,
            runtime = %runtime,
            candidates = props.compatible_runtimes.len(),
            "resolved handler runtime"
        );

        Ok(Self {
            code,
            entrypoint: props.entrypoint.clone(),
            runtime,
        })
    }

    pub fn code(&self) -> &CodeReference {
        &self.code
    }

    pub fn entrypoint(&self) -> &str {
        &self.entrypoint
    }

    pub fn runtime(&self) -> &RuntimeIdentifier {
        &self.runtime
    }

    /// Output contract for the deployment system.
    pub fn manifest(&self) -> HandlerManifest {
        HandlerManifest {
            code: self.code.clone(),
            entrypoint: self.entrypoint.clone(),
            runtime: self.runtime.clone(),
        }
    }
}
