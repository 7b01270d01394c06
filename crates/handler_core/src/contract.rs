use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::handler::CodeReference;
use crate::runtime::RuntimeIdentifier;

/// What the deployment system consumes for one handler.
///
/// `runtime` serializes as the identifier's original name, e.g. `"nodejs20.x"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandlerManifest {
    pub code: CodeReference,
    pub entrypoint: String,
    pub runtime: RuntimeIdentifier,
}

impl HandlerManifest {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// SHA-256 over the compact JSON form. Field order is fixed by the struct
/// definition, so equal manifests always hash equally.
pub fn manifest_fingerprint(manifest: &HandlerManifest) -> Result<String, serde_json::Error> {
    let mut hasher = Sha256::new();
    hasher.update(manifest.to_json()?);
    Ok(format!("{:x}", hasher.finalize()))
}
