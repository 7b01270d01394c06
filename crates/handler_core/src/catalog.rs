use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::CatalogError;
use crate::runtime::RuntimeIdentifier;

/// Runtime metadata the resolver consults: which family names are aliases of
/// one another and which versions are retired.
///
/// Passed explicitly to every resolution so tests can swap in synthetic
/// catalogs.
pub trait RuntimeCatalog {
    fn canonical_family<'a>(&'a self, family: &'a str) -> &'a str {
        family
    }

    fn is_deprecated(&self, _runtime: &RuntimeIdentifier) -> bool {
        false
    }
}

/// Retired Lambda runtimes. Entries without a minor cover the whole major.
const LAMBDA_DEPRECATED: &[&str] = &[
    "nodejs4.3",
    "nodejs6.10",
    "nodejs8.10",
    "nodejs10.x",
    "nodejs12.x",
    "nodejs14.x",
    "nodejs16.x",
    "nodejs18.x",
    "python2.7",
    "python3.6",
    "python3.7",
    "python3.8",
    "python3.9",
    "ruby2.5",
    "ruby2.7",
    "ruby3.2",
    "java8",
    "go1.x",
    "dotnetcore1.0",
    "dotnetcore2.0",
    "dotnetcore2.1",
    "dotnetcore3.1",
    "dotnet6",
];

const LAMBDA_ALIASES: &[(&str, &str)] = &[("node", "nodejs")];

/// On-disk shape of a runtime catalog.
///
/// ```json
/// { "aliases": { "node": "nodejs" }, "deprecated": ["nodejs16.x"] }
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    #[serde(default)]
    pub deprecated: Vec<String>,
}

/// Immutable registry of family aliases and deprecated runtimes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeRegistry {
    aliases: BTreeMap<String, String>,
    deprecated: Vec<RuntimeIdentifier>,
}

impl RuntimeRegistry {
    /// Empty registry: no aliases, nothing deprecated.
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in catalog of Lambda runtimes.
    pub fn lambda_defaults() -> Self {
        Self {
            aliases: LAMBDA_ALIASES
                .iter()
                .map(|(alias, family)| (alias.to_string(), family.to_string()))
                .collect(),
            deprecated: LAMBDA_DEPRECATED
                .iter()
                .filter_map(|name| RuntimeIdentifier::parse(name).ok())
                .collect(),
        }
    }

    pub fn with_alias(
        mut self,
        alias: impl AsRef<str>,
        family: impl AsRef<str>,
    ) -> Result<Self, CatalogError> {
        let alias = alias.as_ref();
        let family = family.as_ref();
        let invalid = || CatalogError::InvalidAlias {
            alias: alias.to_string(),
            family: family.to_string(),
        };

        let alias_key = normalize_family(alias).ok_or_else(invalid)?;
        let target = normalize_family(family).ok_or_else(invalid)?;
        if alias_key == target || self.aliases.contains_key(&target) {
            return Err(invalid());
        }
        if self.aliases.values().any(|existing| *existing == alias_key) {
            return Err(invalid());
        }
        if let Some(existing) = self.aliases.get(&alias_key) {
            if *existing != target {
                return Err(invalid());
            }
        }

        self.aliases.insert(alias_key, target);
        Ok(self)
    }

    pub fn with_deprecated(mut self, name: impl AsRef<str>) -> Result<Self, CatalogError> {
        let runtime =
            RuntimeIdentifier::parse(name.as_ref()).map_err(CatalogError::InvalidDeprecated)?;
        if !self.deprecated.contains(&runtime) {
            self.deprecated.push(runtime);
        }
        Ok(self)
    }

    pub fn from_config(config: CatalogConfig) -> Result<Self, CatalogError> {
        let mut registry = Self::new();
        for (alias, family) in &config.aliases {
            registry = registry.with_alias(alias, family)?;
        }
        for name in &config.deprecated {
            registry = registry.with_deprecated(name)?;
        }
        Ok(registry)
    }

    pub fn from_json(source: &str) -> Result<Self, CatalogError> {
        let config: CatalogConfig = serde_json::from_str(source)?;
        Self::from_config(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let source = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&source)
    }

    pub fn deprecated(&self) -> &[RuntimeIdentifier] {
        &self.deprecated
    }
}

impl RuntimeCatalog for RuntimeRegistry {
    fn canonical_family<'a>(&'a self, family: &'a str) -> &'a str {
        self.aliases
            .get(family)
            .map(String::as_str)
            .unwrap_or(family)
    }

    fn is_deprecated(&self, runtime: &RuntimeIdentifier) -> bool {
        let family = self.canonical_family(runtime.family());
        self.deprecated.iter().any(|retired| {
            self.canonical_family(retired.family()) == family
                && runtime.version().is_covered_by(&retired.version())
        })
    }
}

fn normalize_family(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|byte| byte.is_ascii_alphabetic()) {
        return None;
    }
    Some(trimmed.to_ascii_lowercase())
}
