use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RuntimeError;

/// Numeric runtime version. Orders by major, then minor; a missing minor
/// (`18` or `18.x`) sorts below any explicit minor of the same major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuntimeVersion {
    pub major: u32,
    pub minor: Option<u32>,
}

impl RuntimeVersion {
    pub fn new(major: u32, minor: Option<u32>) -> Self {
        Self { major, minor }
    }

    fn parse(raw: &str) -> Result<Self, String> {
        let mut parts = raw.split('.');
        let major = parse_component(parts.next().unwrap_or_default(), "major")?;
        let minor = match parts.next() {
            None | Some("x") | Some("X") => None,
            Some(part) => Some(parse_component(part, "minor")?),
        };
        if parts.next().is_some() {
            return Err("expected at most major and minor version components".to_string());
        }
        Ok(Self { major, minor })
    }

    /// Whether `self` is covered by `pattern`. A pattern without a minor
    /// covers every minor of its major.
    pub fn is_covered_by(&self, pattern: &RuntimeVersion) -> bool {
        self.major == pattern.major && (pattern.minor.is_none() || self.minor == pattern.minor)
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.minor {
            Some(minor) => write!(f, "{}.{minor}", self.major),
            None => write!(f, "{}", self.major),
        }
    }
}

fn parse_component(part: &str, label: &str) -> Result<u32, String> {
    if part.is_empty() {
        return Err(format!("{label} version component is empty"));
    }
    if !part.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(format!("{label} version component '{part}' is not numeric"));
    }
    part.parse::<u32>()
        .map_err(|_| format!("{label} version component '{part}' is out of range"))
}

/// A runtime tag such as `nodejs18.x` or `python3.12`, decoded into a
/// language family and a numeric version.
///
/// The original spelling is preserved in [`RuntimeIdentifier::name`]; that is
/// the value handed to the deployment system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuntimeIdentifier {
    name: String,
    family: String,
    version: RuntimeVersion,
}

impl RuntimeIdentifier {
    /// Parses `family` letters followed by `major[.minor|.x]`.
    pub fn parse(name: &str) -> Result<Self, RuntimeError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(RuntimeError::unparseable(name, "identifier is empty"));
        }

        let split = trimmed
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(trimmed.len());
        let (family, version) = trimmed.split_at(split);
        if family.is_empty() {
            return Err(RuntimeError::unparseable(name, "missing language family"));
        }
        if version.is_empty() {
            return Err(RuntimeError::unparseable(name, "missing version"));
        }

        let version = RuntimeVersion::parse(version)
            .map_err(|reason| RuntimeError::unparseable(name, reason))?;

        Ok(Self {
            name: trimmed.to_string(),
            family: family.to_ascii_lowercase(),
            version,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Family as spelled in the identifier, lower-cased. Alias resolution is
    /// the catalog's job.
    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn version(&self) -> RuntimeVersion {
        self.version
    }
}

impl fmt::Display for RuntimeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl FromStr for RuntimeIdentifier {
    type Err = RuntimeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for RuntimeIdentifier {
    type Error = RuntimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RuntimeIdentifier> for String {
    fn from(value: RuntimeIdentifier) -> Self {
        value.name
    }
}
