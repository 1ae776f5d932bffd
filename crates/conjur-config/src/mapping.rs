//! Variable mapping files
//!
//! A mapping file (`.conjurenv` by default) is a flat YAML document that maps
//! environment variable names to secret paths in the credential store:
//!
//! ```yaml
//! database_url: prod/db/url
//! api_token: prod/api/token
//! ```
//!
//! Anything other than a one-level mapping of string keys to string values is
//! rejected. Names are normalised to upper case on load.

use crate::{ConfigError, Result};
use serde_yaml::Value;
use std::collections::HashSet;
use std::path::Path;

/// File name used when no `--file` is given
pub const DEFAULT_MAPPING_FILE: &str = ".conjurenv";

/// One `NAME: secret/path` line of a mapping file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableEntry {
    /// Environment variable name, upper-cased
    pub name: String,
    /// Secret path in the credential store
    pub path: String,
}

/// Ordered, immutable set of variable → secret path assignments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableMapping {
    entries: Vec<VariableEntry>,
}

impl VariableMapping {
    /// Read and validate a mapping file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mapping = Self::parse(&content, path)?;
        tracing::debug!(
            "Loaded {} variable(s) from {}",
            mapping.len(),
            path.display()
        );
        Ok(mapping)
    }

    /// Validate mapping content. `origin` is only used for error messages.
    pub fn parse(content: &str, origin: &Path) -> Result<Self> {
        parse_flat_string_map(content).map_err(|reason| {
            tracing::debug!("Rejecting {}: {}", origin.display(), reason);
            ConfigError::Malformed {
                path: origin.to_path_buf(),
                reason,
            }
        })
    }

    pub fn entries(&self) -> &[VariableEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariableEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Secret paths with duplicates removed, in order of first appearance
    pub fn distinct_paths(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .map(|e| e.path.as_str())
            .filter(|p| seen.insert(*p))
            .collect()
    }
}

fn parse_flat_string_map(content: &str) -> std::result::Result<VariableMapping, String> {
    let document: Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;

    let map = match document {
        Value::Mapping(map) => map,
        other => return Err(format!("top level is {}, not a mapping", kind_of(&other))),
    };

    let mut names = HashSet::new();
    let mut entries = Vec::with_capacity(map.len());

    for (key, value) in map {
        let key = match key {
            Value::String(s) => s,
            other => return Err(format!("key of type {} is not a string", kind_of(&other))),
        };
        let path = match value {
            Value::String(s) => s,
            other => {
                return Err(format!(
                    "value of '{}' is {}, not a string",
                    key,
                    kind_of(&other)
                ))
            }
        };

        if key.is_empty() || key.contains('=') || key.contains('\0') {
            return Err(format!("'{}' is not a usable variable name", key));
        }
        if path.is_empty() {
            return Err(format!("'{}' has an empty secret path", key));
        }

        let name = key.to_uppercase();
        if !names.insert(name.clone()) {
            return Err(format!("variable '{}' is defined more than once", name));
        }

        entries.push(VariableEntry { name, path });
    }

    Ok(VariableMapping { entries })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
