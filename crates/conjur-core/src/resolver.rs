//! Secret resolution for variable mappings
//!
//! Every remote call is awaited before the next one starts; nothing here runs
//! concurrently.

use crate::{CoreError, Result};
use conjur_api::{BatchOutcome, CredentialStore};
use conjur_config::VariableMapping;
use std::collections::HashMap;
use std::fmt;

/// Permission check result for one mapping entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableStatus {
    pub name: String,
    pub path: String,
    pub available: bool,
}

impl fmt::Display for VariableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.available {
            write!(f, "{}: available", self.path)
        } else {
            write!(f, "{}: not available", self.path)
        }
    }
}

/// Secret path → value, as returned by the store
pub type ResolutionResult = HashMap<String, String>;

/// Check every entry individually, in mapping order.
///
/// Availability is reported, not enforced: the caller decides what to do with
/// unavailable entries once the whole list is known.
pub async fn check_variables(
    store: &dyn CredentialStore,
    mapping: &VariableMapping,
) -> Result<Vec<VariableStatus>> {
    let mut statuses = Vec::with_capacity(mapping.len());

    for entry in mapping.iter() {
        let available = store.check_permission(&entry.path).await?;
        tracing::debug!("{} ({}): available={}", entry.name, entry.path, available);
        statuses.push(VariableStatus {
            name: entry.name.clone(),
            path: entry.path.clone(),
            available,
        });
    }

    Ok(statuses)
}

/// Fetch every value in the mapping and pair it with its variable name.
///
/// One bulk request is tried first. If it fails, each distinct path is
/// fetched on its own in mapping order and the first failure is returned.
pub async fn resolve_variables(
    store: &dyn CredentialStore,
    mapping: &VariableMapping,
) -> Result<Vec<(String, String)>> {
    let paths: Vec<String> = mapping
        .distinct_paths()
        .into_iter()
        .map(String::from)
        .collect();

    let values = match store.fetch_many(&paths).await {
        BatchOutcome::Resolved(values) if paths.iter().all(|p| values.contains_key(p)) => {
            tracing::debug!("Resolved {} secret(s) in one request", paths.len());
            values
        }
        BatchOutcome::Resolved(_) => {
            tracing::warn!("batch response incomplete, processing variables one by one");
            fetch_each(store, &paths).await?
        }
        BatchOutcome::Unsupported(reason) => {
            tracing::warn!(
                "batch retrieval failed ({}), processing variables one by one",
                reason
            );
            fetch_each(store, &paths).await?
        }
    };

    fan_out(mapping, &values)
}

async fn fetch_each(store: &dyn CredentialStore, paths: &[String]) -> Result<ResolutionResult> {
    let mut values = ResolutionResult::with_capacity(paths.len());

    for path in paths {
        let value = store
            .fetch_one(path)
            .await
            .map_err(|source| CoreError::SingleResolutionFailed {
                path: path.clone(),
                source,
            })?;
        values.insert(path.clone(), value);
    }

    Ok(values)
}

fn fan_out(mapping: &VariableMapping, values: &ResolutionResult) -> Result<Vec<(String, String)>> {
    mapping
        .iter()
        .map(|entry| {
            values
                .get(&entry.path)
                .map(|value| (entry.name.clone(), value.clone()))
                .ok_or_else(|| CoreError::SingleResolutionFailed {
                    path: entry.path.clone(),
                    source: conjur_api::ApiError::NotFound(entry.path.clone()),
                })
        })
        .collect()
}
