//! Common types for credential store access

use crate::ApiError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result of a bulk secret fetch.
///
/// A failed bulk fetch is not terminal: callers fall back to fetching each
/// secret individually, so the failure is carried as a value instead of an
/// `Err`.
#[derive(Debug)]
pub enum BatchOutcome {
    /// Every requested path with its value
    Resolved(HashMap<String, String>),
    /// The bulk endpoint was unreachable, forbidden, or not supported
    Unsupported(ApiError),
}

impl BatchOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// Parameters for issuing host factory tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    pub expiration: DateTime<Utc>,
    pub count: u32,
    /// `None` leaves the restriction unset, `Some(vec![])` clears it
    pub cidr: Option<Vec<String>>,
}

/// A host factory token as returned by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostFactoryToken {
    pub token: String,
    pub expiration: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cidr: Vec<String>,
}

/// A host enrolled through a host factory token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Remaining attributes, passed through for display
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
