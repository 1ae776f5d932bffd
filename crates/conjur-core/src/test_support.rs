//! Test support utilities for conjur-core
//!
//! Provides MockStore and helpers for unit testing resolution and dispatch
//! without a real credential store.

use async_trait::async_trait;
use conjur_api::*;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Records which methods were called on the mock
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    CheckPermission { path: String },
    FetchMany { paths: Vec<String> },
    FetchOne { path: String },
    CreateTokens { host_factory: String, count: u32 },
    RevokeToken { token: String },
    CreateHost { token: String, host_id: String },
}

/// Configurable mock credential store for testing
#[derive(Default)]
pub struct MockStore {
    pub calls: Arc<Mutex<Vec<MockCall>>>,
    /// Secret values by path
    pub secrets: Arc<Mutex<HashMap<String, String>>>,
    /// Paths the caller may not read: permission check is false, fetches are forbidden
    pub denied: Arc<Mutex<HashSet<String>>>,
    /// If set, fetch_many reports this as unsupported
    pub batch_error: Arc<Mutex<Option<ApiError>>>,
    /// Per-path errors for fetch_one
    pub fetch_errors: Arc<Mutex<HashMap<String, ApiError>>>,
    /// Error for check_permission calls (if Some, every check fails with it)
    pub check_error: Arc<Mutex<Option<ApiError>>>,
    /// Result for create_host_factory_tokens calls
    pub tokens_result: Arc<Mutex<Option<Result<Vec<HostFactoryToken>>>>>,
    /// Error for revoke calls
    pub revoke_error: Arc<Mutex<Option<ApiError>>>,
    /// Result for create_host calls
    pub host_result: Arc<Mutex<Option<Result<HostRecord>>>>,
}

impl MockStore {
    /// Create an empty store where every permission check succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given `(path, value)` secrets
    pub fn with_secrets(secrets: &[(&str, &str)]) -> Self {
        let store = Self::new();
        store.secrets.lock().unwrap().extend(
            secrets
                .iter()
                .map(|(p, v)| (p.to_string(), v.to_string())),
        );
        store
    }

    pub fn deny(&self, path: &str) {
        self.denied.lock().unwrap().insert(path.to_string());
    }

    pub fn fail_batch(&self, err: ApiError) {
        *self.batch_error.lock().unwrap() = Some(err);
    }

    pub fn fail_fetch(&self, path: &str, err: ApiError) {
        self.fetch_errors
            .lock()
            .unwrap()
            .insert(path.to_string(), err);
    }

    /// Record a call
    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    /// Get all recorded calls
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Count recorded calls matching a predicate
    pub fn count_calls(&self, pred: impl Fn(&MockCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    /// Check if a specific call was made
    pub fn was_called(&self, call: &MockCall) -> bool {
        self.calls.lock().unwrap().contains(call)
    }
}

/// Clone an ApiError (thiserror types don't implement Clone)
pub fn clone_api_error(e: &ApiError) -> ApiError {
    match e {
        ApiError::ConnectionError(s) => ApiError::ConnectionError(s.clone()),
        ApiError::Unauthorized(s) => ApiError::Unauthorized(s.clone()),
        ApiError::Forbidden(s) => ApiError::Forbidden(s.clone()),
        ApiError::NotFound(s) => ApiError::NotFound(s.clone()),
        ApiError::Http {
            target,
            status,
            message,
        } => ApiError::Http {
            target: target.clone(),
            status: *status,
            message: message.clone(),
        },
        ApiError::Decode { target, message } => ApiError::Decode {
            target: target.clone(),
            message: message.clone(),
        },
        ApiError::ConfigError(s) => ApiError::ConfigError(s.clone()),
        ApiError::Unsupported(s) => ApiError::Unsupported(s.clone()),
    }
}

fn clone_slot<T: Clone>(slot: &Arc<Mutex<Option<Result<T>>>>) -> Option<Result<T>> {
    let guard = slot.lock().unwrap();
    match &*guard {
        Some(Ok(v)) => Some(Ok(v.clone())),
        Some(Err(e)) => Some(Err(clone_api_error(e))),
        None => None,
    }
}

/// Create a mock host factory token
pub fn mock_token(token: &str) -> HostFactoryToken {
    HostFactoryToken {
        token: token.to_string(),
        expiration: "2030-01-01T00:00:00+00:00".to_string(),
        cidr: Vec::new(),
    }
}

#[async_trait]
impl CredentialStore for MockStore {
    async fn check_permission(&self, path: &str) -> Result<bool> {
        self.record(MockCall::CheckPermission {
            path: path.to_string(),
        });
        if let Some(err) = self.check_error.lock().unwrap().as_ref() {
            return Err(clone_api_error(err));
        }
        Ok(!self.denied.lock().unwrap().contains(path))
    }

    async fn fetch_many(&self, paths: &[String]) -> BatchOutcome {
        self.record(MockCall::FetchMany {
            paths: paths.to_vec(),
        });
        if let Some(err) = self.batch_error.lock().unwrap().as_ref() {
            return BatchOutcome::Unsupported(clone_api_error(err));
        }
        let denied = self.denied.lock().unwrap();
        if let Some(path) = paths.iter().find(|p| denied.contains(*p)) {
            return BatchOutcome::Unsupported(ApiError::Forbidden(path.clone()));
        }
        let secrets = self.secrets.lock().unwrap();
        BatchOutcome::Resolved(
            paths
                .iter()
                .filter_map(|p| secrets.get(p).map(|v| (p.clone(), v.clone())))
                .collect(),
        )
    }

    async fn fetch_one(&self, path: &str) -> Result<String> {
        self.record(MockCall::FetchOne {
            path: path.to_string(),
        });
        if let Some(err) = self.fetch_errors.lock().unwrap().get(path) {
            return Err(clone_api_error(err));
        }
        if self.denied.lock().unwrap().contains(path) {
            return Err(ApiError::Forbidden(path.to_string()));
        }
        self.secrets
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(path.to_string()))
    }

    async fn create_host_factory_tokens(
        &self,
        host_factory: &str,
        request: &TokenRequest,
    ) -> Result<Vec<HostFactoryToken>> {
        self.record(MockCall::CreateTokens {
            host_factory: host_factory.to_string(),
            count: request.count,
        });
        clone_slot(&self.tokens_result).unwrap_or_else(|| {
            Ok((0..request.count)
                .map(|i| mock_token(&format!("token-{}", i)))
                .collect())
        })
    }

    async fn revoke_host_factory_token(&self, token: &str) -> Result<()> {
        self.record(MockCall::RevokeToken {
            token: token.to_string(),
        });
        match self.revoke_error.lock().unwrap().as_ref() {
            Some(err) => Err(clone_api_error(err)),
            None => Ok(()),
        }
    }

    async fn create_host(&self, token: &str, host_id: &str) -> Result<HostRecord> {
        self.record(MockCall::CreateHost {
            token: token.to_string(),
            host_id: host_id.to_string(),
        });
        clone_slot(&self.host_result).unwrap_or_else(|| {
            Ok(HostRecord {
                id: host_id.to_string(),
                api_key: Some("mock-api-key".to_string()),
                extra: serde_json::Map::new(),
            })
        })
    }
}
