//! Credential store trait and implementations for conjur
//!
//! This crate provides an abstraction over the remote credential store with
//! a consistent API for secret retrieval, permission checks and host
//! factory operations.

pub mod encoding;
mod error;
mod http;
mod types;

pub use error::*;
pub use http::HttpCredentialStore;
pub use types::*;

use async_trait::async_trait;
use conjur_config::ClientConfig;

/// Trait for credential stores
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Whether the current identity may fetch the secret at `path`
    async fn check_permission(&self, path: &str) -> Result<bool>;

    /// Fetch several secrets in one round trip
    async fn fetch_many(&self, paths: &[String]) -> BatchOutcome;

    /// Fetch a single secret
    async fn fetch_one(&self, path: &str) -> Result<String>;

    /// Issue one or more identical host factory tokens
    async fn create_host_factory_tokens(
        &self,
        host_factory: &str,
        request: &TokenRequest,
    ) -> Result<Vec<HostFactoryToken>>;

    /// Revoke a host factory token
    async fn revoke_host_factory_token(&self, token: &str) -> Result<()>;

    /// Enroll a host using a host factory token
    async fn create_host(&self, token: &str, host_id: &str) -> Result<HostRecord>;
}

/// Factory function to create the default store from client settings
pub fn create_store(config: ClientConfig) -> Result<Box<dyn CredentialStore>> {
    let store = HttpCredentialStore::new(config)?;
    Ok(Box::new(store))
}
