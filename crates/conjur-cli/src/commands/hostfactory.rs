//! `conjur hostfactory` commands

use anyhow::Result;
use conjur_api::CredentialStore;
use conjur_core::hostfactory::{token_request, TokenDuration};
use std::io::Write;

/// Create one or more identical tokens and print them as JSON
pub async fn create_tokens<W: Write>(
    store: &dyn CredentialStore,
    hostfactory: &str,
    duration: TokenDuration,
    count: Option<u32>,
    cidr: Option<&str>,
    out: &mut W,
) -> Result<()> {
    let request = token_request(duration, count, cidr, chrono::Utc::now())?;
    tracing::debug!(
        "Requesting {} token(s) for {} expiring {}",
        request.count,
        hostfactory,
        request.expiration
    );

    let tokens = store
        .create_host_factory_tokens(hostfactory, &request)
        .await?;
    writeln!(out, "{}", serde_json::to_string_pretty(&tokens)?)?;
    Ok(())
}

/// Revoke (delete) a token
pub async fn revoke_token<W: Write>(
    store: &dyn CredentialStore,
    token: &str,
    out: &mut W,
) -> Result<()> {
    store.revoke_host_factory_token(token).await?;
    writeln!(out, "Token revoked")?;
    Ok(())
}

/// Use a token to create a host and print it as JSON
pub async fn create_host<W: Write>(
    store: &dyn CredentialStore,
    token: &str,
    host_id: &str,
    out: &mut W,
) -> Result<()> {
    let host = store.create_host(token, host_id).await?;
    writeln!(out, "{}", serde_json::to_string_pretty(&host)?)?;
    Ok(())
}
