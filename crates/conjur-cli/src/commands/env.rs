//! `conjur env`

use anyhow::Result;
use conjur_api::CredentialStore;
use conjur_core::{EnvOutcome, EnvRequest};
use std::io::Write;

/// Run `conjur env`. In launch mode this only returns if the handoff failed.
pub async fn env<W: Write>(
    request: EnvRequest,
    store: &dyn CredentialStore,
    out: &mut W,
) -> Result<()> {
    match request.run(store, out).await? {
        EnvOutcome::Checked(statuses) => {
            tracing::info!("All {} variable(s) available", statuses.len());
            Ok(())
        }
        EnvOutcome::Launch(plan) => Err(plan.exec().into()),
    }
}
