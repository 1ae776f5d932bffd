//! `conjur env` orchestration
//!
//! Mode is fixed when the request is built, before any I/O. Running the
//! request then loads the mapping and either reports availability or
//! produces a [`LaunchPlan`].

use crate::{
    assemble, check_variables, resolve_variables, CoreError, LaunchPlan, Mode, Result,
    VariableStatus,
};
use conjur_api::CredentialStore;
use conjur_config::{VariableMapping, DEFAULT_MAPPING_FILE};
use std::io::Write;
use std::path::PathBuf;

/// A validated `conjur env` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvRequest {
    pub mode: Mode,
    pub file: PathBuf,
}

/// How a successful `conjur env` run ends
#[derive(Debug)]
pub enum EnvOutcome {
    /// Every variable is available; the report has been written
    Checked(Vec<VariableStatus>),
    /// All values resolved; the caller hands off with [`LaunchPlan::exec`]
    Launch(LaunchPlan),
}

impl EnvRequest {
    /// Validate options. Fails on a missing or ambiguous mode without
    /// touching the filesystem.
    pub fn new(check: bool, command: Vec<String>, file: Option<PathBuf>) -> Result<Self> {
        let mode = Mode::select(check, command)?;
        Ok(Self {
            mode,
            file: file.unwrap_or_else(|| PathBuf::from(DEFAULT_MAPPING_FILE)),
        })
    }

    /// Load the mapping and carry out the selected mode.
    ///
    /// In check mode one line per variable is written to `out` before any
    /// unavailability is reported as an error.
    pub async fn run<W: Write>(
        self,
        store: &dyn CredentialStore,
        out: &mut W,
    ) -> Result<EnvOutcome> {
        let mapping = VariableMapping::load(&self.file)?;

        match self.mode {
            Mode::Check => {
                tracing::info!("Checking {} variable(s)", mapping.len());
                let statuses = check_variables(store, &mapping).await?;

                for status in &statuses {
                    writeln!(out, "{}", status)?;
                }
                out.flush()?;

                let unavailable: Vec<String> = statuses
                    .iter()
                    .filter(|s| !s.available)
                    .map(|s| s.path.clone())
                    .collect();
                if !unavailable.is_empty() {
                    return Err(CoreError::UnavailableVariables { paths: unavailable });
                }
                Ok(EnvOutcome::Checked(statuses))
            }
            Mode::Launch(spec) => {
                let resolved = resolve_variables(store, &mapping).await?;
                let overlay = assemble(resolved);
                Ok(EnvOutcome::Launch(LaunchPlan::new(spec, overlay)))
            }
        }
    }
}
