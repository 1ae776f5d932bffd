//! Process handoff
//!
//! On Unix the current process image is replaced, so nothing after a
//! successful [`LaunchPlan::exec`] runs. Elsewhere the command is spawned with
//! the same environment and arguments and this process exits with its status.

use crate::{CoreError, EnvironmentOverlay, LaunchSpec};
use std::process::Command;

/// Everything needed to start the external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub spec: LaunchSpec,
    pub overlay: EnvironmentOverlay,
}

impl LaunchPlan {
    pub fn new(spec: LaunchSpec, overlay: EnvironmentOverlay) -> Self {
        Self { spec, overlay }
    }

    /// Command inheriting the current environment with the overlay applied
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.spec.command);
        cmd.args(&self.spec.args);
        cmd.envs(self.overlay.iter());
        cmd
    }

    /// Hand the process over to the command. Returns only on failure.
    #[cfg(unix)]
    pub fn exec(self) -> CoreError {
        use std::os::unix::process::CommandExt;

        tracing::info!(
            "Launching '{}' with {} variable(s)",
            self.spec.command,
            self.overlay.len()
        );
        let source = self.command().exec();
        CoreError::HandoffFailed {
            command: self.spec.command,
            source,
        }
    }

    /// Hand the process over to the command. Returns only on failure.
    #[cfg(not(unix))]
    pub fn exec(self) -> CoreError {
        tracing::info!(
            "Launching '{}' with {} variable(s)",
            self.spec.command,
            self.overlay.len()
        );
        match self.command().status() {
            Ok(status) => std::process::exit(status.code().unwrap_or(1)),
            Err(source) => CoreError::HandoffFailed {
                command: self.spec.command,
                source,
            },
        }
    }
}
