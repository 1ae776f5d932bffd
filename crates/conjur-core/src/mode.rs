//! Mode selection for `conjur env`

use crate::{CoreError, Result};

/// External command and its arguments, as given after `--`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub command: String,
    pub args: Vec<String>,
}

impl LaunchSpec {
    /// Split argv into command and arguments; `None` when argv is empty
    pub fn from_argv(argv: Vec<String>) -> Option<Self> {
        let mut argv = argv.into_iter();
        let command = argv.next()?;
        Some(Self {
            command,
            args: argv.collect(),
        })
    }
}

/// What `conjur env` should do with the mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Report per-variable availability without fetching values
    Check,
    /// Fetch every value and replace this process with the command
    Launch(LaunchSpec),
}

impl Mode {
    /// Pick exactly one mode from the `--check` flag and the trailing command.
    ///
    /// Runs before any file or network access.
    pub fn select(check: bool, command: Vec<String>) -> Result<Self> {
        match (check, LaunchSpec::from_argv(command)) {
            (true, Some(_)) => Err(CoreError::MutuallyExclusiveOptions),
            (false, None) => Err(CoreError::MissingModeOption),
            (true, None) => Ok(Mode::Check),
            (false, Some(spec)) => Ok(Mode::Launch(spec)),
        }
    }
}
