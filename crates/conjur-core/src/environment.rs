//! Environment overlay for the launched command

use std::fmt;

/// Variables to set on top of the inherited environment.
///
/// `Debug` lists names only; values are secrets.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EnvironmentOverlay {
    vars: Vec<(String, String)>,
}

impl EnvironmentOverlay {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl fmt::Debug for EnvironmentOverlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentOverlay")
            .field("names", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

/// Build the overlay from resolved `(name, value)` pairs, keeping names as-is.
pub fn assemble(resolved: Vec<(String, String)>) -> EnvironmentOverlay {
    EnvironmentOverlay { vars: resolved }
}
