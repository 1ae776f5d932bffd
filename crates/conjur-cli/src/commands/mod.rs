//! CLI command implementations

mod env;
mod hostfactory;

use anyhow::Result;
use conjur_api::{create_store, CredentialStore};
use conjur_config::ClientConfig;
use std::path::Path;

pub use env::*;
pub use hostfactory::*;

/// Build a credential store from the config file (default location unless
/// `config_path` is given) and `CONJUR_*` variables. No network I/O.
pub fn connect(config_path: Option<&Path>) -> Result<Box<dyn CredentialStore>> {
    let config = match config_path {
        Some(path) => ClientConfig::load_from(path)?,
        None => ClientConfig::load()?,
    };
    Ok(create_store(config)?)
}
