//! Configuration parsing for conjur
//!
//! This crate handles parsing of:
//! - Variable mapping files (`.conjurenv`, flat YAML of name → secret path)
//! - Client configuration (`~/.config/conjur/config.toml` plus `CONJUR_*` env vars)

mod client;
mod error;
mod mapping;

pub use client::*;
pub use error::*;
pub use mapping::*;
