//! Core logic for conjur environment provisioning
//!
//! This crate provides:
//! - Mode selection for `conjur env` (permission check or launch)
//! - Secret resolution with bulk fetch and per-secret fallback
//! - Environment overlay assembly and process handoff
//! - Host factory token request building

mod dispatch;
mod environment;
mod error;
pub mod hostfactory;
mod launch;
mod mode;
mod resolver;

pub use dispatch::*;
pub use environment::*;
pub use error::*;
pub use launch::*;
pub use mode::*;
pub use resolver::*;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
