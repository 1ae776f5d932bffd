//! Library half of the `conjur` binary, exposed for tests

pub mod commands;
