//! Cadenza CLI library.
//!
//! Command implementations live here so they can be exercised by tests;
//! the `cadenza` binary only parses arguments and dispatches.

pub mod cli_args;
pub mod commands;
pub mod input;
