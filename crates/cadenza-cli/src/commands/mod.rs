//! CLI command implementations

pub mod generate;
pub mod hash;
pub mod parse;
pub mod validate;
