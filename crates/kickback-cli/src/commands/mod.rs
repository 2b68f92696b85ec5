//! CLI command implementations.

pub mod backends;
pub mod circuit;
pub mod common;
pub mod run;
pub mod version;
