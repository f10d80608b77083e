//! CLI command implementations.

pub mod common;
pub mod filters;
pub mod pipelines;
pub mod process;
pub mod validate;
