//! CLI command implementations.

pub mod common;
pub mod defaults;
pub mod instruments;
pub mod render;
pub mod sample;
