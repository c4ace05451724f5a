//! CLI command implementations.

pub mod sample;
pub mod watch;
