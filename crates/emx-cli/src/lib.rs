//! Library side of the `emx` command line tool.
//!
//! Commands run on plain job structs so `convert`, `remap` and the project
//! file driven `build` share one code path.

pub mod commands;
pub mod config;
pub mod logging;
pub mod summary;
