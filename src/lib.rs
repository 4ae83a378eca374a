//! Daemon/cli pair for tracking which window holds focus throughout the day
//! and turning the collected log into a daily summary with a heuristic focus
//! score. Everything is stored as plain files in a single directory, so the
//! data stays readable without the application.

pub mod cli;
pub mod daemon;
pub mod summary;
pub mod utils;
pub mod window_api;
