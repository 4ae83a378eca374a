//! The summary core: pure functions folding one day of activity records into
//! a [model::DailySummary]. Nothing in this module performs I/O; the storage
//! side reads the log and artifact files and hands the data in, which keeps
//! every piece here deterministic and directly testable.

pub mod aggregate;
pub mod build;
pub mod classify;
pub mod model;
pub mod score;
pub mod service;
