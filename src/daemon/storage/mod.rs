//!  Storage is organized through [log_store::FocusStorageImpl].
//!  The basic idea is:
//!   - There is a single data directory with all the day files.
//!   - Activity records append to `focus_log_<date>.jsonl`, one json object
//!     per line, and are immutable once written.
//!   - The derived summary caches to `daily_summary_<date>.json`; screenshot
//!     images and their OCR text files are dropped in by an external agent
//!     and only ever read.

pub mod entities;
pub mod log_store;
pub mod record_event;
