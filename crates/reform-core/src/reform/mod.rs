//! Reform production and cleanup.
//!
//! - **paths**: deterministic placement of reform files
//! - **generate**: run filters over an image, skipping existing output
//! - **reap**: delete a record's reforms when it is destroyed
//!
//! Generation and reaping share the same path derivation, so a bulk
//! backfill, a single-record save, and a delete always agree on where a
//! reform lives.

pub mod generate;
pub mod paths;
pub mod reap;

pub use generate::{GenerateOptions, GenerateReport, ReformGenerator};
pub use paths::{reform_path, reform_paths};
pub use reap::{ReapReport, ReformReaper};
