//! Reform Core - derived image variant pipeline.
//!
//! Reforms are derived image variants computed from an original upload by
//! an ordered set of named filters. The library covers the geometric
//! transform ops, the per-namespace filter registry, deterministic reform
//! placement, and the idempotent generate/reap pipeline; record persistence
//! and blob storage sit behind explicit collaborator boundaries.
//!
//! # Architecture
//!
//! ```text
//! Record created → Registry lookup → Path derivation → Filter (ops) → Blob store
//! Record destroyed → Path derivation → Blob store delete (missing ok)
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use reform_core::{Config, FsStore, GenerateOptions, ReformGenerator};
//!
//! fn main() -> reform_core::Result<()> {
//!     let config = Config::load()?;
//!     let registry = config.build_registry()?;
//!     let store = FsStore::new(config.media_root());
//!
//!     let generator = ReformGenerator::new(&registry, &store, config.reform_root());
//!     let report = generator.generate(&image, &GenerateOptions::default())?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod filters;
pub mod hooks;
pub mod image;
pub mod ops;
pub mod reform;
pub mod registry;
pub mod store;

// Re-exports for convenient access
pub use config::Config;
pub use error::{
    ConfigError, FilterError, FilterResult, ReformError, RegistryError, Result, StoreError,
};
pub use filters::{Filter, FilterSpec, OutputFormat};
pub use hooks::{HookOptions, PendingCleanup, RecordHooks};
pub use image::ImageRecord;
pub use reform::{GenerateOptions, GenerateReport, ReapReport, ReformGenerator, ReformReaper};
pub use registry::FilterRegistry;
pub use store::{BlobStore, FsStore};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
