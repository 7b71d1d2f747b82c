//! Record-store lifecycle hooks.
//!
//! The record store is configured with an explicit [`RecordHooks`] value at
//! setup time and calls it around record persistence; nothing here is wired
//! through inheritance or global discovery. Creation generates reforms
//! synchronously after the record is persisted. Destruction hands back a
//! [`PendingCleanup`] the store commits only once its transaction has
//! committed, so a rolled-back delete never orphans a removed blob.

use std::path::PathBuf;

use crate::error::Result;
use crate::image::ImageRecord;
use crate::reform::{GenerateOptions, GenerateReport, ReapReport, ReformGenerator, ReformReaper};
use crate::registry::FilterRegistry;
use crate::store::BlobStore;

/// Behavior switches for the hooks.
#[derive(Debug, Clone, Default)]
pub struct HookOptions {
    /// Allow-list narrowing for generation (empty = all filters)
    pub allow: Vec<String>,

    /// Also delete the original blob when a record is destroyed
    pub delete_originals: bool,
}

/// Lifecycle callbacks the record store invokes.
pub struct RecordHooks<'a> {
    registry: &'a FilterRegistry,
    store: &'a dyn BlobStore,
    reform_root: PathBuf,
    options: HookOptions,
}

impl<'a> RecordHooks<'a> {
    pub fn new(
        registry: &'a FilterRegistry,
        store: &'a dyn BlobStore,
        reform_root: impl Into<PathBuf>,
        options: HookOptions,
    ) -> Self {
        Self {
            registry,
            store,
            reform_root: reform_root.into(),
            options,
        }
    }

    /// Generate reforms for a newly persisted image, synchronously.
    pub fn on_image_created(&self, image: &ImageRecord) -> Result<GenerateReport> {
        let generator = ReformGenerator::new(self.registry, self.store, &self.reform_root);
        let options = GenerateOptions {
            allow: self.options.allow.clone(),
        };
        generator.generate(image, &options)
    }

    /// Schedule cleanup for a destroyed image.
    ///
    /// Nothing is deleted until the returned value's `commit` runs;
    /// dropping it without committing does nothing.
    pub fn on_image_destroyed(&self, image: &ImageRecord) -> PendingCleanup<'a> {
        PendingCleanup {
            registry: self.registry,
            store: self.store,
            reform_root: self.reform_root.clone(),
            delete_original: self.options.delete_originals,
            image: image.clone(),
        }
    }
}

/// Deferred cleanup of a destroyed record's files.
#[must_use = "cleanup runs only when committed"]
pub struct PendingCleanup<'a> {
    registry: &'a FilterRegistry,
    store: &'a dyn BlobStore,
    reform_root: PathBuf,
    delete_original: bool,
    image: ImageRecord,
}

impl PendingCleanup<'_> {
    /// Run the reaper and, when configured, delete the original blob.
    /// Best-effort: failures are tallied in the report.
    pub fn commit(self) -> ReapReport {
        let reaper = ReformReaper::new(self.registry, self.store, &self.reform_root);
        let mut report = reaper.reap(&self.image);

        if self.delete_original {
            match self.store.delete(&self.image.src) {
                Ok(true) => tracing::debug!("Deleted original {:?}", self.image.src),
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!("Failed to delete original {:?}: {e}", self.image.src);
                    report.failed.push(self.image.src.clone());
                }
            }
        }
        report
    }
}
