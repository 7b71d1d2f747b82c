//! Reform generation: run every applicable filter over an image.
//!
//! Generation is idempotent and best-effort. A target that already exists
//! is never overwritten (the filesystem is the cache, keyed by the
//! deterministic path function), and a failure in one filter is recorded
//! and does not abort the remaining filters or images.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{ReformError, Result};
use crate::image::ImageRecord;
use crate::registry::FilterRegistry;
use crate::store::BlobStore;

use super::paths::reform_path;

/// Options narrowing a generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Only run filters with these names. Empty means all registered
    /// filters. Reaping ignores this narrowing — see
    /// [`super::reap::ReformReaper`].
    pub allow: Vec<String>,
}

impl GenerateOptions {
    fn permits(&self, name: &str) -> bool {
        self.allow.is_empty() || self.allow.iter().any(|n| n == name)
    }
}

/// Outcome tallies for a generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateReport {
    /// Reforms written this run
    pub created: usize,

    /// Targets skipped because they already exist
    pub ignored: usize,

    /// Target paths whose filter or write failed
    pub failed: Vec<PathBuf>,
}

impl GenerateReport {
    /// Fold another report into this one.
    pub fn merge(&mut self, other: GenerateReport) {
        self.created += other.created;
        self.ignored += other.ignored;
        self.failed.extend(other.failed);
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

impl std::fmt::Display for GenerateReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} reform image(s) created", self.created)?;
        write!(
            f,
            "{} reform image(s) ignored because they exist",
            self.ignored
        )?;
        if !self.failed.is_empty() {
            let paths: Vec<String> = self
                .failed
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            write!(
                f,
                "\n{} reform image(s) failed: '{}'",
                self.failed.len(),
                paths.join("', '")
            )?;
        }
        Ok(())
    }
}

/// Runs a namespace's filters over images and writes the results.
pub struct ReformGenerator<'a> {
    registry: &'a FilterRegistry,
    store: &'a dyn BlobStore,
    reform_root: PathBuf,
}

impl<'a> ReformGenerator<'a> {
    pub fn new(
        registry: &'a FilterRegistry,
        store: &'a dyn BlobStore,
        reform_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            registry,
            store,
            reform_root: reform_root.into(),
        }
    }

    /// Generate every missing reform for one image.
    ///
    /// An unknown namespace is a configuration error and fails the call;
    /// per-filter failures are tallied into the report instead.
    pub fn generate(
        &self,
        image: &ImageRecord,
        options: &GenerateOptions,
    ) -> Result<GenerateReport> {
        let filters = self.registry.lookup(&image.namespace)?;
        self.store.ensure_dir(&self.reform_root)?;

        let stem = image.stem();
        let mut report = GenerateReport::default();

        for (position, filter) in filters.iter().enumerate() {
            if !options.permits(filter.name()) {
                continue;
            }
            let target = reform_path(&self.reform_root, stem, filter.as_ref(), position);

            // Never clobber existing output. Losing an exists-then-write
            // race to a concurrent generator is harmless: content is
            // deterministic for the same (source, filter) pair.
            if self.store.exists(&target) {
                report.ignored += 1;
                continue;
            }

            match self.run_filter(image, filter.as_ref(), &target) {
                Ok(()) => {
                    tracing::debug!("Created reform {:?}", target);
                    report.created += 1;
                }
                Err(e) => {
                    tracing::warn!("Reform failed for {:?}: {e}", target);
                    report.failed.push(target);
                }
            }
        }
        Ok(report)
    }

    fn run_filter(
        &self,
        image: &ImageRecord,
        filter: &dyn crate::filters::Filter,
        target: &std::path::Path,
    ) -> std::result::Result<(), ReformError> {
        if let Some(parent) = target.parent() {
            self.store.ensure_dir(parent)?;
        }
        let bytes = {
            // Scope the source handle to the filter run so it closes on
            // every exit path, including failure.
            let mut src = self.store.open(&image.src)?;
            let (bytes, _format) = filter.process(src.as_mut())?;
            bytes
        };
        self.store.write(target, &bytes)?;
        Ok(())
    }

    /// Generate reforms for a whole record set.
    ///
    /// Uses the identical derivation and skip logic as [`Self::generate`],
    /// so a backfill pass and per-save generation always agree. The run is
    /// interruptible between images via `stop` — never mid-filter, so an
    /// interrupted batch leaves no partial reform. A per-image fatal error
    /// (unknown namespace, unreachable reform root) is tallied against the
    /// image's source path and the batch continues.
    pub fn generate_all<'i, I>(
        &self,
        images: I,
        options: &GenerateOptions,
        stop: &AtomicBool,
    ) -> GenerateReport
    where
        I: IntoIterator<Item = &'i ImageRecord>,
    {
        let mut total = GenerateReport::default();
        for image in images {
            if stop.load(Ordering::Relaxed) {
                tracing::info!("Bulk generation interrupted, stopping between images");
                break;
            }
            match self.generate(image, options) {
                Ok(report) => total.merge(report),
                Err(e) => {
                    tracing::warn!("Skipping image {}: {e}", image);
                    total.failed.push(image.src.clone());
                }
            }
        }
        total
    }
}
