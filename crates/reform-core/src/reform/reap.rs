//! Reform cleanup when the owning record is destroyed.
//!
//! Paths are reconstructed from the namespace's full filter list rather
//! than scanned, so cleanup costs one delete per filter. The full list is
//! used even when generation was narrowed by an allow-list: earlier
//! configurations may have produced reforms the current allow-list no
//! longer names.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::image::ImageRecord;
use crate::registry::FilterRegistry;
use crate::store::BlobStore;

use super::paths::reform_paths;

/// Outcome tallies for a reap run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReapReport {
    /// Reform files actually removed
    pub deleted: usize,

    /// Paths whose deletion failed (missing files are not failures)
    pub failed: Vec<PathBuf>,
}

impl ReapReport {
    pub fn merge(&mut self, other: ReapReport) {
        self.deleted += other.deleted;
        self.failed.extend(other.failed);
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

impl std::fmt::Display for ReapReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} reform image(s) deleted", self.deleted)?;
        if !self.failed.is_empty() {
            let paths: Vec<String> = self
                .failed
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            write!(
                f,
                "\n{} reform image(s) failed delete: '{}'",
                self.failed.len(),
                paths.join("', '")
            )?;
        }
        Ok(())
    }
}

/// Deletes a record's reforms by recomputing their paths.
pub struct ReformReaper<'a> {
    registry: &'a FilterRegistry,
    store: &'a dyn BlobStore,
    reform_root: PathBuf,
}

impl<'a> ReformReaper<'a> {
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

    /// Delete every reform for the image, best-effort.
    ///
    /// A namespace with no registered filters reaps nothing: a record can
    /// outlive the configuration that produced its reforms, and cleanup
    /// must not fail for it.
    pub fn reap(&self, image: &ImageRecord) -> ReapReport {
        let mut report = ReapReport::default();
        let filters = match self.registry.lookup(&image.namespace) {
            Ok(filters) => filters,
            Err(_) => {
                tracing::debug!(
                    "No filters registered for namespace '{}', nothing to reap",
                    image.namespace
                );
                return report;
            }
        };

        for (target, _filter) in reform_paths(&self.reform_root, image.stem(), filters) {
            match self.store.delete(&target) {
                Ok(true) => {
                    tracing::debug!("Deleted reform {:?}", target);
                    report.deleted += 1;
                }
                Ok(false) => {} // already gone
                Err(e) => {
                    tracing::warn!("Failed to delete reform {:?}: {e}", target);
                    report.failed.push(target);
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{encode, Filter, OutputFormat, Reformat, ResizeSmart};
    use crate::reform::generate::{GenerateOptions, ReformGenerator};
    use crate::store::FsStore;
    use std::path::Path;
    use std::sync::Arc;

    fn fixture() -> (tempfile::TempDir, FsStore, FilterRegistry, ImageRecord) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());

        let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(64, 64));
        let bytes = encode(&img, OutputFormat::Png).unwrap();
        store.write(Path::new("originals/sunset.png"), &bytes).unwrap();
        let record = ImageRecord::ingest("app", "originals/sunset.png", &bytes).unwrap();

        let mut registry = FilterRegistry::new();
        registry
            .register(
                "app",
                vec![
                    Arc::new(ResizeSmart::new("thumbnail", OutputFormat::Jpeg, 16, 16))
                        as Arc<dyn Filter>,
                    Arc::new(Reformat::new("watermark", OutputFormat::Png)) as Arc<dyn Filter>,
                ],
            )
            .unwrap();

        (dir, store, registry, record)
    }

    #[test]
    fn test_reap_removes_all_generated_reforms() {
        let (_dir, store, registry, record) = fixture();
        ReformGenerator::new(&registry, &store, "reforms")
            .generate(&record, &GenerateOptions::default())
            .unwrap();
        assert!(store.exists(Path::new("reforms/sunset.jpeg")));
        assert!(store.exists(Path::new("reforms/watermark/sunset.png")));

        let report = ReformReaper::new(&registry, &store, "reforms").reap(&record);
        assert_eq!(report.deleted, 2);
        assert!(report.is_clean());
        assert!(!store.exists(Path::new("reforms/sunset.jpeg")));
        assert!(!store.exists(Path::new("reforms/watermark/sunset.png")));
    }

    #[test]
    fn test_reap_ignores_allow_list_narrowing() {
        let (_dir, store, registry, record) = fixture();
        // generate only the second filter's reform
        let options = GenerateOptions {
            allow: vec!["watermark".to_string()],
        };
        ReformGenerator::new(&registry, &store, "reforms")
            .generate(&record, &options)
            .unwrap();

        // reaping covers the full filter list regardless
        let report = ReformReaper::new(&registry, &store, "reforms").reap(&record);
        assert_eq!(report.deleted, 1);
        assert!(report.is_clean());
    }

    #[test]
    fn test_reap_missing_files_not_failures() {
        let (_dir, store, registry, record) = fixture();
        let report = ReformReaper::new(&registry, &store, "reforms").reap(&record);
        assert_eq!(report.deleted, 0);
        assert!(report.is_clean());
    }

    #[test]
    fn test_reap_unknown_namespace_is_noop() {
        let (_dir, store, registry, mut record) = fixture();
        record.namespace = "ghost".to_string();
        let report = ReformReaper::new(&registry, &store, "reforms").reap(&record);
        assert_eq!(report.deleted, 0);
        assert!(report.is_clean());
    }
}
