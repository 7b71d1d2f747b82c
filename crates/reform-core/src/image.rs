//! The original-image record.
//!
//! An [`ImageRecord`] always points at an existing readable blob; a record
//! with no blob is an error state, not a valid null. Width, height, and
//! byte size are captured once at ingest and never recomputed implicitly,
//! sparing a decode on every later access.

use std::io::Cursor;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FilterError, FilterResult};

/// Metadata for one original uploaded image.
///
/// Identity is the storage path in `src`; persistence of the record itself
/// is the record store's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Storage path of the original blob, unique per record
    pub src: PathBuf,

    /// Namespace whose filters apply to this image
    pub namespace: String,

    /// Pixel width, captured at ingest
    pub width: u32,

    /// Pixel height, captured at ingest
    pub height: u32,

    /// Blob size in bytes, captured at ingest
    pub bytesize: u64,

    /// Upload timestamp
    pub uploaded_at: DateTime<Utc>,
}

impl ImageRecord {
    /// Build a record from the uploaded bytes, decoding once to capture
    /// dimensions.
    pub fn ingest(
        namespace: impl Into<String>,
        src: impl Into<PathBuf>,
        bytes: &[u8],
    ) -> FilterResult<Self> {
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| FilterError::Decode(format!("Cannot detect image format: {e}")))?;
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| FilterError::Decode(e.to_string()))?;
        Ok(Self {
            src: src.into(),
            namespace: namespace.into(),
            width,
            height,
            bytesize: bytes.len() as u64,
            uploaded_at: Utc::now(),
        })
    }

    /// File name without path or extension; the base of every reform name.
    pub fn stem(&self) -> &str {
        self.src
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }

    pub fn is_portrait(&self) -> bool {
        self.width < self.height
    }

    pub fn is_landscape(&self) -> bool {
        self.height < self.width
    }
}

impl std::fmt::Display for ImageRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.src.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{encode, OutputFormat};
    use image::DynamicImage;

    #[test]
    fn test_ingest_captures_metadata() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::new(120, 80));
        let bytes = encode(&img, OutputFormat::Png).unwrap();
        let record = ImageRecord::ingest("app", "originals/beach.png", &bytes).unwrap();
        assert_eq!(record.width, 120);
        assert_eq!(record.height, 80);
        assert_eq!(record.bytesize, bytes.len() as u64);
        assert_eq!(record.stem(), "beach");
        assert!(record.is_landscape());
        assert!(!record.is_portrait());
    }

    #[test]
    fn test_ingest_rejects_non_image() {
        let err = ImageRecord::ingest("app", "originals/notes.txt", b"plain text").unwrap_err();
        assert!(matches!(err, FilterError::Decode(_)));
    }

    #[test]
    fn test_stem_strips_path_and_extension() {
        let record = ImageRecord {
            src: PathBuf::from("originals/deep/sunset.v2.jpg"),
            namespace: "app".to_string(),
            width: 1,
            height: 1,
            bytesize: 1,
            uploaded_at: Utc::now(),
        };
        assert_eq!(record.stem(), "sunset.v2");
    }
}
