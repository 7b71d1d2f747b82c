//! Filters: named, configured transform pipelines.
//!
//! A filter decodes an input byte stream, applies one or more [`crate::ops`]
//! transforms in a fixed order, and re-encodes to its declared output
//! format. Filters are stateless aside from configuration and may be
//! instantiated any number of times.

pub mod stock;

use std::io::{Cursor, Read};

use image::{DynamicImage, ImageFormat, ImageReader};
use serde::{Deserialize, Serialize};

use crate::error::{FilterError, FilterResult};

pub use stock::{Crop, CropSmart, FilterSpec, Reformat, Resize, ResizeSmart, Watermark};

/// Output format a filter encodes to.
///
/// The lower-case token doubles as the file extension of the reform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    Webp,
    Gif,
    Bmp,
    Tiff,
}

impl OutputFormat {
    /// Lower-case short token, used as the reform file extension.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
            OutputFormat::Gif => "gif",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Tiff => "tiff",
        }
    }

    /// The codec this format encodes with.
    pub fn image_format(&self) -> ImageFormat {
        match self {
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Webp => ImageFormat::WebP,
            OutputFormat::Gif => ImageFormat::Gif,
            OutputFormat::Bmp => ImageFormat::Bmp,
            OutputFormat::Tiff => ImageFormat::Tiff,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, configured unit of reform production.
///
/// Implementations compose [`crate::ops`] calls in an order they define.
/// The identity triple (name, format, path segment) must be stable for the
/// lifetime of the process: reform paths are derived from it.
pub trait Filter: Send + Sync {
    /// Filter name, unique within its namespace.
    fn name(&self) -> &str;

    /// Output format the filter encodes to.
    fn format(&self) -> OutputFormat;

    /// Filesystem-safe path segment, derived from the name.
    fn path_segment(&self) -> String {
        path_segment_from_name(self.name())
    }

    /// Decode the source stream, transform, and re-encode.
    fn process(&self, src: &mut dyn Read) -> FilterResult<(Vec<u8>, OutputFormat)>;
}

/// Derive a filesystem-safe path segment from a filter name: lower-cased,
/// runs of non-alphanumeric characters collapsed to a single `-`.
pub fn path_segment_from_name(name: &str) -> String {
    let mut segment = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !segment.is_empty() {
                segment.push('-');
            }
            pending_dash = false;
            segment.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    segment
}

/// Decode an image from a byte stream, detecting the format from content.
pub fn decode(src: &mut dyn Read) -> FilterResult<DynamicImage> {
    let mut bytes = Vec::new();
    src.read_to_end(&mut bytes)
        .map_err(|e| FilterError::Decode(format!("Cannot read source: {e}")))?;
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| FilterError::Decode(format!("Cannot detect image format: {e}")))?;
    reader
        .decode()
        .map_err(|e| FilterError::Decode(e.to_string()))
}

/// Encode an image to the given output format.
pub fn encode(img: &DynamicImage, format: OutputFormat) -> FilterResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    // JPEG has no alpha channel; flatten first rather than failing encode.
    if format == OutputFormat::Jpeg && img.color().has_alpha() {
        let flat = DynamicImage::ImageRgb8(img.to_rgb8());
        flat.write_to(&mut buffer, format.image_format())
            .map_err(|e| FilterError::Encode(e.to_string()))?;
    } else {
        img.write_to(&mut buffer, format.image_format())
            .map_err(|e| FilterError::Encode(e.to_string()))?;
    }
    Ok(buffer.into_inner())
}
