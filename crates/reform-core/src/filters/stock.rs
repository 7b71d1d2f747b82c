//! Stock filters covering the common reform shapes.
//!
//! Each filter composes the transform ops in a fixed order and declares its
//! own identity. `ResizeSmart` and `CropSmart` always produce exactly the
//! configured box; `Resize` and `Crop` apply a single op; `Reformat` only
//! re-encodes; `Watermark` pastes a corner-anchored overlay.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, FilterResult};
use crate::ops::{self, Anchor};

use super::{decode, encode, Filter, OutputFormat};

const WHITE: [u8; 3] = [255, 255, 255];

fn default_fill_color() -> [u8; 3] {
    WHITE
}

/// Decode and re-encode to the target format with no geometry change.
#[derive(Debug, Clone)]
pub struct Reformat {
    name: String,
    format: OutputFormat,
}

impl Reformat {
    pub fn new(name: impl Into<String>, format: OutputFormat) -> Self {
        Self {
            name: name.into(),
            format,
        }
    }
}

impl Filter for Reformat {
    fn name(&self) -> &str {
        &self.name
    }

    fn format(&self) -> OutputFormat {
        self.format
    }

    fn process(&self, src: &mut dyn Read) -> FilterResult<(Vec<u8>, OutputFormat)> {
        let img = decode(src)?;
        Ok((encode(&img, self.format)?, self.format))
    }
}

/// Forced resize to exactly the configured box, stretching as needed.
#[derive(Debug, Clone)]
pub struct Resize {
    name: String,
    format: OutputFormat,
    width: u32,
    height: u32,
}

impl Resize {
    pub fn new(name: impl Into<String>, format: OutputFormat, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            format,
            width,
            height,
        }
    }
}

impl Filter for Resize {
    fn name(&self) -> &str {
        &self.name
    }

    fn format(&self) -> OutputFormat {
        self.format
    }

    fn process(&self, src: &mut dyn Read) -> FilterResult<(Vec<u8>, OutputFormat)> {
        let img = decode(src)?;
        let img = ops::resize_force(&img, self.width, self.height)?;
        Ok((encode(&img, self.format)?, self.format))
    }
}

/// Center crop down to the configured box; no-op when the source fits.
#[derive(Debug, Clone)]
pub struct Crop {
    name: String,
    format: OutputFormat,
    width: u32,
    height: u32,
}

impl Crop {
    pub fn new(name: impl Into<String>, format: OutputFormat, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            format,
            width,
            height,
        }
    }
}

impl Filter for Crop {
    fn name(&self) -> &str {
        &self.name
    }

    fn format(&self) -> OutputFormat {
        self.format
    }

    fn process(&self, src: &mut dyn Read) -> FilterResult<(Vec<u8>, OutputFormat)> {
        let img = decode(src)?;
        let img = ops::crop(&img, self.width, self.height)?;
        Ok((encode(&img, self.format)?, self.format))
    }
}

/// Aspect-preserving resize composed with a background fill.
///
/// Output is always exactly the configured box.
#[derive(Debug, Clone)]
pub struct ResizeSmart {
    name: String,
    format: OutputFormat,
    width: u32,
    height: u32,
    fill_color: [u8; 3],
}

impl ResizeSmart {
    pub fn new(name: impl Into<String>, format: OutputFormat, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            format,
            width,
            height,
            fill_color: WHITE,
        }
    }

    pub fn fill_color(mut self, color: [u8; 3]) -> Self {
        self.fill_color = color;
        self
    }
}

impl Filter for ResizeSmart {
    fn name(&self) -> &str {
        &self.name
    }

    fn format(&self) -> OutputFormat {
        self.format
    }

    fn process(&self, src: &mut dyn Read) -> FilterResult<(Vec<u8>, OutputFormat)> {
        let img = decode(src)?;
        let img = ops::resize_aspect(&img, self.width, self.height)?;
        let img = ops::fill(&img, self.width, self.height, self.fill_color)?;
        Ok((encode(&img, self.format)?, self.format))
    }
}

/// Center crop composed with a background fill.
///
/// Output is always exactly the configured box.
#[derive(Debug, Clone)]
pub struct CropSmart {
    name: String,
    format: OutputFormat,
    width: u32,
    height: u32,
    fill_color: [u8; 3],
}

impl CropSmart {
    pub fn new(name: impl Into<String>, format: OutputFormat, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            format,
            width,
            height,
            fill_color: WHITE,
        }
    }

    pub fn fill_color(mut self, color: [u8; 3]) -> Self {
        self.fill_color = color;
        self
    }
}

impl Filter for CropSmart {
    fn name(&self) -> &str {
        &self.name
    }

    fn format(&self) -> OutputFormat {
        self.format
    }

    fn process(&self, src: &mut dyn Read) -> FilterResult<(Vec<u8>, OutputFormat)> {
        let img = decode(src)?;
        let img = ops::crop(&img, self.width, self.height)?;
        let img = ops::fill(&img, self.width, self.height, self.fill_color)?;
        Ok((encode(&img, self.format)?, self.format))
    }
}

/// Paste a second image onto the source at a corner anchor.
///
/// With no anchor configured the source passes through untouched.
#[derive(Debug, Clone)]
pub struct Watermark {
    name: String,
    format: OutputFormat,
    overlay_path: PathBuf,
    anchor: Option<Anchor>,
}

impl Watermark {
    pub fn new(
        name: impl Into<String>,
        format: OutputFormat,
        overlay_path: impl Into<PathBuf>,
        anchor: Option<Anchor>,
    ) -> Self {
        Self {
            name: name.into(),
            format,
            overlay_path: overlay_path.into(),
            anchor,
        }
    }
}

impl Filter for Watermark {
    fn name(&self) -> &str {
        &self.name
    }

    fn format(&self) -> OutputFormat {
        self.format
    }

    fn process(&self, src: &mut dyn Read) -> FilterResult<(Vec<u8>, OutputFormat)> {
        let img = decode(src)?;
        let img = match self.anchor {
            Some(anchor) => {
                let mark = image::open(&self.overlay_path).map_err(|e| {
                    FilterError::Decode(format!(
                        "Cannot load overlay {}: {e}",
                        self.overlay_path.display()
                    ))
                })?;
                ops::overlay(&img, &mark, anchor)
            }
            None => img,
        };
        Ok((encode(&img, self.format)?, self.format))
    }
}

/// Declarative filter description, as it appears in the config file.
///
/// Lets a deployment declare its namespace filters in TOML instead of code:
///
/// ```toml
/// [[filter]]
/// type = "resize_smart"
/// name = "thumbnail"
/// format = "jpeg"
/// width = 256
/// height = 256
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterSpec {
    Reformat {
        name: String,
        format: OutputFormat,
    },
    Resize {
        name: String,
        format: OutputFormat,
        width: u32,
        height: u32,
    },
    Crop {
        name: String,
        format: OutputFormat,
        width: u32,
        height: u32,
    },
    ResizeSmart {
        name: String,
        format: OutputFormat,
        width: u32,
        height: u32,
        #[serde(default = "default_fill_color")]
        fill_color: [u8; 3],
    },
    CropSmart {
        name: String,
        format: OutputFormat,
        width: u32,
        height: u32,
        #[serde(default = "default_fill_color")]
        fill_color: [u8; 3],
    },
    Watermark {
        name: String,
        format: OutputFormat,
        overlay: PathBuf,
        #[serde(default)]
        anchor: Option<Anchor>,
    },
}

impl FilterSpec {
    /// The declared filter name.
    pub fn name(&self) -> &str {
        match self {
            FilterSpec::Reformat { name, .. }
            | FilterSpec::Resize { name, .. }
            | FilterSpec::Crop { name, .. }
            | FilterSpec::ResizeSmart { name, .. }
            | FilterSpec::CropSmart { name, .. }
            | FilterSpec::Watermark { name, .. } => name,
        }
    }

    /// Instantiate the described filter.
    pub fn build(&self) -> Arc<dyn Filter> {
        match self.clone() {
            FilterSpec::Reformat { name, format } => Arc::new(Reformat::new(name, format)),
            FilterSpec::Resize {
                name,
                format,
                width,
                height,
            } => Arc::new(Resize::new(name, format, width, height)),
            FilterSpec::Crop {
                name,
                format,
                width,
                height,
            } => Arc::new(Crop::new(name, format, width, height)),
            FilterSpec::ResizeSmart {
                name,
                format,
                width,
                height,
                fill_color,
            } => Arc::new(ResizeSmart::new(name, format, width, height).fill_color(fill_color)),
            FilterSpec::CropSmart {
                name,
                format,
                width,
                height,
                fill_color,
            } => Arc::new(CropSmart::new(name, format, width, height).fill_color(fill_color)),
            FilterSpec::Watermark {
                name,
                format,
                overlay,
                anchor,
            } => Arc::new(Watermark::new(name, format, overlay, anchor)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            width,
            height,
            image::Rgb([90, 90, 90]),
        ));
        encode(&img, OutputFormat::Png).unwrap()
    }

    #[test]
    fn test_reformat_changes_container() {
        let filter = Reformat::new("archive", OutputFormat::Jpeg);
        let (bytes, format) = filter.process(&mut png_bytes(20, 20).as_slice()).unwrap();
        assert_eq!(format, OutputFormat::Jpeg);
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_resize_smart_exact_box() {
        let filter = ResizeSmart::new("thumbnail", OutputFormat::Png, 64, 64);
        let (bytes, _) = filter.process(&mut png_bytes(200, 100).as_slice()).unwrap();
        let out = decode(&mut bytes.as_slice()).unwrap();
        assert_eq!((out.width(), out.height()), (64, 64));
    }

    #[test]
    fn test_crop_smart_exact_box() {
        let filter = CropSmart::new("card", OutputFormat::Png, 50, 80);
        let (bytes, _) = filter.process(&mut png_bytes(120, 40).as_slice()).unwrap();
        let out = decode(&mut bytes.as_slice()).unwrap();
        assert_eq!((out.width(), out.height()), (50, 80));
    }

    #[test]
    fn test_watermark_without_anchor_passes_through() {
        let filter = Watermark::new("stamp", OutputFormat::Png, "/nowhere/mark.png", None);
        let (bytes, _) = filter.process(&mut png_bytes(30, 30).as_slice()).unwrap();
        let out = decode(&mut bytes.as_slice()).unwrap();
        assert_eq!((out.width(), out.height()), (30, 30));
    }

    #[test]
    fn test_filter_spec_parses_and_builds() {
        let toml = r#"
            type = "resize_smart"
            name = "thumbnail"
            format = "jpeg"
            width = 256
            height = 192
        "#;
        let spec: FilterSpec = toml::from_str(toml).unwrap();
        assert_eq!(spec.name(), "thumbnail");
        let filter = spec.build();
        assert_eq!(filter.name(), "thumbnail");
        assert_eq!(filter.format(), OutputFormat::Jpeg);
        assert_eq!(filter.path_segment(), "thumbnail");
    }

    #[test]
    fn test_filter_spec_watermark_anchor() {
        let toml = r#"
            type = "watermark"
            name = "brand"
            format = "png"
            overlay = "/assets/mark.png"
            anchor = { vertical = "bottom", horizontal = "right" }
        "#;
        let spec: FilterSpec = toml::from_str(toml).unwrap();
        let filter = spec.build();
        assert_eq!(filter.name(), "brand");
        assert_eq!(filter.format(), OutputFormat::Png);
    }
}
