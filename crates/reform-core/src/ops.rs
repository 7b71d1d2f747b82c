//! Geometric transform operations over decoded images.
//!
//! These are pure functions: every op takes a [`DynamicImage`] and returns a
//! new one, with no side effects. Filters compose them in a fixed order.
//!
//! The arithmetic here is deliberate. `resize_aspect` compares signed size
//! diffs and treats the equal-diff case as a direct resize, and clamps a
//! degenerate computed edge up to 5 pixels. `crop` and `fill` center via
//! `>> 1`, which floors odd differences toward the top-left edge. Callers
//! depend on these exact rules for path-stable, reproducible output.

use image::{imageops, DynamicImage, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{FilterError, FilterResult};

/// Vertical placement for an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    Top,
    Bottom,
}

/// Horizontal placement for an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    Left,
    Right,
}

/// Two-axis corner anchor for [`overlay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub vertical: VAlign,
    pub horizontal: HAlign,
}

impl Anchor {
    pub const fn new(vertical: VAlign, horizontal: HAlign) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }
}

fn check_dimensions(width: u32, height: u32) -> FilterResult<()> {
    if width == 0 || height == 0 {
        return Err(FilterError::InvalidDimension { width, height });
    }
    Ok(())
}

/// Resize to exactly (width, height), stretching or squeezing as needed.
pub fn resize_force(img: &DynamicImage, width: u32, height: u32) -> FilterResult<DynamicImage> {
    check_dimensions(width, height)?;
    Ok(img.resize_exact(width, height, imageops::FilterType::Lanczos3))
}

/// Resize preserving aspect ratio, producing an image that fits within
/// (width, height) and is usually smaller in one dimension.
///
/// The binding dimension is chosen by comparing the signed diffs
/// `target - current` per axis. Equal diffs resize directly to the target
/// box with no ratio computation. A computed edge of zero is clamped up to
/// 5 pixels so the result stays visible.
pub fn resize_aspect(img: &DynamicImage, width: u32, height: u32) -> FilterResult<DynamicImage> {
    check_dimensions(width, height)?;
    let current_width = img.width();
    let current_height = img.height();

    let width_diff = i64::from(width) - i64::from(current_width);
    let height_diff = i64::from(height) - i64::from(current_height);

    if height_diff > width_diff {
        // width-constrained resize
        let mut h =
            (u64::from(width) * u64::from(current_height) / u64::from(current_width)) as u32;
        if h == 0 {
            h = 5;
        }
        Ok(img.resize_exact(width, h, imageops::FilterType::Lanczos3))
    } else if height_diff < width_diff {
        // height-constrained resize
        let mut w =
            (u64::from(height) * u64::from(current_width) / u64::from(current_height)) as u32;
        if w == 0 {
            w = 5;
        }
        Ok(img.resize_exact(w, height, imageops::FilterType::Lanczos3))
    } else {
        // source aspect matches target
        Ok(img.resize_exact(width, height, imageops::FilterType::Lanczos3))
    }
}

/// Center-anchored crop, applied only in the axes where the source exceeds
/// the target. Returns the input unchanged when both dimensions already fit.
///
/// Offsets floor via `>> 1`, biasing odd differences toward the top-left.
pub fn crop(img: &DynamicImage, width: u32, height: u32) -> FilterResult<DynamicImage> {
    check_dimensions(width, height)?;
    let current_width = img.width();
    let current_height = img.height();

    if current_width <= width && current_height <= height {
        return Ok(img.clone());
    }

    let x = if current_width > width {
        (current_width - width) >> 1
    } else {
        0
    };
    let y = if current_height > height {
        (current_height - height) >> 1
    } else {
        0
    };
    let out_width = current_width.min(width);
    let out_height = current_height.min(height);
    Ok(img.crop_imm(x, y, out_width, out_height))
}

/// Compose the source onto a new opaque canvas of exactly (width, height),
/// centered. Sources carrying an alpha channel are composited through it so
/// transparent regions take the fill color rather than rendering black.
///
/// The source is expected to already fit within the canvas; callers compose
/// a resize or crop first.
pub fn fill(
    img: &DynamicImage,
    width: u32,
    height: u32,
    fill_color: [u8; 3],
) -> FilterResult<DynamicImage> {
    check_dimensions(width, height)?;
    let current_width = img.width();
    let current_height = img.height();

    let x = i64::from(width.saturating_sub(current_width) >> 1);
    let y = i64::from(height.saturating_sub(current_height) >> 1);

    let [r, g, b] = fill_color;
    let canvas = RgbaImage::from_pixel(width, height, Rgba([r, g, b, 255]));
    let mut bg = DynamicImage::ImageRgba8(canvas);

    if img.color().has_alpha() {
        // Composite through the alpha channel; a plain paste would carry the
        // channel's black backing into the output.
        imageops::overlay(&mut bg, img, x, y);
    } else {
        imageops::replace(&mut bg, img, x, y);
    }
    Ok(DynamicImage::ImageRgb8(bg.to_rgb8()))
}

/// Paste an overlay image onto the base at the corner selected by `anchor`.
pub fn overlay(base: &DynamicImage, overlay_img: &DynamicImage, anchor: Anchor) -> DynamicImage {
    let x = match anchor.horizontal {
        HAlign::Left => 0,
        HAlign::Right => i64::from(base.width().saturating_sub(overlay_img.width())),
    };
    let y = match anchor.vertical {
        VAlign::Top => 0,
        VAlign::Bottom => i64::from(base.height().saturating_sub(overlay_img.height())),
    };
    let mut out = base.clone();
    imageops::overlay(&mut out, overlay_img, x, y);
    out
}
