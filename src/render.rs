//! Multi-size rendering: resize, recolor and encode one image per size.
//!
//! The image-format work is delegated to small collaborator traits so the
//! renderer can be driven with other resamplers or payload formats:
//!
//! - [`Resizer`]: fits a source image inside a square edge length
//! - [`Encoder`]: turns a finished image into payload bytes
//!
//! [`ImageResizer`] and [`PngEncoder`] are the defaults, both backed by the
//! `image` crate.

use std::io::Cursor;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{ImageFormat, ImageResult, RgbaImage};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::remap::{apply_hue_remap, HueRemap};

// ============================================================================
// Decoding
// ============================================================================

/// Decodes an image file into an RGBA buffer.
///
/// Fails with [`Error::Decode`] if the file is missing, unreadable, or in a
/// format that cannot be decoded.
pub fn decode_file(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        "decoded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image.to_rgba8())
}

// ============================================================================
// Collaborators
// ============================================================================

/// Fits an image inside a `max_edge` x `max_edge` square.
pub trait Resizer: Sync {
    /// Returns a resized copy of `source`. Must be deterministic.
    fn resize(&self, source: &RgbaImage, max_edge: u32) -> Result<RgbaImage>;
}

/// Encodes a finished image into payload bytes.
pub trait Encoder: Sync {
    /// Encodes `image` losslessly. Must be deterministic.
    fn encode(&self, image: &RgbaImage) -> ImageResult<Vec<u8>>;
}

/// Resampling filter used when resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Aspect-preserving resizer: the larger source dimension becomes
/// `max_edge` and the other scales proportionally (never below 1).
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageResizer {
    pub filter: ResizeFilter,
}

impl ImageResizer {
    pub fn new(filter: ResizeFilter) -> Self {
        Self { filter }
    }
}

impl Resizer for ImageResizer {
    fn resize(&self, source: &RgbaImage, max_edge: u32) -> Result<RgbaImage> {
        let (width, height) = fit_within(source.width(), source.height(), max_edge)
            .ok_or_else(|| Error::Resize {
                size: max_edge,
                reason: format!(
                    "cannot fit {}x{} source into {max_edge}x{max_edge}",
                    source.width(),
                    source.height()
                ),
            })?;

        if (width, height) == source.dimensions() {
            return Ok(source.clone());
        }
        if width > source.width() || height > source.height() {
            warn!(
                "upscaling {}x{} source to {width}x{height}",
                source.width(),
                source.height()
            );
        }

        Ok(imageops::resize(source, width, height, self.filter.into()))
    }
}

/// Computes the dimensions of a `width` x `height` image scaled so its
/// larger edge equals `max_edge`.
///
/// Returns `None` for empty sources or a zero target.
pub fn fit_within(width: u32, height: u32, max_edge: u32) -> Option<(u32, u32)> {
    if width == 0 || height == 0 || max_edge == 0 {
        return None;
    }
    let scale = |minor: u32, major: u32| -> u32 {
        let scaled = (minor as u64 * max_edge as u64 + major as u64 / 2) / major as u64;
        scaled.max(1) as u32
    };
    if width >= height {
        Some((max_edge, scale(height, width)))
    } else {
        Some((scale(width, height), max_edge))
    }
}

/// Lossless PNG payload encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngEncoder;

impl Encoder for PngEncoder {
    fn encode(&self, image: &RgbaImage) -> ImageResult<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Png)?;
        Ok(buffer.into_inner())
    }
}

// ============================================================================
// RenderedImage
// ============================================================================

/// One encoded image, ready to be embedded in an icon container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    /// The target edge length this image was rendered for.
    pub size: u32,
    /// Actual pixel width of the encoded image.
    pub width: u32,
    /// Actual pixel height of the encoded image.
    pub height: u32,
    /// The encoded payload.
    pub data: Vec<u8>,
}

impl RenderedImage {
    /// Creates a record for a square image of edge `size`.
    pub fn square(size: u32, data: Vec<u8>) -> Self {
        Self {
            size,
            width: size,
            height: size,
            data,
        }
    }
}

// ============================================================================
// MultiSizeRenderer
// ============================================================================

/// Renders a source image at several sizes, recoloring each one.
///
/// Every size works on its own copy of the source, so sizes can be
/// rendered concurrently. Rendering is fail-fast: if any size fails, the
/// whole call fails with the error of the first failing size in `sizes`
/// order, and no partial result is returned.
pub struct MultiSizeRenderer<R: Resizer = ImageResizer, E: Encoder = PngEncoder> {
    /// Target edge lengths, in output order.
    pub sizes: Vec<u32>,
    /// Hue remap applied after resizing.
    pub remap: HueRemap,
    /// Render sizes on separate threads.
    pub parallel: bool,
    resizer: R,
    encoder: E,
}

impl MultiSizeRenderer {
    /// Creates a renderer with the default resizer and PNG encoder.
    pub fn new(sizes: Vec<u32>, remap: HueRemap) -> Self {
        Self::with_collaborators(sizes, remap, ImageResizer::default(), PngEncoder)
    }
}

impl<R: Resizer, E: Encoder> MultiSizeRenderer<R, E> {
    /// Creates a renderer with custom collaborators.
    pub fn with_collaborators(sizes: Vec<u32>, remap: HueRemap, resizer: R, encoder: E) -> Self {
        Self {
            sizes,
            remap,
            parallel: true,
            resizer,
            encoder,
        }
    }

    pub fn resizer(&self) -> &R {
        &self.resizer
    }

    pub fn resizer_mut(&mut self) -> &mut R {
        &mut self.resizer
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Renders every configured size, returning records in `sizes` order.
    pub fn render(&self, source: &RgbaImage) -> Result<Vec<RenderedImage>> {
        if !self.parallel || self.sizes.len() < 2 {
            return self
                .sizes
                .iter()
                .map(|&size| self.render_size(source, size))
                .collect();
        }

        std::thread::scope(|scope| {
            let handles: Vec<_> = self
                .sizes
                .iter()
                .map(|&size| scope.spawn(move || self.render_size(source, size)))
                .collect();
            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(result) => result,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        })
    }

    /// Resizes, recolors and encodes a single size.
    pub fn render_size(&self, source: &RgbaImage, size: u32) -> Result<RenderedImage> {
        let mut image = self.resizer.resize(source, size)?;
        apply_hue_remap(&mut image, &self.remap);
        let data = self
            .encoder
            .encode(&image)
            .map_err(|source| Error::Encode { size, source })?;

        debug!(
            "rendered {size}x{size} as {}x{} ({} bytes)",
            image.width(),
            image.height(),
            data.len()
        );

        Ok(RenderedImage {
            size,
            width: image.width(),
            height: image.height(),
            data,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
