//! icon-recolor: recolored multi-size icon containers
//!
//! This crate turns a single raster image into an ICO container holding
//! several sizes of that image, replacing one band of hues (blue, by
//! default) with a substitute hue (orange) on the way.
//!
//! # Example
//!
//! ```
//! use icon_recolor::{HueBand, HueRemap, IconContainer, MultiSizeRenderer};
//! use image::{Rgba, RgbaImage};
//!
//! let source = RgbaImage::from_pixel(32, 32, Rgba([0, 0, 255, 255]));
//!
//! // Render each size with the blue band mapped to orange
//! let remap = HueRemap::new(HueBand::new(180.0, 260.0), 30.0);
//! let renderer = MultiSizeRenderer::new(vec![32, 16], remap);
//! let rendered = renderer.render(&source).unwrap();
//!
//! // Lay out and serialize the container
//! let container = IconContainer::from_images(rendered).unwrap();
//! let bytes = container.to_bytes().unwrap();
//! assert_eq!(&bytes[..6], b"\x00\x00\x01\x00\x02\x00");
//! ```
//!
//! # Profiles
//!
//! For file-to-file conversion, describe the settings with a
//! [`ConversionProfile`] and hand it to an [`IconConverter`]:
//!
//! ```no_run
//! use icon_recolor::{ConversionProfile, IconConverter};
//! use std::path::Path;
//!
//! let profile = ConversionProfile::from_json(r#"{ "sizes": [48, 32, 16] }"#).unwrap();
//! let converter = IconConverter::from_profile(&profile).unwrap();
//! converter
//!     .convert_file(Path::new("logo.png"), Path::new("logo.ico"))
//!     .unwrap();
//! ```

pub mod color;
mod container;
mod converter;
mod error;
mod profile;
mod remap;
mod render;

pub use container::{dimension_byte, IconContainer, IconDirEntry, ENTRY_LEN, HEADER_LEN, MAX_EDGE};
pub use converter::{Configurable, IconConverter};
pub use error::{Error, Result};
pub use profile::{ConversionProfile, DEFAULT_SIZES};
pub use remap::{apply_hue_remap, HueBand, HueRemap};
pub use render::{
    decode_file, fit_within, Encoder, ImageResizer, MultiSizeRenderer, PngEncoder,
    RenderedImage, ResizeFilter, Resizer,
};
