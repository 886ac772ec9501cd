//! End-to-end conversion: decode, render, assemble, persist.

use std::io::Write;
use std::path::Path;

use image::RgbaImage;
use log::{debug, info};
use tempfile::NamedTempFile;

use crate::container::IconContainer;
use crate::error::{Error, Result};
use crate::profile::ConversionProfile;
use crate::render::{decode_file, ImageResizer, MultiSizeRenderer};

// ============================================================================
// Configurable Trait
// ============================================================================

/// Trait for types that can be configured from a [`ConversionProfile`].
pub trait Configurable {
    /// Validates and applies a profile's settings to this instance.
    fn apply_profile(&mut self, profile: &ConversionProfile) -> Result<()>;

    /// Exports the current settings as a profile.
    fn export_profile(&self) -> ConversionProfile;
}

// ============================================================================
// IconConverter
// ============================================================================

/// Converts a raster image into a recolored multi-size icon container.
///
/// The [`renderer`](Self::renderer) field holds the sizes, hue remap and
/// resampling settings; configure it directly or through a profile.
///
/// # Example
///
/// ```
/// use icon_recolor::{ConversionProfile, IconConverter};
/// use image::{Rgba, RgbaImage};
///
/// let profile = ConversionProfile::new().with_sizes(vec![32, 16]);
/// let converter = IconConverter::from_profile(&profile).unwrap();
///
/// let source = RgbaImage::from_pixel(64, 64, Rgba([0, 0, 255, 255]));
/// let container = converter.convert_image(&source).unwrap();
/// assert_eq!(container.len(), 2);
/// ```
pub struct IconConverter {
    /// The per-size rendering stage.
    pub renderer: MultiSizeRenderer,
}

impl Default for IconConverter {
    fn default() -> Self {
        let profile = ConversionProfile::default();
        let mut renderer = MultiSizeRenderer::new(profile.sizes.clone(), profile.remap());
        renderer.parallel = profile.parallel;
        *renderer.resizer_mut() = ImageResizer::new(profile.filter);
        Self { renderer }
    }
}

impl IconConverter {
    /// Creates a converter with the default profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a converter from a profile, validating it first.
    pub fn from_profile(profile: &ConversionProfile) -> Result<Self> {
        let mut converter = Self::default();
        converter.apply_profile(profile)?;
        Ok(converter)
    }

    /// Renders every size of `source` and lays out the container.
    pub fn convert_image(&self, source: &RgbaImage) -> Result<IconContainer> {
        let rendered = self.renderer.render(source)?;
        IconContainer::from_images(rendered)
    }

    /// Converts the image at `input` and writes the container to `output`.
    ///
    /// The container is fully assembled before anything touches the file
    /// system, then written to a temporary file next to `output` and
    /// renamed into place. On any error `output` is left as it was.
    pub fn convert_file(&self, input: &Path, output: &Path) -> Result<IconContainer> {
        let source = decode_file(input)?;
        let container = self.convert_image(&source)?;
        let bytes = container.to_bytes().map_err(|source| Error::Write {
            path: output.to_path_buf(),
            source,
        })?;
        write_atomically(output, &bytes)?;

        info!(
            "wrote {} ({} images, {} bytes)",
            output.display(),
            container.len(),
            bytes.len()
        );
        Ok(container)
    }
}

impl Configurable for IconConverter {
    fn apply_profile(&mut self, profile: &ConversionProfile) -> Result<()> {
        profile.validate()?;
        self.renderer.sizes = profile.sizes.clone();
        self.renderer.remap = profile.remap();
        self.renderer.parallel = profile.parallel;
        *self.renderer.resizer_mut() = ImageResizer::new(profile.filter);
        Ok(())
    }

    fn export_profile(&self) -> ConversionProfile {
        ConversionProfile {
            sizes: self.renderer.sizes.clone(),
            hue_band: self.renderer.remap.band,
            substitute_hue: self.renderer.remap.substitute,
            filter: self.renderer.resizer().filter,
            parallel: self.renderer.parallel,
        }
    }
}

/// Writes `bytes` to a sibling temporary file and renames it over `path`.
///
/// The temporary file is removed if anything fails before the rename.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let write_error = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
    file.write_all(bytes).map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;
    debug!("persisting {} to {}", file.path().display(), path.display());
    file.persist(path).map_err(|err| write_error(err.error))?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
