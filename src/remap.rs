//! Hue band remapping for single pixels and whole images.

use image::RgbaImage;
use palette::Hsl;
use serde::{Deserialize, Serialize};

use crate::color::{from_rgb8, hsl_to_rgb, rgb_to_hsl, to_rgb8};

// ============================================================================
// HueBand
// ============================================================================

/// An inclusive, non-wrapping interval of hues in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HueBand {
    /// Lower bound in degrees (inclusive).
    pub lo: f32,
    /// Upper bound in degrees (inclusive).
    pub hi: f32,
}

impl HueBand {
    /// The blue band, 180° to 260°.
    pub const BLUE: Self = Self { lo: 180.0, hi: 260.0 };

    pub fn new(lo: f32, hi: f32) -> Self {
        Self { lo, hi }
    }

    /// Returns true if `hue` lies within `[lo, hi]`.
    pub fn contains(&self, hue: f32) -> bool {
        self.lo <= hue && hue <= self.hi
    }
}

impl Default for HueBand {
    fn default() -> Self {
        Self::BLUE
    }
}

// ============================================================================
// HueRemap
// ============================================================================

/// Replaces every hue inside a band with a fixed substitute hue.
///
/// Saturation and lightness are preserved, so a dark blue becomes a dark
/// orange and a pale blue a pale orange.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueRemap {
    /// Hues to replace.
    pub band: HueBand,
    /// Replacement hue in degrees (0-360).
    pub substitute: f32,
}

impl HueRemap {
    /// Orange, the default substitute.
    pub const ORANGE: f32 = 30.0;

    /// Creates a remap. The substitute is normalized to the 0-360 range.
    pub fn new(band: HueBand, substitute: f32) -> Self {
        Self {
            band,
            substitute: substitute.rem_euclid(360.0),
        }
    }

    /// Remaps a single opaque pixel's color.
    ///
    /// Colors whose hue falls outside the band are returned as-is without
    /// going through HSL, so they never pick up rounding error.
    pub fn remap_rgb(&self, rgb: [u8; 3]) -> [u8; 3] {
        let [r, g, b] = rgb;
        let hsl = rgb_to_hsl(from_rgb8(r, g, b));
        if !self.band.contains(hsl.hue.into_positive_degrees()) {
            return rgb;
        }
        let substituted: Hsl = Hsl::new(self.substitute, hsl.saturation, hsl.lightness);
        to_rgb8(hsl_to_rgb(substituted))
    }
}

impl Default for HueRemap {
    fn default() -> Self {
        Self::new(HueBand::BLUE, Self::ORANGE)
    }
}

// ============================================================================
// Image Pipeline
// ============================================================================

/// Applies a hue remap to every visible pixel of `image`, in place.
///
/// Fully transparent pixels are left byte-identical, and alpha is never
/// changed. Pixels are independent, so order does not matter.
pub fn apply_hue_remap(image: &mut RgbaImage, remap: &HueRemap) {
    for pixel in image.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        if a == 0 {
            continue;
        }
        let [r, g, b] = remap.remap_rgb([r, g, b]);
        pixel.0 = [r, g, b, a];
    }
}

// ============================================================================
// Tests
// ============================================================================
