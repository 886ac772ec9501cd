//! RGB and HSL conversion.
//!
//! Colors are carried in [`palette`] types, but the conversion itself is
//! done here so that every pixel is computed with the same piecewise
//! construction regardless of how `palette` implements its own `IntoColor`.
//! Rendered colors depend on these exact branches.

use palette::{Hsl, Srgb};

/// Channel spread below which a color is treated as achromatic.
///
/// Also used to break ties between equal maximal channels so that the
/// hue branch never depends on exact float equality.
pub const ACHROMATIC_EPSILON: f32 = 1e-6;

// ============================================================================
// Conversions
// ============================================================================

/// Converts an RGB color with channels in `[0, 1]` to HSL.
///
/// Hue is in degrees on `[0, 360)`; saturation and lightness are in
/// `[0, 1]`. Achromatic inputs (gray, black, white) get a hue and
/// saturation of zero.
pub fn rgb_to_hsl(rgb: Srgb) -> Hsl {
    let (r, g, b) = (rgb.red, rgb.green, rgb.blue);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (max + min) / 2.0;
    let delta = max - min;

    if delta < ACHROMATIC_EPSILON {
        return Hsl::new(0.0_f32, 0.0, lightness);
    }

    let saturation = if lightness > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };

    let sector = match MaxChannel::of(r, g, b) {
        MaxChannel::Red => (g - b) / delta + if g < b { 6.0 } else { 0.0 },
        MaxChannel::Green => (b - r) / delta + 2.0,
        MaxChannel::Blue => (r - g) / delta + 4.0,
    };

    Hsl::new(sector * 60.0, saturation, lightness)
}

/// Converts an HSL color back to RGB with channels in `[0, 1]`.
///
/// The result may overshoot `[0, 1]` by floating-point error; callers
/// quantizing to bytes should clamp (see [`to_rgb8`]).
pub fn hsl_to_rgb(hsl: Hsl) -> Srgb {
    let (s, l) = (hsl.saturation, hsl.lightness);
    if s == 0.0 {
        return Srgb::new(l, l, l);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let h = hsl.hue.into_positive_degrees() / 360.0;

    Srgb::new(
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
    )
}

/// Computes one RGB channel from the `p`/`q` interpolation endpoints and a
/// fractional hue position `t`.
///
/// `t` is wrapped into `[0, 1]` first, then mapped through the four
/// piecewise-linear segments of the HSL color wheel.
pub fn hue_to_channel(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

// ============================================================================
// Byte Helpers
// ============================================================================

/// Normalizes 8-bit channels into `[0, 1]`.
pub fn from_rgb8(r: u8, g: u8, b: u8) -> Srgb {
    Srgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}

/// Quantizes normalized channels to bytes, clamping overshoot and rounding
/// to the nearest integer.
pub fn to_rgb8(rgb: Srgb) -> [u8; 3] {
    [
        channel_to_u8(rgb.red),
        channel_to_u8(rgb.green),
        channel_to_u8(rgb.blue),
    ]
}

fn channel_to_u8(value: f32) -> u8 {
    (value * 255.0).clamp(0.0, 255.0).round() as u8
}

/// Which channel holds the maximum. Ties resolve red, then green, then blue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MaxChannel {
    Red,
    Green,
    Blue,
}

impl MaxChannel {
    fn of(r: f32, g: f32, b: f32) -> Self {
        if r + ACHROMATIC_EPSILON >= g && r + ACHROMATIC_EPSILON >= b {
            Self::Red
        } else if g + ACHROMATIC_EPSILON >= b {
            Self::Green
        } else {
            Self::Blue
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
