//! Serializable conversion profile.
//!
//! A [`ConversionProfile`] captures every knob of a conversion (target
//! sizes, hue band, substitute hue, resampling) in a JSON-friendly form, so
//! runs can be reproduced from a file instead of hard-coded constants.
//!
//! # Example
//!
//! ```
//! use icon_recolor::{ConversionProfile, HueBand};
//!
//! let profile = ConversionProfile::new()
//!     .with_sizes(vec![64, 32, 16])
//!     .with_hue_band(HueBand::new(90.0, 150.0))
//!     .with_substitute_hue(300.0);
//!
//! let json = profile.to_json().unwrap();
//! let restored = ConversionProfile::from_json(&json).unwrap();
//! assert_eq!(restored.sizes, vec![64, 32, 16]);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::container::MAX_EDGE;
use crate::error::{Error, Result};
use crate::remap::{HueBand, HueRemap};
use crate::render::ResizeFilter;

/// Sizes written when none are configured, largest first.
pub const DEFAULT_SIZES: [u32; 7] = [256, 128, 64, 48, 32, 24, 16];

fn default_sizes() -> Vec<u32> {
    DEFAULT_SIZES.to_vec()
}

fn default_substitute_hue() -> f32 {
    HueRemap::ORANGE
}

fn default_true() -> bool {
    true
}

// ============================================================================
// ConversionProfile
// ============================================================================

/// All settings for one conversion.
///
/// # JSON Format
///
/// ```json
/// {
///   "sizes": [256, 128, 64, 48, 32, 24, 16],
///   "hueBand": { "lo": 180.0, "hi": 260.0 },
///   "substituteHue": 30.0,
///   "filter": "lanczos3",
///   "parallel": true
/// }
/// ```
///
/// Missing fields take their defaults, so `{}` is the default profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionProfile {
    /// Target edge lengths, in on-disk entry order.
    #[serde(default = "default_sizes")]
    pub sizes: Vec<u32>,

    /// Hues to replace.
    #[serde(default)]
    pub hue_band: HueBand,

    /// Replacement hue in degrees.
    #[serde(default = "default_substitute_hue")]
    pub substitute_hue: f32,

    /// Resampling filter for resizing.
    #[serde(default)]
    pub filter: ResizeFilter,

    /// Render sizes concurrently.
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for ConversionProfile {
    fn default() -> Self {
        Self {
            sizes: default_sizes(),
            hue_band: HueBand::default(),
            substitute_hue: default_substitute_hue(),
            filter: ResizeFilter::default(),
            parallel: true,
        }
    }
}

impl ConversionProfile {
    /// Creates the default profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the target sizes.
    pub fn with_sizes(mut self, sizes: Vec<u32>) -> Self {
        self.sizes = sizes;
        self
    }

    /// Sets the hue band to replace.
    pub fn with_hue_band(mut self, band: HueBand) -> Self {
        self.hue_band = band;
        self
    }

    /// Sets the substitute hue.
    pub fn with_substitute_hue(mut self, degrees: f32) -> Self {
        self.substitute_hue = degrees;
        self
    }

    /// Sets the resampling filter.
    pub fn with_filter(mut self, filter: ResizeFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Enables or disables concurrent rendering.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The hue remap described by this profile.
    pub fn remap(&self) -> HueRemap {
        HueRemap::new(self.hue_band, self.substitute_hue)
    }

    /// Checks that the profile can produce a valid container.
    pub fn validate(&self) -> Result<()> {
        if self.sizes.is_empty() {
            return Err(Error::InvalidProfile("no target sizes".into()));
        }
        if let Some(&size) = self.sizes.iter().find(|&&s| s == 0 || s > MAX_EDGE) {
            return Err(Error::SizeOverflow { size });
        }
        let HueBand { lo, hi } = self.hue_band;
        if !lo.is_finite() || !hi.is_finite() {
            return Err(Error::InvalidProfile(format!(
                "hue band bounds must be finite (got {lo}..{hi})"
            )));
        }
        if lo > hi {
            return Err(Error::InvalidProfile(format!(
                "hue band lower bound {lo} is above upper bound {hi}"
            )));
        }
        if !self.substitute_hue.is_finite() {
            return Err(Error::InvalidProfile(format!(
                "substitute hue must be finite (got {})",
                self.substitute_hue
            )));
        }
        Ok(())
    }

    /// Serializes the profile to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the profile to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes a profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and validates a profile from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| Error::ProfileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let profile = Self::from_json(&json)?;
        profile.validate()?;
        Ok(profile)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_profile_deserializes_to_defaults() {
        let profile = ConversionProfile::from_json("{}").unwrap();
        assert_eq!(profile, ConversionProfile::default());
        assert_eq!(profile.sizes, DEFAULT_SIZES.to_vec());
        assert_eq!(profile.hue_band, HueBand::new(180.0, 260.0));
        assert_eq!(profile.substitute_hue, 30.0);
        assert!(profile.parallel);
        profile.validate().unwrap();
    }

    #[test]
    fn profile_json_format() {
        let profile = ConversionProfile::new()
            .with_sizes(vec![32, 16])
            .with_filter(ResizeFilter::CatmullRom)
            .with_parallel(false);

        let json = profile.to_json_pretty().unwrap();

        // Verify camelCase / kebab-case serialization
        assert!(json.contains("\"hueBand\""));
        assert!(json.contains("\"substituteHue\""));
        assert!(json.contains("\"catmull-rom\""));

        let restored = ConversionProfile::from_json(&json).unwrap();
        assert_eq!(restored, profile);
    }

    #[test]
    fn partial_profile_keeps_other_defaults() {
        let profile =
            ConversionProfile::from_json(r#"{ "sizes": [48], "substituteHue": 120 }"#).unwrap();
        assert_eq!(profile.sizes, vec![48]);
        assert_eq!(profile.substitute_hue, 120.0);
        assert_eq!(profile.hue_band, HueBand::BLUE);
        assert_eq!(profile.filter, ResizeFilter::Lanczos3);
    }

    #[test]
    fn remap_normalizes_substitute() {
        let remap = ConversionProfile::new().with_substitute_hue(-30.0).remap();
        assert_eq!(remap.substitute, 330.0);
    }

    #[test]
    fn validation_failures() {
        let empty = ConversionProfile::new().with_sizes(Vec::new());
        assert!(matches!(empty.validate(), Err(Error::InvalidProfile(_))));

        let too_big = ConversionProfile::new().with_sizes(vec![16, 512]);
        assert!(matches!(too_big.validate(), Err(Error::SizeOverflow { size: 512 })));

        let zero = ConversionProfile::new().with_sizes(vec![0]);
        assert!(matches!(zero.validate(), Err(Error::SizeOverflow { size: 0 })));

        let inverted = ConversionProfile::new().with_hue_band(HueBand::new(260.0, 180.0));
        assert!(matches!(inverted.validate(), Err(Error::InvalidProfile(_))));

        let nan = ConversionProfile::new().with_substitute_hue(f32::NAN);
        assert!(matches!(nan.validate(), Err(Error::InvalidProfile(_))));

        // 256 uses the zero-byte convention and is allowed.
        ConversionProfile::new().with_sizes(vec![256]).validate().unwrap();
    }

    #[test]
    fn malformed_json_is_a_profile_error() {
        assert!(matches!(
            ConversionProfile::from_json("{ \"sizes\": \"big\" }"),
            Err(Error::Profile(_))
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ConversionProfile::load(Path::new("/no/such/profile.json")).unwrap_err();
        assert!(matches!(err, Error::ProfileRead { .. }));
    }
}
