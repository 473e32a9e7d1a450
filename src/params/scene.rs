//! Shape generation parameters.

use std::ops::RangeInclusive;

use crate::error::{Result, WallError};

/// Parameters for generating the floating shape set
#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// Number of shapes generated per canvas
    pub shape_count: usize,

    /// Inset from every canvas edge for base positions (pixels)
    pub margin_px: f32,

    /// Base size range (pixels)
    pub size_px: RangeInclusive<f32>,

    /// Float velocity range (radians per second)
    pub velocity: RangeInclusive<f32>,

    /// Extra float radius range added to the 8px minimum drift (pixels)
    pub float_offset_px: RangeInclusive<f32>,

    /// RNG seed for reproducible scenes (None = entropy)
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            shape_count: 30,
            margin_px: 40.0,
            size_px: 38.0..=66.0,
            velocity: 0.4..=1.2,
            float_offset_px: 0.0..=10.0,
            seed: None,
        }
    }
}

impl SceneConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, range) in [
            ("size_px", &self.size_px),
            ("velocity", &self.velocity),
            ("float_offset_px", &self.float_offset_px),
        ] {
            if range.start() > range.end() || !range.start().is_finite() || !range.end().is_finite()
            {
                return Err(WallError::InvalidConfig(format!(
                    "{} range is invalid: {:?}",
                    name, range
                )));
            }
        }
        if self.margin_px < 0.0 {
            return Err(WallError::InvalidConfig(format!(
                "margin must be >= 0, got {}",
                self.margin_px
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SceneConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let config = SceneConfig {
            size_px: 66.0..=38.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
