//! Base print configuration
//!
//! A [`Configuration`] holds the handful of physical parameters every other
//! measurement is derived from. It is an immutable input record: the pipeline
//! copies it into every stage and never mutates it.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::dimensions::DerivedDimensions;
use crate::error::ConfigError;

/// Allowed deviation of the slider/knob clearance from exactly 1mm.
pub const TOLERANCE_EPSILON: f64 = 1e-9;

/// Base print parameters, all in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Configuration {
    /// Diameter of the round magnets pressed into the board
    pub magnet_diameter: f64,
    /// Height of the magnets
    pub magnet_height: f64,
    /// Clearance between moving parts
    pub part_gap_width: f64,
    /// Thinnest wall the printer can reliably produce
    pub min_wall_width: f64,
    /// Depth of embossed or engraved text
    pub text_depth: f64,
    /// Usable print bed width
    pub bed_dimension_x: f64,
    /// Usable print bed depth
    pub bed_dimension_y: f64,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            magnet_diameter: 2.0,
            magnet_height: 1.0,
            part_gap_width: 0.15,
            min_wall_width: 1.5,
            text_depth: 0.5,
            bed_dimension_x: 200.0,
            bed_dimension_y: 200.0,
        }
    }
}

impl Configuration {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style magnet size override
    pub fn with_magnet(mut self, diameter: f64, height: f64) -> Self {
        self.magnet_diameter = diameter;
        self.magnet_height = height;
        self
    }

    /// Builder-style print bed override
    pub fn with_bed(mut self, x: f64, y: f64) -> Self {
        self.bed_dimension_x = x;
        self.bed_dimension_y = y;
        self
    }

    fn fields(&self) -> [(&'static str, f64); 7] {
        [
            ("magnetDiameter", self.magnet_diameter),
            ("magnetHeight", self.magnet_height),
            ("partGapWidth", self.part_gap_width),
            ("minWallWidth", self.min_wall_width),
            ("textDepth", self.text_depth),
            ("bedDimensionX", self.bed_dimension_x),
            ("bedDimensionY", self.bed_dimension_y),
        ]
    }

    /// Validate configuration
    ///
    /// Every field must be a positive finite number and the derived
    /// slider/knob clearance must be exactly one millimeter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in self.fields() {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        let actual = DerivedDimensions::derive(self).slider_knob_clearance();
        if (actual - 1.0).abs() > TOLERANCE_EPSILON {
            return Err(ConfigError::ToleranceViolated { actual });
        }

        Ok(())
    }

    /// Validate, then derive
    pub fn validated_dimensions(&self) -> Result<DerivedDimensions, ConfigError> {
        self.validate()?;
        Ok(DerivedDimensions::derive(self))
    }
}

/// Where the single typeface used for labels and dial digits comes from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FontSource {
    /// A TrueType/OpenType file on disk
    File { path: PathBuf },
    /// A family resolved through the system font database
    System { family: String },
}

impl Default for FontSource {
    fn default() -> Self {
        Self::System {
            family: "Sans".to_string(),
        }
    }
}

impl std::fmt::Display for FontSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File { path } => write!(f, "file {}", path.display()),
            Self::System { family } => write!(f, "system family '{}'", family),
        }
    }
}

/// How finely curved geometry is approximated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tessellation {
    /// Segments around every cylinder
    pub circular_segments: usize,
    /// Maximum deviation when flattening glyph curves, in millimeters
    pub curve_tolerance: f64,
}

impl Default for Tessellation {
    fn default() -> Self {
        Self {
            circular_segments: 32,
            curve_tolerance: 0.1,
        }
    }
}

impl Tessellation {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.circular_segments < 3 {
            return Err(ConfigError::OutOfRange {
                field: "circularSegments",
                reason: format!("need at least 3 segments, got {}", self.circular_segments),
            });
        }
        if !self.curve_tolerance.is_finite() || self.curve_tolerance <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "curveTolerance",
                reason: format!("must be a positive length, got {}", self.curve_tolerance),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Configuration::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_gap() {
        let config = Configuration {
            part_gap_width: 0.0,
            ..Configuration::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "partGapWidth",
                value: 0.0
            })
        );
    }

    #[test]
    fn test_rejects_nan() {
        let config = Configuration::default().with_bed(f64::NAN, 200.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "bedDimensionX",
                ..
            })
        ));
    }

    #[test]
    fn test_tessellation_bounds() {
        assert!(Tessellation::default().validate().is_ok());
        let coarse = Tessellation {
            circular_segments: 2,
            ..Tessellation::default()
        };
        assert!(matches!(
            coarse.validate(),
            Err(ConfigError::OutOfRange {
                field: "circularSegments",
                ..
            })
        ));
    }

    #[test]
    fn test_font_source_display() {
        assert_eq!(FontSource::default().to_string(), "system family 'Sans'");
        let file = FontSource::File {
            path: PathBuf::from("/fonts/droid.ttf"),
        };
        assert_eq!(file.to_string(), "file /fonts/droid.ttf");
    }

    #[test]
    fn test_camel_case_serde() {
        let json = r#"{"magnetDiameter": 3.0, "magnetHeight": 2.0}"#;
        let config: Configuration = serde_json::from_str(json).unwrap();
        assert_eq!(config.magnet_diameter, 3.0);
        assert_eq!(config.magnet_height, 2.0);
        assert_eq!(config.part_gap_width, 0.15);
    }
}
