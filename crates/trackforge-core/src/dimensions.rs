//! Derived manufacturing dimensions
//!
//! Every measurement the layout engine and layer assembler need is a pure
//! function of the base [`Configuration`]. The formulas keep a fixed 1mm
//! clearance between the slider track and the knob riding in it.

use serde::{Deserialize, Serialize};

use crate::config::Configuration;

/// Extra radius around the magnet pocket of a slider track.
pub const SLIDER_RADIUS_MARGIN: f64 = 2.5;
/// Extra length around one magnet position along a track.
pub const SEGMENT_MARGIN: f64 = 4.0;
/// Dial plate diameter in knob widths.
pub const PLATE_KNOB_RATIO: f64 = 6.0;
/// Padding around a dial in the editor view.
pub const DIAL_VIEW_PADDING: f64 = 4.0;
/// Padding across a slider in the editor view.
pub const SLIDER_VIEW_WIDTH_PADDING: f64 = 0.6;
/// Padding along a slider in the editor view.
pub const SLIDER_VIEW_LENGTH_PADDING: f64 = 1.6;

/// Measurements computed from a [`Configuration`], in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedDimensions {
    /// Half-width of a slider track
    pub slider_radius: f64,
    /// Pitch between magnet positions along a slider
    pub segment_length: f64,
    /// Diameter of the knob on sliders and dials
    pub knob_width: f64,
    /// Diameter of a dial plate
    pub plate_width: f64,
    /// Total height of a dial plate
    pub plate_height: f64,
    /// Side of the square a dial occupies in the layout
    pub dial_view_box: f64,
    /// Width a slider occupies in the layout
    pub slider_width_view_box: f64,
    /// Added to `length * segment_length` for a slider's layout extent
    pub slider_length_view_box_add: f64,
}

impl DerivedDimensions {
    /// Derive all dimensions. Total for positive inputs; does not validate.
    pub fn derive(config: &Configuration) -> Self {
        let gap = config.part_gap_width;
        let slider_radius = config.magnet_diameter / 2.0 + gap + SLIDER_RADIUS_MARGIN;
        let segment_length = config.magnet_diameter + 2.0 * gap + SEGMENT_MARGIN;
        let knob_width = config.magnet_diameter + 2.0 * gap + SEGMENT_MARGIN;
        let plate_width = PLATE_KNOB_RATIO * knob_width;

        Self {
            slider_radius,
            segment_length,
            knob_width,
            plate_width,
            plate_height: config.magnet_diameter + config.min_wall_width + config.text_depth,
            dial_view_box: plate_width + DIAL_VIEW_PADDING,
            slider_width_view_box: slider_radius * 2.0 + SLIDER_VIEW_WIDTH_PADDING,
            slider_length_view_box_add: SLIDER_VIEW_LENGTH_PADDING,
        }
    }

    /// `sliderRadius*2 - knobWidth`; exactly 1 for any valid configuration
    pub fn slider_knob_clearance(&self) -> f64 {
        self.slider_radius * 2.0 - self.knob_width
    }

    /// Layout extent of a slider with `length` positions, along its travel
    pub fn slider_view_length(&self, length: u32) -> f64 {
        f64::from(length) * self.segment_length + self.slider_length_view_box_add
    }
}
