//! Board measurements in the world frame
//!
//! World frame: millimeters, Z up, `x = layout x`, `y = -layout y`. The three
//! print layers are stacked for preview with their top faces at
//! [`LAYER1_TOP`], [`LAYER2_TOP`] and [`LAYER3_TOP`].

use trackforge_core::{Configuration, DerivedDimensions};

use crate::model::{DialModule, Rotation, SliderModule};

pub const LAYER1_TOP: f64 = 0.0;
pub const LAYER2_TOP: f64 = 3.0;
pub const LAYER3_TOP: f64 = 5.0;

/// Positions on a dial
pub const DIAL_POSITIONS: usize = 10;
/// Angular pitch between dial positions
pub const DIAL_STEP_DEG: f64 = 360.0 / DIAL_POSITIONS as f64;
/// Distance of dial magnet holes from the plate rim, beyond the magnet radius
pub const DIAL_MAGNET_RIM: f64 = 1.5;

/// Layout point to world XY
pub fn to_world(x: f64, y: f64) -> (f64, f64) {
    (x, -y)
}

/// Layout angle (measured from +X toward +Y, clockwise on screen) to a
/// rotation about world Z
pub fn world_angle(layout_deg: f64) -> f64 {
    -layout_deg
}

/// Every measurement the three layers are built from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardGeometry {
    pub config: Configuration,
    pub dims: DerivedDimensions,
}

impl BoardGeometry {
    pub fn new(config: Configuration, dims: DerivedDimensions) -> Self {
        Self { config, dims }
    }

    fn gap(&self) -> f64 {
        self.config.part_gap_width
    }

    fn wall(&self) -> f64 {
        self.config.min_wall_width
    }

    fn text(&self) -> f64 {
        self.config.text_depth
    }

    fn magnet_height(&self) -> f64 {
        self.config.magnet_height
    }

    /// Layer 1 slab thickness
    pub fn base_height(&self) -> f64 {
        self.magnet_height() + 2.0 * (self.gap() + self.wall()) + self.text() + 1.0
    }

    /// Depth of slider channels and dial recesses, measured down from one
    /// above the base top
    pub fn base_cut_height(&self) -> f64 {
        self.gap() + self.wall() + self.text() + self.magnet_height() + 1.0
    }

    /// Bottom of channel and recess cutters
    pub fn base_cut_bottom(&self) -> f64 {
        LAYER1_TOP + 1.0 - self.base_cut_height()
    }

    /// Radius of a magnet pocket (magnet plus clearance)
    pub fn magnet_pocket_radius(&self) -> f64 {
        self.config.magnet_diameter / 2.0 + self.gap()
    }

    /// Height of magnet pocket cutters
    pub fn magnet_pocket_height(&self) -> f64 {
        self.magnet_height() + self.gap() + 1.0
    }

    /// Z range of the magnet pockets sunk below the channel floor
    pub fn base_magnet_z(&self) -> (f64, f64) {
        let top = self.base_cut_bottom() + 1.0;
        (top - self.magnet_pocket_height(), top)
    }

    /// Channel width across the travel direction
    pub fn channel_width(&self) -> f64 {
        self.dims.slider_radius * 2.0 + 2.0 + 2.0 * self.gap()
    }

    /// Channel length along the travel direction
    pub fn channel_length(&self, length: u32) -> f64 {
        f64::from(length) * self.dims.segment_length + 2.0
    }

    /// Thickness of slider pieces and dial plates
    pub fn piece_height(&self) -> f64 {
        self.wall() + self.text() + self.magnet_height()
    }

    pub fn piece_bottom(&self) -> f64 {
        LAYER2_TOP - self.piece_height()
    }

    /// Z range of the magnet hole in a piece's underside
    pub fn piece_magnet_z(&self) -> (f64, f64) {
        let bottom = LAYER2_TOP - 1.0 - self.piece_height();
        (bottom, bottom + self.magnet_pocket_height())
    }

    /// Slider piece footprint: across, along
    pub fn slider_piece_size(&self) -> (f64, f64) {
        (
            self.dims.slider_radius * 2.0 + 2.0,
            self.dims.segment_length + 2.0,
        )
    }

    pub fn knob_radius(&self) -> f64 {
        self.dims.knob_width / 2.0
    }

    /// Knob radius plus clearance, for holes the knob passes through
    pub fn knob_clearance_radius(&self) -> f64 {
        self.knob_radius() + self.gap()
    }

    pub fn plate_radius(&self) -> f64 {
        self.dims.plate_width / 2.0
    }

    /// Distance of dial magnets from the dial center
    pub fn dial_magnet_radius(&self) -> f64 {
        self.plate_radius() - (DIAL_MAGNET_RIM + self.config.magnet_diameter / 2.0)
    }

    /// Radial window size for a dial digit: across, along the radius
    pub fn digit_window(&self) -> (f64, f64) {
        (self.dims.knob_width + 1.0, self.dims.knob_width + 3.0)
    }

    /// Distance of a digit window's center from the dial center
    pub fn digit_window_radius(&self) -> f64 {
        self.dims.knob_width + self.digit_window().1 / 2.0
    }

    /// Radius the digit glyphs are anchored at
    pub fn digit_text_radius(&self) -> f64 {
        self.plate_radius() - 3.0 * self.dims.knob_width / 4.0
    }

    /// Layer 3 slab thickness
    pub fn cap_height(&self) -> f64 {
        self.wall() + self.text()
    }

    /// Z range of cutters through the cap
    pub fn cap_cut_z(&self) -> (f64, f64) {
        (LAYER3_TOP - self.cap_height() - 1.0, LAYER3_TOP + 1.0)
    }

    /// Slider channel center in layout coordinates
    pub fn channel_center(&self, slider: &SliderModule) -> (f64, f64) {
        let across = self.channel_width() / 2.0;
        let along = self.channel_length(slider.length) / 2.0;
        match slider.rotation {
            Rotation::Vertical => (slider.x + across, slider.y + along),
            Rotation::Horizontal => (slider.x + along, slider.y + across),
        }
    }

    /// Layout centers of a slider's magnet positions, first to last
    pub fn magnet_positions(&self, slider: &SliderModule) -> Vec<(f64, f64)> {
        let across = self.channel_width() / 2.0;
        let seg = self.dims.segment_length;
        (0..slider.length)
            .map(|i| {
                let along = 1.0 + seg / 2.0 + f64::from(i) * seg;
                match slider.rotation {
                    Rotation::Vertical => (slider.x + across, slider.y + along),
                    Rotation::Horizontal => (slider.x + along, slider.y + across),
                }
            })
            .collect()
    }

    /// Dial center in layout coordinates, shared by all three layers
    pub fn dial_center(&self, dial: &DialModule) -> (f64, f64) {
        let r = self.plate_radius() + self.gap();
        (dial.x + r, dial.y + r)
    }

    /// Layout angle of dial position `i` (0-based), in degrees
    pub fn dial_angle(i: usize) -> f64 {
        DIAL_STEP_DEG * (i as f64 + 1.0) + 90.0
    }

    /// Layout point at `radius` from `center` along layout angle `deg`
    pub fn polar(center: (f64, f64), radius: f64, deg: f64) -> (f64, f64) {
        let (sin, cos) = deg.to_radians().sin_cos();
        (center.0 + radius * cos, center.1 + radius * sin)
    }
}
