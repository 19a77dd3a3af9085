//! Placed modules
//!
//! A tracker board is a flat list of modules on the working surface. Layout
//! coordinates are millimeters with Y growing downward; the layer assembler
//! maps them into the Z-up world frame.

pub mod wire;

use serde::{Deserialize, Serialize};
use trackforge_core::{BoundingBox, Configuration, DerivedDimensions};

pub use wire::{WireError, WireModule, WireValue};

/// Orientation of a slider track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    /// Travel along layout Y (0 degrees)
    #[default]
    Vertical,
    /// Travel along layout X (90 degrees)
    Horizontal,
}

impl Rotation {
    pub fn from_degrees(degrees: f64) -> Option<Self> {
        if degrees == 0.0 {
            Some(Self::Vertical)
        } else if degrees == 90.0 {
            Some(Self::Horizontal)
        } else {
            None
        }
    }

    pub fn degrees(self) -> f64 {
        match self {
            Self::Vertical => 0.0,
            Self::Horizontal => 90.0,
        }
    }

    pub fn is_quarter_turn(self) -> bool {
        self == Self::Horizontal
    }
}

/// Linear track with `length` magnet positions
#[derive(Debug, Clone, PartialEq)]
pub struct SliderModule {
    pub length: u32,
    pub rotation: Rotation,
    pub x: f64,
    pub y: f64,
}

/// Ten-position rotary counter anchored at its top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct DialModule {
    pub x: f64,
    pub y: f64,
}

/// Embossed text stretched to an exact width and height
///
/// The anchor is the left end of the baseline; `rotation` turns the text
/// clockwise on the layout, in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelModule {
    pub rotation: f64,
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub width: f64,
    pub height: f64,
}

/// Free-form vector outline in absolute layout coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct PathLabelModule {
    pub rotation: f64,
    pub x: f64,
    pub y: f64,
    /// SVG path data (`M`, `L`, `C`, `Q`, `Z` and friends)
    pub outline: String,
}

/// The four module variants
#[derive(Debug, Clone, PartialEq)]
pub enum Module {
    Slider(SliderModule),
    Dial(DialModule),
    Label(LabelModule),
    PathLabel(PathLabelModule),
}

impl Module {
    /// Numeric tag used on the wire
    pub fn type_code(&self) -> u8 {
        match self {
            Module::Slider(_) => 0,
            Module::Dial(_) => 1,
            Module::Label(_) => 2,
            Module::PathLabel(_) => 3,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Module::Slider(_) => "slider",
            Module::Dial(_) => "dial",
            Module::Label(_) => "label",
            Module::PathLabel(_) => "pathLabel",
        }
    }

    /// Anchor point in layout coordinates
    pub fn anchor(&self) -> (f64, f64) {
        match self {
            Module::Slider(s) => (s.x, s.y),
            Module::Dial(d) => (d.x, d.y),
            Module::Label(l) => (l.x, l.y),
            Module::PathLabel(p) => (p.x, p.y),
        }
    }
}

/// Editor state captured when a module was placed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSnapshot {
    #[serde(flatten)]
    pub configuration: Configuration,
    #[serde(rename = "derivedVals")]
    pub derived: DerivedDimensions,
    pub bounding_box: BoundingBox,
}

/// A module plus the editor snapshot taken when it was placed
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedModule {
    pub module: Module,
    pub editor_data: Option<EditorSnapshot>,
}

impl PlacedModule {
    pub fn new(module: Module) -> Self {
        Self {
            module,
            editor_data: None,
        }
    }

    pub fn with_snapshot(module: Module, snapshot: EditorSnapshot) -> Self {
        Self {
            module,
            editor_data: Some(snapshot),
        }
    }
}

impl From<Module> for PlacedModule {
    fn from(module: Module) -> Self {
        Self::new(module)
    }
}
