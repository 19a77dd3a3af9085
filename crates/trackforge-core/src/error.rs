//! Error handling for Trackforge
//!
//! Errors are grouped by the stage that detects them:
//! - Configuration errors (rejected before layout)
//! - Placement errors (rejected before assembly)
//! - Asset errors (recoverable; callers substitute placeholders)
//! - Geometry errors (fatal to a single layer)
//! - Export errors (mesh encoding and archive writing)
//!
//! All error types use `thiserror`.

use thiserror::Error;

/// Configuration error type
///
/// Raised by [`crate::Configuration::validate`]. Values are never clamped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A base dimension is zero, negative, or not finite
    #[error("{field} must be a positive, finite length in millimeters (got {value})")]
    NonPositive {
        /// The camelCase field name.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A non-dimensional setting outside its accepted range
    #[error("{field} is out of range: {reason}")]
    OutOfRange {
        /// The camelCase field name.
        field: &'static str,
        /// Accepted range description.
        reason: String,
    },

    /// The slider/knob clearance no longer equals exactly one millimeter
    #[error("Derived tolerance violated: sliderRadius*2 - knobWidth = {actual} (expected 1)")]
    ToleranceViolated {
        /// The computed clearance.
        actual: f64,
    },
}

/// Placement error type
///
/// Raised while validating a module list, before any boolean work starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacementError {
    /// The layout holds no modules, so there is nothing to size the slabs from
    #[error("Layout contains no modules")]
    EmptyLayout,

    /// Slider with fewer than two magnet positions
    #[error("Module {index}: slider length {length} is below the minimum of 2")]
    SliderTooShort {
        /// Position of the module in the layout.
        index: usize,
        /// The rejected length.
        length: u32,
    },

    /// Rotation other than 0 or 90 degrees
    #[error("Module {index}: unsupported rotation {degrees} (sliders support 0 and 90 only)")]
    UnsupportedRotation {
        /// Position of the module in the layout.
        index: usize,
        /// The rejected angle in degrees.
        degrees: f64,
    },

    /// A module's cut volume does not touch the base slab at all
    #[error("Module {index} ({kind}) lies entirely outside the base slab")]
    OutsideSlab {
        /// Position of the module in the layout.
        index: usize,
        /// Module variant name.
        kind: &'static str,
    },

    /// Coordinates or sizes that are not finite numbers
    #[error("Module {index} ({kind}): {reason}")]
    InvalidModule {
        /// Position of the module in the layout.
        index: usize,
        /// Module variant name.
        kind: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Asset error type
///
/// These never abort a build; the pipeline records them as warnings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssetError {
    /// The configured typeface could not be located or parsed
    #[error("Font unavailable ({font}): {reason}")]
    FontUnavailable {
        /// Description of the requested font.
        font: String,
        /// Why it could not be loaded.
        reason: String,
    },

    /// A serialized outline path could not be decoded
    #[error("Invalid outline path: {0}")]
    InvalidOutline(String),
}

/// Geometry error type
///
/// Fatal to the layer being built; sibling layers are still produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A boolean step left the layer without any faces
    #[error("{layer}: boolean result is empty after module {index} ({kind})")]
    EmptyResult {
        /// Layer name.
        layer: &'static str,
        /// Position of the offending module in the layout.
        index: usize,
        /// Module variant name.
        kind: &'static str,
    },

    /// A boolean step produced NaN or infinite coordinates
    #[error("{layer}: non-finite vertex after module {index} ({kind})")]
    NonFinite {
        /// Layer name.
        layer: &'static str,
        /// Position of the offending module in the layout.
        index: usize,
        /// Module variant name.
        kind: &'static str,
    },

    /// The worker building the layer stopped before returning a result
    #[error("{layer}: worker failed: {reason}")]
    WorkerFailed {
        /// Layer name.
        layer: &'static str,
        /// Join failure description.
        reason: String,
    },
}

impl GeometryError {
    /// Layer the error belongs to
    pub fn layer(&self) -> &'static str {
        match self {
            GeometryError::EmptyResult { layer, .. }
            | GeometryError::NonFinite { layer, .. }
            | GeometryError::WorkerFailed { layer, .. } => layer,
        }
    }

    /// Module index the error was attributed to, if any
    pub fn module_index(&self) -> Option<usize> {
        match self {
            GeometryError::EmptyResult { index, .. } | GeometryError::NonFinite { index, .. } => {
                Some(*index)
            }
            GeometryError::WorkerFailed { .. } => None,
        }
    }
}

/// Export error type
#[derive(Error, Debug)]
pub enum ExportError {
    /// Nothing to write for a named part
    #[error("Part '{name}' has no triangles to export")]
    EmptySolid {
        /// Part name.
        name: String,
    },

    /// Mesh encoding failed
    #[error("Failed to encode '{name}' as STL: {reason}")]
    Encoding {
        /// Part name.
        name: String,
        /// Encoder message.
        reason: String,
    },

    /// Archive could not be written
    #[error("Archive error: {0}")]
    Archive(String),

    /// I/O failure while writing files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main error type for Trackforge
///
/// A unified error type that can represent any error from all stages.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Placement error
    #[error(transparent)]
    Placement(#[from] PlacementError),

    /// Asset error
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Export error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Errors that are detected before any boolean work starts
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::Config(_) | Error::Placement(_))
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
