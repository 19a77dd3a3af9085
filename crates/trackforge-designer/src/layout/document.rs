//! Layout documents
//!
//! A layout document is the editable description of a board: an ordered list
//! of placement intents, replayed through the [`LayoutEngine`]. Documents are
//! JSON or TOML, picked by file extension.
//!
//! ```toml
//! [[modules]]
//! kind = "slotGrid"
//! ruleset = "pf2e"
//! x = 10
//! y = 90
//!
//! [[modules]]
//! kind = "dial"
//! x = 20
//! y = 20
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use trackforge_core::PlacementError;

use super::grid::{GridError, SlotGrid};
use super::LayoutEngine;
use crate::model::Rotation;

fn default_font_size() -> f64 {
    8.0
}

/// One placement request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LayoutIntent {
    Slider {
        length: u32,
        #[serde(default)]
        rotation: f64,
        x: f64,
        y: f64,
    },
    Dial {
        x: f64,
        y: f64,
    },
    #[serde(rename_all = "camelCase")]
    Label {
        text: String,
        x: f64,
        y: f64,
        #[serde(default)]
        rotation: f64,
        #[serde(default = "default_font_size")]
        font_size: f64,
        #[serde(default)]
        centered: bool,
    },
    #[serde(rename_all = "camelCase")]
    PathLabel {
        text: String,
        x: f64,
        y: f64,
        #[serde(default)]
        rotation: f64,
        #[serde(default = "default_font_size")]
        font_size: f64,
        #[serde(default)]
        centered: bool,
    },
    /// A built-in ruleset by name, or an inline rule table
    SlotGrid {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ruleset: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        grid: Option<SlotGrid>,
        x: f64,
        y: f64,
    },
}

/// Errors loading or replaying a layout document
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("Intent {index}: slot grid needs either 'ruleset' or 'grid'")]
    MissingGrid { index: usize },

    #[error("Unsupported layout format: {0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Ordered placement intents
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutDocument {
    #[serde(default)]
    pub modules: Vec<LayoutIntent>,
}

impl LayoutDocument {
    pub fn load_from_file(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some("toml") => Ok(toml::from_str(&content)?),
            other => Err(DocumentError::UnsupportedFormat(
                other.unwrap_or("missing file extension").to_string(),
            )),
        }
    }

    /// Replay every intent, in order, into `engine`
    pub fn apply(&self, engine: &mut LayoutEngine) -> Result<(), DocumentError> {
        for (index, intent) in self.modules.iter().enumerate() {
            match intent {
                LayoutIntent::Slider {
                    length,
                    rotation,
                    x,
                    y,
                } => {
                    let rotation = Rotation::from_degrees(*rotation).ok_or(
                        PlacementError::UnsupportedRotation {
                            index: engine.modules().len(),
                            degrees: *rotation,
                        },
                    )?;
                    engine.add_slider(*length, rotation, *x, *y);
                }
                LayoutIntent::Dial { x, y } => {
                    engine.add_dial(*x, *y);
                }
                LayoutIntent::Label {
                    text,
                    x,
                    y,
                    rotation,
                    font_size,
                    centered,
                } => {
                    engine.add_label(*rotation, *x, *y, text, *font_size, *centered);
                }
                LayoutIntent::PathLabel {
                    text,
                    x,
                    y,
                    rotation,
                    font_size,
                    centered,
                } => {
                    engine.add_path_label(*rotation, *x, *y, text, *font_size, *centered);
                }
                LayoutIntent::SlotGrid {
                    ruleset,
                    grid,
                    x,
                    y,
                } => {
                    let grid = match (grid, ruleset) {
                        (Some(grid), _) => {
                            grid.validate()?;
                            grid.clone()
                        }
                        (None, Some(name)) => SlotGrid::builtin(name)?,
                        (None, None) => return Err(DocumentError::MissingGrid { index }),
                    };
                    engine.add_slot_grid(&grid, *x, *y);
                }
            }
        }
        Ok(())
    }
}
