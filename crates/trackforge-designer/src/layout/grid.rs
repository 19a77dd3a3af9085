//! Procedural slot grids
//!
//! A slot grid is a row of vertical sliders, one per column, bottom-aligned so
//! every column's zero position sits on the same line. Each column gets a
//! header label, a ruler of position numbers runs down the left side, and a
//! title sits above the grid.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use trackforge_core::{Configuration, DerivedDimensions};

/// Font size of column headers and the title
pub const HEADER_FONT_SIZE: f64 = 8.0;
/// Font size of the ruler numbers
pub const RULER_FONT_SIZE: f64 = 4.0;
/// Header baseline distance above the grid origin
pub const HEADER_OFFSET: f64 = 2.0;
/// Ruler distance left of the grid origin
pub const RULER_OFFSET: f64 = 5.0;
/// Title offset from the grid origin
pub const TITLE_OFFSET: (f64, f64) = (30.0, -12.0);

const RULER_BASELINE_NUDGE: f64 = 0.4;

/// Errors loading or validating a rule table
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Grid '{title}' has {labels} labels but {slots} slot counts")]
    LengthMismatch {
        title: String,
        labels: usize,
        slots: usize,
    },

    #[error("Grid '{0}' has no columns")]
    Empty(String),

    #[error("Unknown ruleset '{0}'")]
    UnknownRuleset(String),

    #[error("Unsupported grid file format: {0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Rule table driving a slot grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotGrid {
    pub title: String,
    pub labels: Vec<String>,
    pub max_slots: Vec<u32>,
}

/// Names accepted by [`SlotGrid::builtin`]
pub const BUILTIN_RULESETS: [&str; 2] = ["pf2e", "dnd5e"];

impl SlotGrid {
    pub fn new(
        title: impl Into<String>,
        labels: Vec<String>,
        max_slots: Vec<u32>,
    ) -> Result<Self, GridError> {
        let grid = Self {
            title: title.into(),
            labels,
            max_slots,
        };
        grid.validate()?;
        Ok(grid)
    }

    pub fn validate(&self) -> Result<(), GridError> {
        if self.labels.len() != self.max_slots.len() {
            return Err(GridError::LengthMismatch {
                title: self.title.clone(),
                labels: self.labels.len(),
                slots: self.max_slots.len(),
            });
        }
        if self.labels.is_empty() {
            return Err(GridError::Empty(self.title.clone()));
        }
        Ok(())
    }

    /// Pathfinder 2e spell slots: cantrips plus ranks 1 through 10
    pub fn pathfinder_2e() -> Self {
        let labels = std::iter::once("C".to_string())
            .chain((1..=10).map(|rank| rank.to_string()))
            .collect();
        Self {
            title: "Spell Slots".to_string(),
            labels,
            max_slots: vec![5, 4, 4, 4, 4, 4, 4, 4, 4, 4, 2],
        }
    }

    /// D&D 5e spell slots: levels 1 through 9
    pub fn dnd_5e() -> Self {
        Self {
            title: "Spell Slots".to_string(),
            labels: (1..=9).map(|level| level.to_string()).collect(),
            max_slots: vec![4, 3, 3, 3, 3, 2, 2, 1, 1],
        }
    }

    pub fn builtin(name: &str) -> Result<Self, GridError> {
        match name.to_ascii_lowercase().as_str() {
            "pf2e" | "pathfinder2e" => Ok(Self::pathfinder_2e()),
            "dnd5e" | "5e" => Ok(Self::dnd_5e()),
            _ => Err(GridError::UnknownRuleset(name.to_string())),
        }
    }

    /// Load a rule table from a JSON or TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, GridError> {
        let content = std::fs::read_to_string(path)?;
        let grid: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(GridError::UnsupportedFormat(
                    other.unwrap_or("missing file extension").to_string(),
                ))
            }
        };
        grid.validate()?;
        Ok(grid)
    }

    pub fn largest_slot_number(&self) -> u32 {
        self.max_slots.iter().copied().max().unwrap_or(0)
    }
}

/// Text the grid places, as path labels
#[derive(Debug, Clone, PartialEq)]
pub struct GridText {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    /// Shift the baseline down by half the text height
    pub centered: bool,
}

/// Every placement a grid expands to, in insertion order
#[derive(Debug, Clone, PartialEq)]
pub struct GridPlan {
    /// `(length, x, y)` of each column's slider
    pub sliders: Vec<(u32, f64, f64)>,
    pub headers: Vec<GridText>,
    pub ruler: Vec<GridText>,
    pub title: GridText,
}

impl GridPlan {
    /// Expand `grid` with its origin at `(tx, ty)`
    pub fn new(
        grid: &SlotGrid,
        config: &Configuration,
        dims: &DerivedDimensions,
        tx: f64,
        ty: f64,
    ) -> Self {
        let column_pitch = dims.slider_radius * 2.0
            + 2.0
            + 2.0 * config.part_gap_width
            + config.min_wall_width;
        let largest = grid.largest_slot_number();

        let mut sliders = Vec::with_capacity(grid.labels.len());
        let mut headers = Vec::with_capacity(grid.labels.len());
        for (i, (label, slots)) in grid.labels.iter().zip(&grid.max_slots).enumerate() {
            let x = tx + i as f64 * column_pitch;
            sliders.push((
                slots + 1,
                x,
                ty + dims.segment_length * f64::from(largest - slots),
            ));
            headers.push(GridText {
                text: label.clone(),
                x,
                y: ty - HEADER_OFFSET,
                size: HEADER_FONT_SIZE,
                centered: false,
            });
        }

        let ruler_start = ty + dims.slider_radius + RULER_BASELINE_NUDGE;
        let ruler = (0..=largest)
            .rev()
            .map(|n| GridText {
                text: n.to_string(),
                x: tx - RULER_OFFSET,
                y: ruler_start + f64::from(largest - n) * dims.segment_length,
                size: RULER_FONT_SIZE,
                centered: true,
            })
            .collect();

        let title = GridText {
            text: grid.title.clone(),
            x: tx + TITLE_OFFSET.0,
            y: ty + TITLE_OFFSET.1,
            size: HEADER_FONT_SIZE,
            centered: false,
        };

        Self {
            sliders,
            headers,
            ruler,
            title,
        }
    }
}
