//! Wire format for module lists
//!
//! Each module travels as `{ "type": <0..3>, "data": [...], "editorData": {...} }`
//! with positional data:
//!
//! | type | variant   | data                                  |
//! |------|-----------|---------------------------------------|
//! | 0    | Slider    | `[length, rotation, x, y]`            |
//! | 1    | Dial      | `[x, y]`                              |
//! | 2    | Label     | `[rotation, x, y, text, width, height]` |
//! | 3    | PathLabel | `[rotation, x, y, outline]`           |
//!
//! Decoding is lenient the same way the editor is: numeric positions accept
//! numeric strings and text positions accept numbers.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use trackforge_core::PlacementError;

use super::{
    DialModule, EditorSnapshot, LabelModule, Module, PathLabelModule, PlacedModule, Rotation,
    SliderModule,
};

/// One positional value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireValue {
    Number(f64),
    Text(String),
}

impl From<f64> for WireValue {
    fn from(value: f64) -> Self {
        WireValue::Number(value)
    }
}

impl From<&str> for WireValue {
    fn from(value: &str) -> Self {
        WireValue::Text(value.to_string())
    }
}

/// A module as it appears in JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireModule {
    #[serde(rename = "type")]
    pub type_code: u8,
    pub data: Vec<WireValue>,
    #[serde(
        rename = "editorData",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub editor_data: Option<EditorSnapshot>,
}

/// Errors decoding a wire module list
#[derive(Error, Debug)]
pub enum WireError {
    #[error("Module {index}: unknown type code {code}")]
    UnknownType { index: usize, code: u8 },

    #[error("Module {index} ({kind}): expected {expected} data values, found {found}")]
    Arity {
        index: usize,
        kind: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Module {index}: data[{position}] is not a number")]
    ExpectedNumber { index: usize, position: usize },

    #[error("Module {index}: data[{position}] is not a whole non-negative number")]
    ExpectedCount { index: usize, position: usize },

    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

struct Fields<'a> {
    index: usize,
    data: &'a [WireValue],
}

impl Fields<'_> {
    fn expect_len(&self, kind: &'static str, expected: usize) -> Result<(), WireError> {
        if self.data.len() != expected {
            return Err(WireError::Arity {
                index: self.index,
                kind,
                expected,
                found: self.data.len(),
            });
        }
        Ok(())
    }

    fn number(&self, position: usize) -> Result<f64, WireError> {
        let err = WireError::ExpectedNumber {
            index: self.index,
            position,
        };
        match &self.data[position] {
            WireValue::Number(n) => Ok(*n),
            WireValue::Text(s) => s.trim().parse::<f64>().map_err(|_| err),
        }
    }

    fn count(&self, position: usize) -> Result<u32, WireError> {
        let value = self.number(position)?;
        if value.fract() != 0.0 || !(0.0..=f64::from(u32::MAX)).contains(&value) {
            return Err(WireError::ExpectedCount {
                index: self.index,
                position,
            });
        }
        Ok(value as u32)
    }

    fn text(&self, position: usize) -> String {
        match &self.data[position] {
            WireValue::Text(s) => s.clone(),
            WireValue::Number(n) => n.to_string(),
        }
    }
}

impl WireModule {
    pub fn encode(placed: &PlacedModule) -> Self {
        let data = match &placed.module {
            Module::Slider(s) => vec![
                WireValue::Number(f64::from(s.length)),
                WireValue::Number(s.rotation.degrees()),
                WireValue::Number(s.x),
                WireValue::Number(s.y),
            ],
            Module::Dial(d) => vec![WireValue::Number(d.x), WireValue::Number(d.y)],
            Module::Label(l) => vec![
                WireValue::Number(l.rotation),
                WireValue::Number(l.x),
                WireValue::Number(l.y),
                WireValue::Text(l.text.clone()),
                WireValue::Number(l.width),
                WireValue::Number(l.height),
            ],
            Module::PathLabel(p) => vec![
                WireValue::Number(p.rotation),
                WireValue::Number(p.x),
                WireValue::Number(p.y),
                WireValue::Text(p.outline.clone()),
            ],
        };

        Self {
            type_code: placed.module.type_code(),
            data,
            editor_data: placed.editor_data.clone(),
        }
    }

    /// Decode the module found at `index` of a list
    pub fn decode(&self, index: usize) -> Result<PlacedModule, WireError> {
        let f = Fields {
            index,
            data: &self.data,
        };

        let module = match self.type_code {
            0 => {
                f.expect_len("slider", 4)?;
                let degrees = f.number(1)?;
                let rotation = Rotation::from_degrees(degrees)
                    .ok_or(PlacementError::UnsupportedRotation { index, degrees })?;
                Module::Slider(SliderModule {
                    length: f.count(0)?,
                    rotation,
                    x: f.number(2)?,
                    y: f.number(3)?,
                })
            }
            1 => {
                f.expect_len("dial", 2)?;
                Module::Dial(DialModule {
                    x: f.number(0)?,
                    y: f.number(1)?,
                })
            }
            2 => {
                f.expect_len("label", 6)?;
                Module::Label(LabelModule {
                    rotation: f.number(0)?,
                    x: f.number(1)?,
                    y: f.number(2)?,
                    text: f.text(3),
                    width: f.number(4)?,
                    height: f.number(5)?,
                })
            }
            3 => {
                f.expect_len("pathLabel", 4)?;
                Module::PathLabel(PathLabelModule {
                    rotation: f.number(0)?,
                    x: f.number(1)?,
                    y: f.number(2)?,
                    outline: f.text(3),
                })
            }
            code => return Err(WireError::UnknownType { index, code }),
        };

        Ok(PlacedModule {
            module,
            editor_data: self.editor_data.clone(),
        })
    }
}

pub fn encode_modules(modules: &[PlacedModule]) -> Vec<WireModule> {
    modules.iter().map(WireModule::encode).collect()
}

pub fn decode_modules(wire: &[WireModule]) -> Result<Vec<PlacedModule>, WireError> {
    wire.iter()
        .enumerate()
        .map(|(index, module)| module.decode(index))
        .collect()
}

pub fn to_json(modules: &[PlacedModule]) -> Result<String, WireError> {
    Ok(serde_json::to_string_pretty(&encode_modules(modules))?)
}

pub fn from_json(json: &str) -> Result<Vec<PlacedModule>, WireError> {
    let wire: Vec<WireModule> = serde_json::from_str(json)?;
    decode_modules(&wire)
}
