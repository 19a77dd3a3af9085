//! Layer assembly
//!
//! Turns a [`Layout`] into the printable parts of a board:
//!
//! - `layer1`: base slab with slider channels, dial recesses and magnet pockets
//! - `sliderLayer2` / `dialLayer2`: the moving pieces, one canonical solid each
//! - `layer3`: cap with knob windows, digit windows and labels
//!
//! The three layers only read the layout, so they can be built in parallel.
//! A failing boolean stops its own layer and no other.

pub mod base;
pub mod cap;
pub mod geometry;
pub mod pieces;

use std::fmt;
use std::sync::Arc;

use trackforge_core::{AssetError, GeometryError, Tessellation};

use crate::csg::Solid;
use crate::layout::Layout;
use crate::model::Module;
use crate::text::{GlyphConverter, OutlineSource};

pub use geometry::BoardGeometry;

/// Printable part kinds; also the STL file stems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PartName {
    Layer1,
    SliderLayer2,
    DialLayer2,
    Layer3,
}

impl PartName {
    pub const ALL: [PartName; 4] = [
        PartName::Layer1,
        PartName::SliderLayer2,
        PartName::DialLayer2,
        PartName::Layer3,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PartName::Layer1 => "layer1",
            PartName::SliderLayer2 => "sliderLayer2",
            PartName::DialLayer2 => "dialLayer2",
            PartName::Layer3 => "layer3",
        }
    }
}

impl fmt::Display for PartName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an instance of a canonical solid sits on the board
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    pub dx: f64,
    pub dy: f64,
    /// Turn 90 degrees about Z before translating
    pub quarter_turn: bool,
}

/// A solid tagged with the part it prints as
#[derive(Debug, Clone)]
pub struct NamedSolid {
    /// `None` for helper geometry that is never exported
    pub name: Option<PartName>,
    pub solid: Arc<Solid>,
    pub placement: Placement,
}

impl NamedSolid {
    /// A part already in world coordinates
    pub fn new(name: PartName, solid: Solid) -> Self {
        Self {
            name: Some(name),
            solid: Arc::new(solid),
            placement: Placement::default(),
        }
    }

    /// An instance of a shared canonical solid
    pub fn instance(name: PartName, solid: Arc<Solid>, placement: Placement) -> Self {
        Self {
            name: Some(name),
            solid,
            placement,
        }
    }

    pub fn unnamed(solid: Solid) -> Self {
        Self {
            name: None,
            solid: Arc::new(solid),
            placement: Placement::default(),
        }
    }

    /// The solid moved to its place on the board, for preview
    pub fn placed(&self) -> Solid {
        let turned = if self.placement.quarter_turn {
            self.solid.rotated_z(90.0)
        } else {
            Solid::clone(&self.solid)
        };
        turned.translated(self.placement.dx, self.placement.dy, 0.0)
    }
}

/// Output of one layer
#[derive(Debug, Clone, Default)]
pub struct LayerOutput {
    pub parts: Vec<NamedSolid>,
    pub warnings: Vec<AssetError>,
}

/// Reject a boolean result that is empty or has non-finite vertices
pub(crate) fn check_step(
    layer: &'static str,
    index: usize,
    module: &Module,
    solid: Solid,
) -> Result<Solid, GeometryError> {
    let kind = module.kind();
    if solid.is_empty() {
        tracing::error!("{}: empty result after module {} ({})", layer, index, kind);
        return Err(GeometryError::EmptyResult { layer, index, kind });
    }
    if !solid.is_finite() {
        tracing::error!("{}: non-finite vertex after module {} ({})", layer, index, kind);
        return Err(GeometryError::NonFinite { layer, index, kind });
    }
    Ok(solid)
}

/// Slab covering the layout plus its margin, spanning `z_min..z_max`
pub(crate) fn slab_solid(layout: &Layout, z_min: f64, z_max: f64) -> Solid {
    let slab = layout.slab();
    let (cx, cy) = slab.center().unwrap_or((0.0, 0.0));
    let (wx, wy) = geometry::to_world(cx, cy);
    Solid::slab_piece(slab.width(), slab.height(), z_min, z_max, wx, wy, 0.0)
}

/// Builds the three layers of one layout
pub struct LayerAssembler {
    layout: Arc<Layout>,
    outlines: Arc<dyn OutlineSource>,
    tessellation: Tessellation,
    geometry: BoardGeometry,
}

impl LayerAssembler {
    pub fn new(
        layout: Arc<Layout>,
        outlines: Arc<dyn OutlineSource>,
        tessellation: Tessellation,
    ) -> Self {
        let geometry = BoardGeometry::new(layout.configuration, layout.dimensions);
        Self {
            layout,
            outlines,
            tessellation,
            geometry,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }

    fn converter(&self) -> GlyphConverter<'_> {
        GlyphConverter::new(self.outlines.as_ref(), self.tessellation.curve_tolerance)
    }

    /// Text-bearing modules when no font is loaded
    fn font_warnings(&self, needs_text: impl Fn(&Module) -> bool) -> Vec<AssetError> {
        match self.outlines.failure() {
            Some(err) if self.layout.modules.iter().any(|m| needs_text(&m.module)) => {
                vec![err.clone()]
            }
            _ => Vec::new(),
        }
    }

    pub fn base_layer(&self) -> Result<LayerOutput, GeometryError> {
        let _span = tracing::info_span!("layer", name = base::LAYER_NAME).entered();
        let solid = base::build_base_layer(
            &self.layout,
            &self.geometry,
            self.tessellation.circular_segments,
        )?;
        Ok(LayerOutput {
            parts: vec![NamedSolid::new(PartName::Layer1, solid)],
            warnings: Vec::new(),
        })
    }

    pub fn piece_layer(&self) -> Result<LayerOutput, GeometryError> {
        let _span = tracing::info_span!("layer", name = pieces::LAYER_NAME).entered();
        let parts = pieces::build_piece_layer(
            &self.layout,
            &self.geometry,
            &self.converter(),
            self.tessellation.circular_segments,
        )?;
        Ok(LayerOutput {
            parts,
            warnings: self.font_warnings(|m| matches!(m, Module::Dial(_))),
        })
    }

    pub fn cap_layer(&self) -> Result<LayerOutput, GeometryError> {
        let _span = tracing::info_span!("layer", name = cap::LAYER_NAME).entered();
        let (solid, mut warnings) = cap::build_cap_layer(
            &self.layout,
            &self.geometry,
            &self.converter(),
            self.tessellation.circular_segments,
            self.tessellation.curve_tolerance,
        )?;
        warnings.extend(self.font_warnings(|m| matches!(m, Module::Label(_))));
        Ok(LayerOutput {
            parts: vec![NamedSolid::new(PartName::Layer3, solid)],
            warnings,
        })
    }
}
