//! Layout engine
//!
//! Places modules on the working surface, keeps the running bounding box and
//! snapshots editor state into every module. The finished [`Layout`] is the
//! read-only input of the layer assembler.

pub mod document;
pub mod extent;
pub mod grid;
pub mod transform;

use std::ops::Range;
use std::sync::Arc;

use trackforge_core::{
    AssetError, BoundingBox, ConfigError, Configuration, DerivedDimensions, PlacementError,
};

use crate::model::{
    DialModule, EditorSnapshot, LabelModule, Module, PathLabelModule, PlacedModule, Rotation,
    SliderModule,
};
use crate::text::{to_svg_path, OutlineSource};

pub use document::{LayoutDocument, LayoutIntent};
pub use extent::module_extent;
pub use grid::{GridError, GridPlan, SlotGrid};
pub use transform::{parse_transform, SvgTransform};

/// Margin the base slab extends beyond the layout on every side
pub const SLAB_MARGIN: f64 = 20.0;

/// Default flattening tolerance for measuring outlines
pub const DEFAULT_TOLERANCE: f64 = 0.1;

/// A finished module list with the settings it was laid out under
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub configuration: Configuration,
    pub dimensions: DerivedDimensions,
    pub bounding_box: BoundingBox,
    pub modules: Vec<PlacedModule>,
}

impl Layout {
    /// Adopt a module list produced elsewhere (for example decoded from the
    /// wire). The bounding box comes from the last module's editor snapshot
    /// when there is one, and is recomputed from module extents otherwise.
    pub fn from_modules(
        configuration: Configuration,
        modules: Vec<PlacedModule>,
        tolerance: f64,
    ) -> Result<Self, ConfigError> {
        let dimensions = configuration.validated_dimensions()?;

        let bounding_box = match modules.last().and_then(|m| m.editor_data.as_ref()) {
            Some(snapshot) if !snapshot.bounding_box.is_empty() => snapshot.bounding_box,
            _ => {
                let mut bbox = BoundingBox::new();
                for placed in &modules {
                    let e = module_extent(&placed.module, &dimensions, tolerance);
                    bbox.check_extremes(e.min_x, e.min_y, e.max_x, e.max_y);
                }
                bbox
            }
        };

        Ok(Self {
            configuration,
            dimensions,
            bounding_box,
            modules,
        })
    }

    /// Footprint of the base slab in layout coordinates
    pub fn slab(&self) -> BoundingBox {
        self.bounding_box.expanded(SLAB_MARGIN)
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

fn finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// Reject layouts the layer assembler cannot build
pub fn validate_modules(layout: &Layout, tolerance: f64) -> Result<(), PlacementError> {
    if layout.modules.is_empty() || layout.bounding_box.is_empty() {
        return Err(PlacementError::EmptyLayout);
    }

    let slab = layout.slab();
    for (index, placed) in layout.modules.iter().enumerate() {
        let module = &placed.module;
        let kind = module.kind();
        let invalid = |reason: &str| PlacementError::InvalidModule {
            index,
            kind,
            reason: reason.to_string(),
        };

        let (x, y) = module.anchor();
        if !finite(&[x, y]) {
            return Err(invalid("anchor is not a finite coordinate"));
        }

        match module {
            Module::Slider(s) => {
                if s.length < 2 {
                    return Err(PlacementError::SliderTooShort {
                        index,
                        length: s.length,
                    });
                }
            }
            Module::Dial(_) => {}
            Module::Label(l) => {
                if !finite(&[l.rotation, l.width, l.height]) {
                    return Err(invalid("rotation and size must be finite"));
                }
                if l.width < 0.0 || l.height < 0.0 {
                    return Err(invalid("size must not be negative"));
                }
            }
            Module::PathLabel(p) => {
                if !p.rotation.is_finite() {
                    return Err(invalid("rotation must be finite"));
                }
            }
        }

        let footprint = module_extent(module, &layout.dimensions, tolerance);
        if !slab.intersects(&footprint) {
            return Err(PlacementError::OutsideSlab { index, kind });
        }
    }

    Ok(())
}

/// Places modules and tracks the layout extent
pub struct LayoutEngine {
    configuration: Configuration,
    dimensions: DerivedDimensions,
    bounding_box: BoundingBox,
    modules: Vec<PlacedModule>,
    outlines: Arc<dyn OutlineSource>,
    tolerance: f64,
    warnings: Vec<AssetError>,
}

impl LayoutEngine {
    pub fn new(
        configuration: Configuration,
        outlines: Arc<dyn OutlineSource>,
    ) -> Result<Self, ConfigError> {
        let dimensions = configuration.validated_dimensions()?;
        Ok(Self {
            configuration,
            dimensions,
            bounding_box: BoundingBox::new(),
            modules: Vec::new(),
            outlines,
            tolerance: DEFAULT_TOLERANCE,
            warnings: Vec::new(),
        })
    }

    /// Flattening tolerance used when measuring text
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn dimensions(&self) -> &DerivedDimensions {
        &self.dimensions
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    pub fn modules(&self) -> &[PlacedModule] {
        &self.modules
    }

    /// Font problems hit while placing text, one entry per distinct failure
    pub fn warnings(&self) -> &[AssetError] {
        &self.warnings
    }

    fn place(&mut self, module: Module) -> usize {
        let e = module_extent(&module, &self.dimensions, self.tolerance);
        self.bounding_box
            .check_extremes(e.min_x, e.min_y, e.max_x, e.max_y);

        let snapshot = EditorSnapshot {
            configuration: self.configuration,
            derived: self.dimensions,
            bounding_box: self.bounding_box,
        };
        tracing::trace!("Placed {} at {:?}", module.kind(), module.anchor());
        self.modules
            .push(PlacedModule::with_snapshot(module, snapshot));
        self.modules.len() - 1
    }

    fn note_missing_font(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        if let Some(err) = self.outlines.failure() {
            if !self.warnings.contains(err) {
                tracing::warn!("Text '{}' has no outline: {}", text, err);
                self.warnings.push(err.clone());
            }
        }
    }

    pub fn add_slider(&mut self, length: u32, rotation: Rotation, x: f64, y: f64) -> usize {
        self.place(Module::Slider(SliderModule {
            length,
            rotation,
            x,
            y,
        }))
    }

    pub fn add_dial(&mut self, x: f64, y: f64) -> usize {
        self.place(Module::Dial(DialModule { x, y }))
    }

    /// Label sized to the measured text. `centered` drops the baseline by a
    /// third of the text height so the glyphs straddle `y`.
    pub fn add_label(
        &mut self,
        rotation: f64,
        x: f64,
        y: f64,
        text: &str,
        font_size: f64,
        centered: bool,
    ) -> usize {
        let extent = self.outlines.measure(text, font_size, self.tolerance);
        if extent.is_zero() {
            self.note_missing_font(text);
        }
        let baseline = if centered { y + extent.height() / 3.0 } else { y };
        self.place(Module::Label(LabelModule {
            rotation,
            x,
            y: baseline,
            text: text.to_string(),
            width: extent.width(),
            height: extent.height(),
        }))
    }

    /// Text converted to an outline path at placement time. `centered` drops
    /// the baseline by half the text height.
    pub fn add_path_label(
        &mut self,
        rotation: f64,
        x: f64,
        y: f64,
        text: &str,
        font_size: f64,
        centered: bool,
    ) -> usize {
        let extent = self.outlines.measure(text, font_size, self.tolerance);
        let baseline = if centered { y + extent.height() / 2.0 } else { y };
        let path = self.outlines.outline(text, x, baseline, font_size);
        if path.iter().next().is_none() {
            self.note_missing_font(text);
        }
        self.place(Module::PathLabel(PathLabelModule {
            rotation,
            x,
            y: baseline,
            outline: to_svg_path(&path),
        }))
    }

    /// Expand a slot grid at `(tx, ty)`; returns the indices it occupies
    pub fn add_slot_grid(&mut self, grid: &SlotGrid, tx: f64, ty: f64) -> Range<usize> {
        let plan = GridPlan::new(grid, &self.configuration, &self.dimensions, tx, ty);
        let start = self.modules.len();

        for ((length, x, y), header) in plan.sliders.iter().zip(&plan.headers) {
            self.add_slider(*length, Rotation::Vertical, *x, *y);
            self.add_path_label(0.0, header.x, header.y, &header.text, header.size, header.centered);
        }
        for mark in plan.ruler.iter().chain(std::iter::once(&plan.title)) {
            self.add_path_label(0.0, mark.x, mark.y, &mark.text, mark.size, mark.centered);
        }

        tracing::debug!(
            "Slot grid '{}' placed {} modules",
            grid.title,
            self.modules.len() - start
        );
        start..self.modules.len()
    }

    /// Finish placing and hand over the layout plus collected warnings
    pub fn finish(self) -> (Layout, Vec<AssetError>) {
        (
            Layout {
                configuration: self.configuration,
                dimensions: self.dimensions,
                bounding_box: self.bounding_box,
                modules: self.modules,
            },
            self.warnings,
        )
    }
}
