//! # Trackforge Designer
//!
//! Turns a list of tracker-board modules into printable parts.
//!
//! ## Core Components
//!
//! - **Model**: sliders, dials, labels and path labels, plus the positional
//!   wire format module lists are stored in
//! - **Layout**: places modules, tracks the occupied extent and expands slot
//!   grids from rule tables
//! - **Text**: font loading, glyph outlines and planar text solids
//! - **Layers**: base slab, moving pieces and cap, all built from booleans
//! - **Export**: one STL per distinct part plus a print-count manifest
//! - **Pipeline**: runs a whole build and reports its progress
//!
//! ## Architecture
//!
//! ```text
//! Configuration ── DerivedDimensions
//!        │
//! LayoutEngine ── Layout (modules + bounding box)
//!        │
//! LayerAssembler
//!   ├── layer1 (base)
//!   ├── sliderLayer2 / dialLayer2 (pieces)
//!   └── layer3 (cap)
//!        │
//! ExportPackage (STL files + manifest.txt)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use trackforge_designer::{BuildInput, BuildRequest, Pipeline};
//!
//! let request = BuildRequest::new(Configuration::default(), BuildInput::Document(document));
//! let output = Pipeline::new().run(request).await?;
//! output.package.write_to_path(Path::new("tracker.zip"), true)?;
//! for err in &output.layer_errors {
//!     eprintln!("not produced: {err}");
//! }
//! ```

pub mod csg;
pub mod export;
pub mod layers;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod text;

pub use csg::{BooleanOp, Bounds3, Solid};
pub use export::{pack, ExportPackage, TriangleMesh};
pub use layers::{BoardGeometry, LayerAssembler, LayerOutput, NamedSolid, PartName, Placement};
pub use layout::{
    validate_modules, Layout, LayoutDocument, LayoutEngine, LayoutIntent, SlotGrid, SLAB_MARGIN,
};
pub use model::wire::{decode_modules, encode_modules, WireError, WireModule, WireValue};
pub use model::{
    DialModule, EditorSnapshot, LabelModule, Module, PathLabelModule, PlacedModule, Rotation,
    SliderModule,
};
pub use pipeline::{
    BuildError, BuildEvent, BuildInput, BuildOutput, BuildRequest, BuildStage, BuildWarning,
    Pipeline,
};
pub use text::{FontOutlines, GlyphConverter, OutlineSource};
