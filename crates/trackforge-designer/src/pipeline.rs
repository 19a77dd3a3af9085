//! Board build pipeline
//!
//! Runs one build from configuration and layout input to an export package:
//!
//! `Idle -> DerivingDimensions -> LayingOutModules -> BuildingLayer1 ->
//! BuildingLayer2 -> BuildingLayer3 -> Packaging -> Done`
//!
//! or `Failed`. The three layers are built on the blocking pool at the same
//! time; their stages are entered in order as the workers are started.
//! Progress is reported over an unbounded channel when a subscriber exists.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use trackforge_core::{
    AssetError, ConfigError, Configuration, ExportError, FontSource, GeometryError,
    PlacementError, Tessellation,
};

use crate::export::{pack, ExportPackage};
use crate::layers::{base, cap, pieces, LayerAssembler, LayerOutput, NamedSolid};
use crate::layout::document::DocumentError;
use crate::layout::{validate_modules, Layout, LayoutDocument, LayoutEngine};
use crate::model::wire::{decode_modules, WireError, WireModule};
use crate::model::PlacedModule;
use crate::text::{FontOutlines, OutlineSource};

/// Pipeline state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    Idle,
    DerivingDimensions,
    LayingOutModules,
    BuildingLayer1,
    BuildingLayer2,
    BuildingLayer3,
    Packaging,
    Done,
    Failed,
}

impl BuildStage {
    pub fn is_terminal(self) -> bool {
        matches!(self, BuildStage::Done | BuildStage::Failed)
    }
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildStage::Idle => "idle",
            BuildStage::DerivingDimensions => "deriving dimensions",
            BuildStage::LayingOutModules => "laying out modules",
            BuildStage::BuildingLayer1 => "building layer 1",
            BuildStage::BuildingLayer2 => "building layer 2",
            BuildStage::BuildingLayer3 => "building layer 3",
            BuildStage::Packaging => "packaging",
            BuildStage::Done => "done",
            BuildStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Problems that do not stop a build
#[derive(Debug, Clone, PartialEq)]
pub enum BuildWarning {
    Asset(AssetError),
    /// The slab does not fit on the configured print bed
    ExceedsBed {
        width: f64,
        height: f64,
        bed_x: f64,
        bed_y: f64,
    },
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildWarning::Asset(e) => write!(f, "{}", e),
            BuildWarning::ExceedsBed {
                width,
                height,
                bed_x,
                bed_y,
            } => write!(
                f,
                "Board is {:.1} x {:.1} mm but the bed is {:.1} x {:.1} mm",
                width, height, bed_x, bed_y
            ),
        }
    }
}

/// Progress notifications
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    Stage(BuildStage),
    Warning(BuildWarning),
    LayerFinished { layer: &'static str, ok: bool },
}

/// Errors that stop a build before any layer is produced
#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Where the module list comes from
#[derive(Debug, Clone)]
pub enum BuildInput {
    /// Placement intents, laid out by the engine
    Document(LayoutDocument),
    /// A serialized module list
    Wire(Vec<WireModule>),
    /// Modules already placed
    Modules(Vec<PlacedModule>),
}

#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub configuration: Configuration,
    pub font: FontSource,
    pub tessellation: Tessellation,
    pub input: BuildInput,
}

impl BuildRequest {
    pub fn new(configuration: Configuration, input: BuildInput) -> Self {
        Self {
            configuration,
            font: FontSource::default(),
            tessellation: Tessellation::default(),
            input,
        }
    }

    pub fn with_font(mut self, font: FontSource) -> Self {
        self.font = font;
        self
    }

    pub fn with_tessellation(mut self, tessellation: Tessellation) -> Self {
        self.tessellation = tessellation;
        self
    }
}

/// Result of a build that got past validation
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub layout: Arc<Layout>,
    /// Parts of every layer that built
    pub parts: Vec<NamedSolid>,
    /// Parts of the layers that built; failed layers are listed as missing
    pub package: ExportPackage,
    pub layer_errors: Vec<GeometryError>,
    pub warnings: Vec<BuildWarning>,
    /// Stages entered, in order
    pub stages: Vec<BuildStage>,
}

impl BuildOutput {
    pub fn is_complete(&self) -> bool {
        self.layer_errors.is_empty()
    }

    pub fn final_stage(&self) -> BuildStage {
        self.stages.last().copied().unwrap_or(BuildStage::Idle)
    }
}

/// Runs builds and reports their progress
pub struct Pipeline {
    stage: BuildStage,
    stages: Vec<BuildStage>,
    warnings: Vec<BuildWarning>,
    events: Option<UnboundedSender<BuildEvent>>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            stage: BuildStage::Idle,
            stages: Vec::new(),
            warnings: Vec::new(),
            events: None,
        }
    }

    /// Create a pipeline plus the receiving end of its event channel
    pub fn with_events() -> (Self, UnboundedReceiver<BuildEvent>) {
        let (tx, rx) = unbounded_channel();
        let mut pipeline = Self::new();
        pipeline.events = Some(tx);
        (pipeline, rx)
    }

    /// Run `request` on its own task
    pub fn spawn(
        request: BuildRequest,
    ) -> (
        JoinHandle<Result<BuildOutput, BuildError>>,
        UnboundedReceiver<BuildEvent>,
    ) {
        let (mut pipeline, rx) = Self::with_events();
        let handle = tokio::spawn(async move { pipeline.run(request).await });
        (handle, rx)
    }

    pub fn stage(&self) -> BuildStage {
        self.stage
    }

    fn emit(&self, event: BuildEvent) {
        if let Some(tx) = &self.events {
            // A dropped receiver only means nobody is watching.
            let _ = tx.send(event);
        }
    }

    fn enter(&mut self, stage: BuildStage) {
        tracing::info!("Build stage: {}", stage);
        self.stage = stage;
        self.stages.push(stage);
        self.emit(BuildEvent::Stage(stage));
    }

    fn warn(&mut self, warning: BuildWarning) {
        if self.warnings.contains(&warning) {
            return;
        }
        tracing::warn!("{}", warning);
        self.emit(BuildEvent::Warning(warning.clone()));
        self.warnings.push(warning);
    }

    /// Run one build. Validation failures end in `Failed` and are returned as
    /// errors; a failing layer still yields and packages the other layers'
    /// parts.
    pub async fn run(&mut self, request: BuildRequest) -> Result<BuildOutput, BuildError> {
        self.stages.clear();
        self.warnings.clear();
        self.enter(BuildStage::Idle);

        match self.execute(request).await {
            Ok(output) => Ok(output),
            Err(e) => {
                tracing::error!("Build failed: {}", e);
                self.enter(BuildStage::Failed);
                Err(e)
            }
        }
    }

    async fn execute(&mut self, request: BuildRequest) -> Result<BuildOutput, BuildError> {
        let BuildRequest {
            configuration,
            font,
            tessellation,
            input,
        } = request;

        self.enter(BuildStage::DerivingDimensions);
        tessellation.validate()?;
        let dimensions = configuration.validated_dimensions()?;
        tracing::debug!("Derived dimensions: {:?}", dimensions);

        self.enter(BuildStage::LayingOutModules);
        let outlines = Arc::new(FontOutlines::load_async(font).await);
        if let Some(err) = outlines.failure() {
            tracing::warn!("Text will be left out: {}", err);
        }
        let tolerance = tessellation.curve_tolerance;
        let layout = match input {
            BuildInput::Document(document) => {
                let mut engine = LayoutEngine::new(configuration, outlines.clone())?
                    .with_tolerance(tolerance);
                document.apply(&mut engine)?;
                let (layout, warnings) = engine.finish();
                for w in warnings {
                    self.warn(BuildWarning::Asset(w));
                }
                layout
            }
            BuildInput::Wire(wire) => {
                Layout::from_modules(configuration, decode_modules(&wire)?, tolerance)?
            }
            BuildInput::Modules(modules) => {
                Layout::from_modules(configuration, modules, tolerance)?
            }
        };
        validate_modules(&layout, tolerance)?;
        tracing::info!("Laid out {} module(s)", layout.modules.len());

        let slab = layout.slab();
        if slab.width() > configuration.bed_dimension_x
            || slab.height() > configuration.bed_dimension_y
        {
            self.warn(BuildWarning::ExceedsBed {
                width: slab.width(),
                height: slab.height(),
                bed_x: configuration.bed_dimension_x,
                bed_y: configuration.bed_dimension_y,
            });
        }

        let layout = Arc::new(layout);
        let source: Arc<dyn OutlineSource> = outlines;
        let assembler = Arc::new(LayerAssembler::new(layout.clone(), source, tessellation));

        self.enter(BuildStage::BuildingLayer1);
        let a = assembler.clone();
        let layer1 = tokio::task::spawn_blocking(move || a.base_layer());
        self.enter(BuildStage::BuildingLayer2);
        let a = assembler.clone();
        let layer2 = tokio::task::spawn_blocking(move || a.piece_layer());
        self.enter(BuildStage::BuildingLayer3);
        let a = assembler.clone();
        let layer3 = tokio::task::spawn_blocking(move || a.cap_layer());

        let (layer1, layer2, layer3) = tokio::join!(layer1, layer2, layer3);
        let joined = [
            (base::LAYER_NAME, layer1),
            (pieces::LAYER_NAME, layer2),
            (cap::LAYER_NAME, layer3),
        ]
        .map(|(layer, joined)| {
            let result = joined.unwrap_or_else(|e| {
                Err(GeometryError::WorkerFailed {
                    layer,
                    reason: e.to_string(),
                })
            });
            (layer, result)
        });

        let (parts, package, layer_errors) = self.package_layers(joined)?;

        Ok(BuildOutput {
            layout,
            parts,
            package,
            layer_errors,
            warnings: self.warnings.clone(),
            stages: self.stages.clone(),
        })
    }

    /// Pack the parts of every layer that built. Failed layers are listed in
    /// the manifest and the build ends in `Failed` after packaging.
    fn package_layers(
        &mut self,
        results: [(&'static str, Result<LayerOutput, GeometryError>); 3],
    ) -> Result<(Vec<NamedSolid>, ExportPackage, Vec<GeometryError>), BuildError> {
        let mut parts = Vec::new();
        let mut layer_errors = Vec::new();
        for (layer, result) in results {
            self.emit(BuildEvent::LayerFinished {
                layer,
                ok: result.is_ok(),
            });
            match result {
                Ok(LayerOutput {
                    parts: built,
                    warnings,
                }) => {
                    parts.extend(built);
                    for w in warnings {
                        self.warn(BuildWarning::Asset(w));
                    }
                }
                Err(e) => {
                    tracing::error!("{}", e);
                    layer_errors.push(e);
                }
            }
        }

        self.enter(BuildStage::Packaging);
        let mut package = pack(&parts)?;
        for e in &layer_errors {
            let message = e.to_string();
            let prefix = format!("{}: ", e.layer());
            let reason = message.strip_prefix(&prefix).unwrap_or(&message);
            package.record_missing(e.layer(), reason);
        }

        if layer_errors.is_empty() {
            self.enter(BuildStage::Done);
        } else {
            tracing::warn!(
                "Packaged {} part(s); {} layer(s) failed",
                package.files.len(),
                layer_errors.len()
            );
            self.enter(BuildStage::Failed);
        }
        Ok((parts, package, layer_errors))
    }
}
