//! Command handlers behind the `trackforge` binary

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use trackforge_core::FontSource;
use trackforge_designer::layout::grid::BUILTIN_RULESETS;
use trackforge_designer::model::wire::{from_json, to_json};
use trackforge_designer::text::list_font_families;
use trackforge_designer::{
    BuildEvent, BuildInput, BuildRequest, FontOutlines, LayoutDocument, LayoutEngine, Pipeline,
    SlotGrid,
};
use trackforge_settings::Settings;

/// Kind of file handed to `generate`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Placement intents (JSON or TOML)
    Document,
    /// A serialized module list (JSON)
    Wire,
}

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub input: PathBuf,
    pub kind: InputKind,
    pub settings: Option<PathBuf>,
    /// Archive path, or a directory when `loose` is set
    pub output: Option<PathBuf>,
    pub loose: bool,
    pub font: Option<PathBuf>,
}

/// Settings from `path`, the default location, or built-in defaults
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match Settings::default_path() {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("{}; using default settings", e);
                return Ok(Settings::default());
            }
        },
    };
    Settings::load_or_default(&path)
        .with_context(|| format!("Failed to load settings from {}", path.display()))
}

fn read_input(path: &Path, kind: InputKind) -> anyhow::Result<BuildInput> {
    match kind {
        InputKind::Document => {
            let document = LayoutDocument::load_from_file(path)
                .with_context(|| format!("Failed to read layout {}", path.display()))?;
            Ok(BuildInput::Document(document))
        }
        InputKind::Wire => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let modules = from_json(&json)
                .with_context(|| format!("Failed to decode module list {}", path.display()))?;
            Ok(BuildInput::Modules(modules))
        }
    }
}

/// Build a board and write its parts
pub async fn generate(options: GenerateOptions) -> anyhow::Result<()> {
    let settings = load_settings(options.settings.as_deref())?;
    let input = read_input(&options.input, options.kind)?;

    let font = match &options.font {
        Some(path) => FontSource::File { path: path.clone() },
        None => settings.font.clone(),
    };
    let request = BuildRequest::new(settings.print, input)
        .with_font(font)
        .with_tessellation(settings.geometry);

    let (handle, mut events) = Pipeline::spawn(request);
    while let Some(event) = events.recv().await {
        match event {
            BuildEvent::Stage(stage) => tracing::debug!("Stage: {}", stage),
            BuildEvent::Warning(warning) => eprintln!("warning: {}", warning),
            BuildEvent::LayerFinished { layer, ok } => {
                tracing::debug!("{} finished (ok: {})", layer, ok)
            }
        }
    }
    let output = handle.await.context("Build task stopped")??;

    let package = output.package;
    if package.files.is_empty() {
        bail!("No layer could be built; nothing was written");
    }

    let include_manifest = settings.export.include_manifest;
    if options.loose {
        let dir = options.output.unwrap_or_else(|| PathBuf::from("."));
        let written = package.write_directory(&dir, include_manifest)?;
        for path in written {
            println!("{}", path.display());
        }
    } else {
        let path = options
            .output
            .unwrap_or_else(|| PathBuf::from(&settings.export.archive_name));
        package.write_to_path(&path, include_manifest)?;
        println!("{}", path.display());
    }
    print!("{}", package.manifest());

    for err in &output.layer_errors {
        eprintln!("error: {}", err);
    }
    if !output.layer_errors.is_empty() {
        bail!(
            "{} layer(s) failed; wrote the {} part(s) that built",
            output.layer_errors.len(),
            package.files.len()
        );
    }
    Ok(())
}

/// Replay a layout document and print (or write) the module list
pub async fn layout(
    input: &Path,
    settings: Option<&Path>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let settings = load_settings(settings)?;
    let document = LayoutDocument::load_from_file(input)
        .with_context(|| format!("Failed to read layout {}", input.display()))?;

    let outlines = Arc::new(FontOutlines::load_async(settings.font.clone()).await);
    let mut engine = LayoutEngine::new(settings.print, outlines)?
        .with_tolerance(settings.geometry.curve_tolerance);
    document.apply(&mut engine)?;
    let (layout, warnings) = engine.finish();
    for warning in warnings {
        eprintln!("warning: {}", warning);
    }

    let json = to_json(&layout.modules)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {} module(s) to {}", layout.modules.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Write a settings file with default values
pub fn init_settings(path: Option<&Path>, force: bool) -> anyhow::Result<PathBuf> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => Settings::default_path()?,
    };
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    Settings::default()
        .save_to_file(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Describe the built-in slot tables
pub fn rulesets() -> anyhow::Result<()> {
    for name in BUILTIN_RULESETS {
        let grid = SlotGrid::builtin(name)?;
        let columns: Vec<String> = grid
            .labels
            .iter()
            .zip(&grid.max_slots)
            .map(|(label, slots)| format!("{}:{}", label, slots))
            .collect();
        println!("{:<8} {}  [{}]", name, grid.title, columns.join(" "));
    }
    Ok(())
}

/// List font families known to the system font database
pub fn fonts() {
    for family in list_font_families() {
        println!("{}", family);
    }
}
