//! # Trackforge
//!
//! Generates 3D-printable tabletop tracker boards: magnet-indexed sliders,
//! ten-position dials and embossed labels, split into three stacked layers
//! and packaged as STL files with a print-count manifest.
//!
//! ## Architecture
//!
//! Trackforge is organized as a workspace with multiple crates:
//!
//! 1. **trackforge-core** - Configuration, derived dimensions, bounding box, errors
//! 2. **trackforge-settings** - Settings file loading and saving
//! 3. **trackforge-designer** - Layout engine, layer assembly, export, build pipeline
//! 4. **trackforge** - Command line front end that ties the crates together

pub mod commands;

pub use trackforge_core::{Configuration, DerivedDimensions, Error, Result};
pub use trackforge_designer as designer;
pub use trackforge_settings::Settings;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Pretty console output on stderr, so stdout stays free for command output
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
