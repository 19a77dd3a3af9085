//! # Trackforge Core
//!
//! Core types shared by every Trackforge crate:
//!
//! - [`Configuration`]: the handful of base print parameters a board is built from
//! - [`DerivedDimensions`]: manufacturing measurements computed from a configuration
//! - [`BoundingBox`]: the running extent of placed modules on the working surface
//! - [`Error`]: the unified error taxonomy (configuration, placement, asset, geometry, export)

pub mod bounds;
pub mod config;
pub mod dimensions;
pub mod error;

pub use bounds::BoundingBox;
pub use config::{Configuration, FontSource, Tessellation};
pub use dimensions::DerivedDimensions;
pub use error::{
    AssetError, ConfigError, Error, ExportError, GeometryError, PlacementError, Result,
};
