//! Core types and definitions for the PROBMAP raster toolkit.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geodetic and local-metric locations, location categories, vector map
//! features, and the common error type. It has no dependency on any
//! rendering or model crate.

pub mod constants;
pub mod enums;
pub mod error;
pub mod map;
pub mod types;

pub use enums::LocationType;
pub use error::{RasterError, Result};
pub use map::{
    CartesianFeature, CartesianGeometry, CartesianMap, CartesianPolygon, PolarFeature,
    PolarGeometry, PolarMap,
};
pub use types::{CartesianLocation, PolarLocation};
