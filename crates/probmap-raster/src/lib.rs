//! Geo-referenced raster bands for the PROBMAP toolkit.
//!
//! A [`RasterBand`] bridges geodetic coordinates and a local flat metric
//! frame. Bands are constructed either by rasterizing vector map features
//! or by integrating a Gaussian mixture over grid cells, can be split
//! recursively into quadrants, and export to PNG images and geodetic CSV
//! tables.

pub mod band;
pub mod export;
pub mod mixture;
pub mod rasterize;
pub mod split;

pub use band::RasterBand;
pub use probmap_core::{RasterError, Result};
pub use split::QuadSplit;
