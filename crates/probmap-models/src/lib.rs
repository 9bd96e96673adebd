//! Probabilistic models for the PROBMAP raster toolkit.
//!
//! Bivariate Gaussian components and their weighted mixtures, with exact
//! joint CDF evaluation (the primitive the mixture rasterizer integrates)
//! and seeded sampling for synthetic inputs.

pub mod gaussian;
pub mod mixture;

pub use gaussian::{Gaussian, ModelError};
pub use mixture::GaussianMixture;
