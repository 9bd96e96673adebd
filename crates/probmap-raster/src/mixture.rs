//! Probability rasterization of Gaussian mixtures.
//!
//! Each cell's value is the exact rectangle probability mass of the
//! mixture over the cell's footprint, computed per component via the
//! inclusion-exclusion identity on the cell's four corners. Adjacent
//! cells share corners, so CDF evaluations are cached per component:
//! roughly one evaluation per grid corner instead of four per cell.

use std::collections::HashMap;

use glam::DVec2;
use probmap_core::{PolarLocation, Result};
use probmap_models::{Gaussian, GaussianMixture};

use crate::band::RasterBand;

/// Corner coordinates are quantized to nanometers for use as hash keys.
/// Grid corners are derived from identical arithmetic, so equal corners
/// quantize to equal keys.
const KEY_SCALE: f64 = 1e9;

fn corner_key(point: DVec2) -> (i64, i64) {
    ((point.x * KEY_SCALE).round() as i64, (point.y * KEY_SCALE).round() as i64)
}

fn cached_cdf(cache: &mut HashMap<(i64, i64), f64>, gaussian: &Gaussian, point: DVec2) -> f64 {
    *cache
        .entry(corner_key(point))
        .or_insert_with(|| gaussian.cdf(point))
}

impl RasterBand {
    /// Integrate a Gaussian mixture over a grid of the given shape and
    /// geometry, producing a probability raster.
    ///
    /// Values are not clamped or renormalized; supplying a valid
    /// distribution is the caller's responsibility.
    pub fn from_gaussian_mixture(
        mixture: &GaussianMixture,
        origin: PolarLocation,
        width: f64,
        height: f64,
        resolution: (usize, usize),
    ) -> Result<Self> {
        let mut band = RasterBand::zeros(resolution, origin, width, height)?;
        let (w, h) = resolution;

        let half_east = band.pixel_width / 2.0;
        let half_north = band.pixel_height / 2.0;

        let mut values = vec![0.0; w * h];
        for gaussian in mixture {
            // Cache is scoped to one component: corner coordinates repeat
            // across cells, not across components.
            let mut cdf_cache: HashMap<(i64, i64), f64> = HashMap::with_capacity((w + 1) * (h + 1));

            for i in 0..w {
                for j in 0..h {
                    let center = band.cartesian_location(i, j).to_dvec2();
                    let top_right = center + DVec2::new(half_east, half_north);
                    let top_left = center + DVec2::new(-half_east, half_north);
                    let bottom_right = center + DVec2::new(half_east, -half_north);
                    let bottom_left = center + DVec2::new(-half_east, -half_north);

                    let mass = gaussian.weight
                        * (cached_cdf(&mut cdf_cache, gaussian, top_right)
                            - cached_cdf(&mut cdf_cache, gaussian, top_left)
                            - cached_cdf(&mut cdf_cache, gaussian, bottom_right)
                            + cached_cdf(&mut cdf_cache, gaussian, bottom_left));
                    values[i * h + j] += mass;
                }
            }
        }

        band.set_data(values)?;
        Ok(band)
    }
}
