//! RasterBand: a geo-referenced grid of scalar values.
//!
//! The grid's geometric center coincides with its geodetic origin. Cells
//! are indexed by (i, j) with i increasing eastward and j increasing
//! southward; each cell covers `pixel_width` x `pixel_height` meters.

use probmap_core::{CartesianLocation, PolarLocation, RasterError, Result};

/// A raster band over a local metric frame anchored at a geodetic origin.
///
/// Shape and geometry are fixed at construction. The value grid can be
/// overwritten (same length) but never resized, and the per-cell location
/// caches are computed once and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterBand {
    pub(crate) data: Vec<f64>,
    pub(crate) resolution: (usize, usize),
    pub(crate) origin: PolarLocation,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) pixel_width: f64,
    pub(crate) pixel_height: f64,
    pub(crate) center_x: f64,
    pub(crate) center_y: f64,
    cartesian_locations: Vec<CartesianLocation>,
    polar_locations: Vec<PolarLocation>,
}

impl RasterBand {
    /// Create a band from a value grid.
    ///
    /// `data` is laid out i-outer, j-inner (`index = i * H + j`) and must
    /// match `resolution = (W, H)` exactly. Fails with `InvalidGeometry`
    /// on an empty resolution, non-positive extent, or mismatched data
    /// length.
    pub fn new(
        data: Vec<f64>,
        resolution: (usize, usize),
        origin: PolarLocation,
        width: f64,
        height: f64,
    ) -> Result<Self> {
        let (w, h) = resolution;
        if w == 0 || h == 0 {
            return Err(RasterError::geometry(format!(
                "resolution must be at least 1x1, got {w}x{h}"
            )));
        }
        if !(width > 0.0) || !(height > 0.0) {
            return Err(RasterError::geometry(format!(
                "extent must be positive, got {width}m x {height}m"
            )));
        }
        if data.len() != w * h {
            return Err(RasterError::geometry(format!(
                "data length {} does not match resolution {w}x{h}",
                data.len()
            )));
        }

        let pixel_width = width / w as f64;
        let pixel_height = height / h as f64;
        let mut band = Self {
            data,
            resolution,
            origin,
            width,
            height,
            pixel_width,
            pixel_height,
            center_x: width / 2.0,
            center_y: height / 2.0,
            cartesian_locations: Vec::with_capacity(w * h),
            polar_locations: Vec::with_capacity(w * h),
        };

        for i in 0..w {
            for j in 0..h {
                let cartesian = band.index_to_cartesian(i, j);
                band.cartesian_locations.push(cartesian);
                band.polar_locations.push(cartesian.to_polar(&band.origin));
            }
        }
        Ok(band)
    }

    /// An all-zero band of the given shape and geometry.
    pub fn zeros(
        resolution: (usize, usize),
        origin: PolarLocation,
        width: f64,
        height: f64,
    ) -> Result<Self> {
        let (w, h) = resolution;
        Self::new(vec![0.0; w * h], resolution, origin, width, height)
    }

    /// Grid resolution as (W, H) cells.
    pub fn resolution(&self) -> (usize, usize) {
        self.resolution
    }

    /// Geodetic coordinates of the band center.
    pub fn origin(&self) -> PolarLocation {
        self.origin
    }

    /// Physical east-west extent in meters.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Physical north-south extent in meters.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// East-west size of one cell in meters.
    pub fn pixel_width(&self) -> f64 {
        self.pixel_width
    }

    /// North-south size of one cell in meters.
    pub fn pixel_height(&self) -> f64 {
        self.pixel_height
    }

    /// The value grid, i-outer, j-inner.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Value of cell (i, j).
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.data[self.index(i, j)]
    }

    /// Overwrite the value of cell (i, j).
    pub fn set_value(&mut self, i: usize, j: usize, value: f64) {
        let index = self.index(i, j);
        self.data[index] = value;
    }

    /// Replace the whole value grid. The replacement must have the same
    /// length; the band's shape never changes after construction.
    pub fn set_data(&mut self, data: Vec<f64>) -> Result<()> {
        if data.len() != self.data.len() {
            return Err(RasterError::geometry(format!(
                "replacement data length {} does not match {}",
                data.len(),
                self.data.len()
            )));
        }
        self.data = data;
        Ok(())
    }

    /// Sum of all cell values.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Minimum and maximum cell values.
    pub fn min_max(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in &self.data {
            min = min.min(v);
            max = max.max(v);
        }
        (min, max)
    }

    /// Local-metric coordinates of the center of cell (i, j).
    ///
    /// Measured with the origin at the grid's top-left corner, then
    /// re-centered so the grid center is (0, 0): x grows eastward with i,
    /// y shrinks as j grows southward.
    pub fn index_to_cartesian(&self, i: usize, j: usize) -> CartesianLocation {
        CartesianLocation::new(
            self.pixel_width / 2.0 + i as f64 * self.pixel_width - self.center_x,
            -(self.pixel_height / 2.0 + j as f64 * self.pixel_height) + self.center_y,
        )
    }

    /// Geodetic coordinates of the center of cell (i, j).
    pub fn index_to_polar(&self, i: usize, j: usize) -> PolarLocation {
        self.index_to_cartesian(i, j).to_polar(&self.origin)
    }

    /// Cached local-metric center of cell (i, j).
    pub fn cartesian_location(&self, i: usize, j: usize) -> CartesianLocation {
        self.cartesian_locations[self.index(i, j)]
    }

    /// Cached geodetic center of cell (i, j).
    pub fn polar_location(&self, i: usize, j: usize) -> PolarLocation {
        self.polar_locations[self.index(i, j)]
    }

    fn index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.resolution.0 && j < self.resolution.1);
        i * self.resolution.1 + j
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn darmstadt() -> PolarLocation {
        PolarLocation::new(49.87, 8.65)
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        assert!(RasterBand::zeros((0, 4), darmstadt(), 10.0, 10.0).is_err());
        assert!(RasterBand::zeros((4, 0), darmstadt(), 10.0, 10.0).is_err());
        assert!(RasterBand::zeros((4, 4), darmstadt(), 0.0, 10.0).is_err());
        assert!(RasterBand::zeros((4, 4), darmstadt(), 10.0, -1.0).is_err());
        assert!(RasterBand::new(vec![0.0; 5], (2, 4), darmstadt(), 10.0, 10.0).is_err());
    }

    #[test]
    fn test_pixel_sizes_cover_extent() {
        let band = RasterBand::zeros((7, 3), darmstadt(), 140.0, 90.0).unwrap();
        assert!((band.pixel_width() * 7.0 - 140.0).abs() < 1e-9);
        assert!((band.pixel_height() * 3.0 - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_cell_centers_2x2() {
        // 2x2 grid over 10m x 10m: cell (0,0) sits north-west of center.
        let band = RasterBand::zeros((2, 2), PolarLocation::new(0.0, 0.0), 10.0, 10.0).unwrap();

        let nw = band.index_to_cartesian(0, 0);
        assert!((nw.east + 2.5).abs() < 1e-9, "cell (0,0) east: {}", nw.east);
        assert!((nw.north - 2.5).abs() < 1e-9, "cell (0,0) north: {}", nw.north);

        let se = band.index_to_cartesian(1, 1);
        assert!((se.east - 2.5).abs() < 1e-9, "cell (1,1) east: {}", se.east);
        assert!((se.north + 2.5).abs() < 1e-9, "cell (1,1) north: {}", se.north);
    }

    #[test]
    fn test_caches_match_on_demand_computation() {
        let band = RasterBand::zeros((5, 4), darmstadt(), 250.0, 200.0).unwrap();
        for i in 0..5 {
            for j in 0..4 {
                let cached = band.cartesian_location(i, j);
                let computed = band.index_to_cartesian(i, j);
                assert_eq!(cached, computed, "cartesian cache mismatch at ({i}, {j})");

                let cached_polar = band.polar_location(i, j);
                let computed_polar = band.index_to_polar(i, j);
                assert_eq!(
                    cached_polar, computed_polar,
                    "polar cache mismatch at ({i}, {j})"
                );
            }
        }
    }

    #[test]
    fn test_polar_roundtrip_over_all_indices() {
        let band = RasterBand::zeros((6, 6), darmstadt(), 600.0, 600.0).unwrap();
        for i in 0..6 {
            for j in 0..6 {
                let cartesian = band.index_to_cartesian(i, j);
                let back = band.index_to_polar(i, j).to_cartesian(&band.origin());
                assert!(
                    (cartesian.east - back.east).abs() < 1e-6,
                    "east roundtrip at ({i}, {j}): {} vs {}",
                    cartesian.east,
                    back.east
                );
                assert!(
                    (cartesian.north - back.north).abs() < 1e-6,
                    "north roundtrip at ({i}, {j}): {} vs {}",
                    cartesian.north,
                    back.north
                );
            }
        }
    }

    #[test]
    fn test_grid_center_coincides_with_origin() {
        // For odd resolutions the middle cell center is the grid center.
        let band = RasterBand::zeros((3, 3), darmstadt(), 30.0, 30.0).unwrap();
        let middle = band.index_to_cartesian(1, 1);
        assert!(middle.east.abs() < 1e-9);
        assert!(middle.north.abs() < 1e-9);

        let polar = band.index_to_polar(1, 1);
        assert!((polar.latitude - darmstadt().latitude).abs() < 1e-12);
        assert!((polar.longitude - darmstadt().longitude).abs() < 1e-12);
    }

    #[test]
    fn test_set_data_keeps_shape() {
        let mut band = RasterBand::zeros((2, 2), darmstadt(), 10.0, 10.0).unwrap();
        assert!(band.set_data(vec![1.0, 2.0, 3.0]).is_err());
        band.set_data(vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(band.value(0, 1), 2.0);
        assert_eq!(band.value(1, 0), 3.0);
        assert_eq!(band.resolution(), (2, 2));
    }

    #[test]
    fn test_min_max_and_sum() {
        let band = RasterBand::new(
            vec![0.5, -1.0, 2.0, 0.0],
            (2, 2),
            darmstadt(),
            10.0,
            10.0,
        )
        .unwrap();
        assert_eq!(band.min_max(), (-1.0, 2.0));
        assert!((band.sum() - 1.5).abs() < 1e-12);
    }
}
