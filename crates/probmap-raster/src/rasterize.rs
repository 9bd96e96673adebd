//! Occupancy rasterization of vector map features.
//!
//! Polygons of one category are drawn black on a white canvas at one
//! pixel per meter, then the canvas is downsampled to the requested
//! resolution. The resulting values approximate the fraction of each
//! cell's area covered by features of that category.
//!
//! Only polygon features are rasterized; line and point features are
//! skipped. This is a documented limitation of the rasterization path,
//! not an error.

use image::imageops::FilterType;
use image::{GrayImage, Luma};
use probmap_core::constants::CANVAS_PIXELS_PER_METER;
use probmap_core::{CartesianMap, CartesianPolygon, LocationType, PolarMap, RasterError, Result};

use crate::band::RasterBand;

impl RasterBand {
    /// Rasterize one feature category of a Cartesian map into an
    /// occupancy band of the requested resolution.
    pub fn from_map(
        map: &CartesianMap,
        location_type: LocationType,
        resolution: (usize, usize),
    ) -> Result<Self> {
        let (w, h) = resolution;
        if w == 0 || h == 0 {
            return Err(RasterError::geometry(format!(
                "resolution must be at least 1x1, got {w}x{h}"
            )));
        }
        if !(map.width > 0.0) || !(map.height > 0.0) {
            return Err(RasterError::geometry(format!(
                "map extent must be positive, got {}m x {}m",
                map.width, map.height
            )));
        }

        // Canvas extent equals the map's declared extent exactly, so no
        // crop is needed before the final resize.
        let canvas_w = (map.width * CANVAS_PIXELS_PER_METER).round().max(1.0) as u32;
        let canvas_h = (map.height * CANVAS_PIXELS_PER_METER).round().max(1.0) as u32;
        let mut canvas = GrayImage::from_pixel(canvas_w, canvas_h, Luma([255u8]));

        for polygon in map.polygons_of_type(location_type) {
            fill_polygon(&mut canvas, polygon, map.width, map.height);
        }

        // A contrast-free canvas means nothing was drawn: short-circuit
        // to a clean zero baseline instead of resizing a blank image.
        if is_uniform(&canvas) {
            return RasterBand::zeros(resolution, map.origin, map.width, map.height);
        }

        let resized = image::imageops::resize(&canvas, w as u32, h as u32, FilterType::Triangle);

        // Normalize to [0, 1], invert (drawn features become 1.0), and
        // transpose from image row/column order into (i, j) indexing.
        let mut data = vec![0.0; w * h];
        for i in 0..w {
            for j in 0..h {
                let intensity = resized.get_pixel(i as u32, j as u32).0[0] as f64 / 255.0;
                data[i * h + j] = 1.0 - intensity;
            }
        }

        RasterBand::new(data, resolution, map.origin, map.width, map.height)
    }

    /// Rasterize a polar map by reprojecting it into the local metric
    /// frame first.
    pub fn from_polar_map(
        map: &PolarMap,
        location_type: LocationType,
        resolution: (usize, usize),
    ) -> Result<Self> {
        Self::from_map(&map.to_cartesian(), location_type, resolution)
    }
}

/// True when every canvas pixel has the same intensity.
fn is_uniform(canvas: &GrayImage) -> bool {
    let mut pixels = canvas.pixels();
    match pixels.next() {
        Some(first) => pixels.all(|p| p == first),
        None => true,
    }
}

/// Scanline fill with the even-odd rule.
///
/// The canvas covers map-centered metric coordinates: column 0 is the
/// western edge, row 0 the northern edge. A pixel is filled when its
/// center lies inside the polygon.
fn fill_polygon(canvas: &mut GrayImage, polygon: &CartesianPolygon, width: f64, height: f64) {
    let n = polygon.vertices.len();
    if n < 3 {
        return;
    }

    let (canvas_w, canvas_h) = canvas.dimensions();
    let pixel_w = width / canvas_w as f64;
    let pixel_h = height / canvas_h as f64;

    for row in 0..canvas_h {
        let y = height / 2.0 - (row as f64 + 0.5) * pixel_h;

        let mut crossings: Vec<f64> = Vec::new();
        let mut j = n - 1;
        for i in 0..n {
            let a = &polygon.vertices[i];
            let b = &polygon.vertices[j];
            if (a.north > y) != (b.north > y) {
                let t = (y - a.north) / (b.north - a.north);
                crossings.push(a.east + t * (b.east - a.east));
            }
            j = i;
        }
        crossings.sort_by(f64::total_cmp);

        for span in crossings.chunks_exact(2) {
            // Fill columns whose centers fall within [span0, span1].
            let first = ((span[0] + width / 2.0) / pixel_w - 0.5).ceil().max(0.0) as i64;
            let last = ((span[1] + width / 2.0) / pixel_w - 0.5).floor() as i64;
            let last = last.min(canvas_w as i64 - 1);
            for col in first..=last {
                canvas.put_pixel(col as u32, row, Luma([0u8]));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use probmap_core::{CartesianFeature, CartesianGeometry, CartesianLocation, PolarLocation};

    fn darmstadt() -> PolarLocation {
        PolarLocation::new(49.87, 8.65)
    }

    /// Square polygon centered at (cx, cy) with the given side length.
    fn square(cx: f64, cy: f64, side: f64) -> Vec<CartesianLocation> {
        let r = side / 2.0;
        vec![
            CartesianLocation::new(cx - r, cy - r),
            CartesianLocation::new(cx + r, cy - r),
            CartesianLocation::new(cx + r, cy + r),
            CartesianLocation::new(cx - r, cy + r),
        ]
    }

    #[test]
    fn test_empty_map_gives_zero_raster() {
        let map = CartesianMap::new(darmstadt(), 100.0, 100.0);
        let band = RasterBand::from_map(&map, LocationType::Water, (8, 8)).unwrap();
        assert_eq!(band.resolution(), (8, 8));
        assert!(band.data().iter().all(|&v| v == 0.0), "all cells zero");
    }

    #[test]
    fn test_unmatched_category_gives_zero_raster() {
        let mut map = CartesianMap::new(darmstadt(), 100.0, 100.0);
        map.features.push(CartesianFeature::polygon(
            LocationType::Park,
            square(0.0, 0.0, 50.0),
        ));
        let band = RasterBand::from_map(&map, LocationType::Water, (8, 8)).unwrap();
        assert!(band.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_full_coverage_polygon() {
        let mut map = CartesianMap::new(darmstadt(), 64.0, 64.0);
        map.features.push(CartesianFeature::polygon(
            LocationType::Water,
            square(0.0, 0.0, 200.0),
        ));
        let band = RasterBand::from_map(&map, LocationType::Water, (4, 4)).unwrap();
        // The polygon covers the whole canvas, which is contrast-free and
        // falls back to the zero baseline.
        assert!(band.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_half_coverage() {
        // Western half covered: eastern cells stay 0, western cells ~1.
        let mut map = CartesianMap::new(darmstadt(), 64.0, 64.0);
        map.features.push(CartesianFeature::polygon(
            LocationType::Building,
            vec![
                CartesianLocation::new(-32.0, -32.0),
                CartesianLocation::new(0.0, -32.0),
                CartesianLocation::new(0.0, 32.0),
                CartesianLocation::new(-32.0, 32.0),
            ],
        ));
        let band = RasterBand::from_map(&map, LocationType::Building, (4, 4)).unwrap();

        for j in 0..4 {
            assert!(
                band.value(0, j) > 0.9,
                "western cell (0, {j}) = {}",
                band.value(0, j)
            );
            assert!(
                band.value(3, j) < 0.1,
                "eastern cell (3, {j}) = {}",
                band.value(3, j)
            );
        }
    }

    #[test]
    fn test_orientation_northern_feature() {
        // Feature only in the north: j=0 rows carry the coverage.
        let mut map = CartesianMap::new(darmstadt(), 64.0, 64.0);
        map.features.push(CartesianFeature::polygon(
            LocationType::Park,
            vec![
                CartesianLocation::new(-32.0, 0.0),
                CartesianLocation::new(32.0, 0.0),
                CartesianLocation::new(32.0, 32.0),
                CartesianLocation::new(-32.0, 32.0),
            ],
        ));
        let band = RasterBand::from_map(&map, LocationType::Park, (4, 4)).unwrap();

        for i in 0..4 {
            assert!(
                band.value(i, 0) > 0.9,
                "northern cell ({i}, 0) = {}",
                band.value(i, 0)
            );
            assert!(
                band.value(i, 3) < 0.1,
                "southern cell ({i}, 3) = {}",
                band.value(i, 3)
            );
        }
    }

    #[test]
    fn test_lines_and_points_are_skipped() {
        let mut map = CartesianMap::new(darmstadt(), 100.0, 100.0);
        map.features.push(CartesianFeature {
            location_type: LocationType::Road,
            geometry: CartesianGeometry::Line(vec![
                CartesianLocation::new(-50.0, 0.0),
                CartesianLocation::new(50.0, 0.0),
            ]),
        });
        map.features.push(CartesianFeature {
            location_type: LocationType::Road,
            geometry: CartesianGeometry::Point(CartesianLocation::new(0.0, 0.0)),
        });

        let band = RasterBand::from_map(&map, LocationType::Road, (4, 4)).unwrap();
        assert!(
            band.data().iter().all(|&v| v == 0.0),
            "non-polygon features must not rasterize"
        );
    }

    #[test]
    fn test_partial_coverage_fraction() {
        // A quarter of the map covered: total coverage ~4 of 16 cells.
        let mut map = CartesianMap::new(darmstadt(), 64.0, 64.0);
        map.features.push(CartesianFeature::polygon(
            LocationType::Water,
            vec![
                CartesianLocation::new(0.0, 0.0),
                CartesianLocation::new(32.0, 0.0),
                CartesianLocation::new(32.0, 32.0),
                CartesianLocation::new(0.0, 32.0),
            ],
        ));
        let band = RasterBand::from_map(&map, LocationType::Water, (4, 4)).unwrap();
        let coverage = band.sum();
        assert!(
            (coverage - 4.0).abs() < 0.5,
            "quarter coverage {coverage} of 16 cells, expected ~4"
        );
        // The covered quadrant is north-east: i in 2..4, j in 0..2.
        assert!(band.value(3, 0) > 0.9);
        assert!(band.value(0, 3) < 0.1);
    }

    #[test]
    fn test_polar_map_rasterization() {
        let mut polar = PolarMap::new(darmstadt(), 64.0, 64.0);
        // A polygon around the origin expressed in geodetic coordinates.
        let offsets = [(-20.0, -20.0), (20.0, -20.0), (20.0, 20.0), (-20.0, 20.0)];
        let vertices = offsets
            .iter()
            .map(|&(east, north)| {
                CartesianLocation::new(east, north).to_polar(&darmstadt())
            })
            .collect();
        polar.features.push(probmap_core::PolarFeature {
            location_type: LocationType::Water,
            geometry: probmap_core::PolarGeometry::Polygon(vertices),
        });

        let band = RasterBand::from_polar_map(&polar, LocationType::Water, (8, 8)).unwrap();
        assert!(band.value(4, 4) > 0.9, "center covered");
        assert!(band.value(0, 0) < 0.1, "corner uncovered");
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let map = CartesianMap::new(darmstadt(), 100.0, 100.0);
        assert!(RasterBand::from_map(&map, LocationType::Water, (0, 8)).is_err());

        let degenerate = CartesianMap::new(darmstadt(), 0.0, 100.0);
        assert!(RasterBand::from_map(&degenerate, LocationType::Water, (8, 8)).is_err());
    }
}
