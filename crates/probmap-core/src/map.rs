//! Vector map model: categorized features over a geodetic origin.
//!
//! A map carries its geodetic center plus a physical extent in meters,
//! and a list of features tagged with a [`LocationType`]. Geometry is
//! stored either in geodetic (polar) or local-metric (Cartesian) form;
//! rasterization always works on the Cartesian form.

use serde::{Deserialize, Serialize};

use crate::enums::LocationType;
use crate::types::{CartesianLocation, PolarLocation};

/// A closed polygon in the local metric frame.
///
/// Vertices are stored in order; the closing edge from the last vertex
/// back to the first is implicit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartesianPolygon {
    pub vertices: Vec<CartesianLocation>,
}

impl CartesianPolygon {
    pub fn new(vertices: Vec<CartesianLocation>) -> Self {
        Self { vertices }
    }

    /// Point-in-polygon test using the even-odd crossing rule.
    pub fn contains(&self, point: &CartesianLocation) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = &self.vertices[i];
            let b = &self.vertices[j];
            let crosses = (a.north > point.north) != (b.north > point.north);
            if crosses {
                let t = (point.north - a.north) / (b.north - a.north);
                let x = a.east + t * (b.east - a.east);
                if point.east < x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Axis-aligned bounding box as (min_east, min_north, max_east, max_north).
    /// Returns None for an empty polygon.
    pub fn bounding_box(&self) -> Option<(f64, f64, f64, f64)> {
        let first = self.vertices.first()?;
        let mut min_e = first.east;
        let mut min_n = first.north;
        let mut max_e = first.east;
        let mut max_n = first.north;
        for v in &self.vertices[1..] {
            min_e = min_e.min(v.east);
            min_n = min_n.min(v.north);
            max_e = max_e.max(v.east);
            max_n = max_n.max(v.north);
        }
        Some((min_e, min_n, max_e, max_n))
    }
}

/// Geometry of a Cartesian map feature.
///
/// Only polygons are rasterized; lines and points are carried through
/// for completeness and skipped by the rasterizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CartesianGeometry {
    Polygon(CartesianPolygon),
    Line(Vec<CartesianLocation>),
    Point(CartesianLocation),
}

/// A single categorized map feature in the local metric frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartesianFeature {
    pub location_type: LocationType,
    pub geometry: CartesianGeometry,
}

impl CartesianFeature {
    pub fn polygon(location_type: LocationType, vertices: Vec<CartesianLocation>) -> Self {
        Self {
            location_type,
            geometry: CartesianGeometry::Polygon(CartesianPolygon::new(vertices)),
        }
    }

    /// The polygon geometry, if this feature is a polygon.
    pub fn as_polygon(&self) -> Option<&CartesianPolygon> {
        match &self.geometry {
            CartesianGeometry::Polygon(p) => Some(p),
            _ => None,
        }
    }
}

/// A vector map in the local metric frame, centered on a geodetic origin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartesianMap {
    /// Geodetic coordinates of the map center.
    pub origin: PolarLocation,
    /// Physical extent in meters (east-west).
    pub width: f64,
    /// Physical extent in meters (north-south).
    pub height: f64,
    pub features: Vec<CartesianFeature>,
}

impl CartesianMap {
    pub fn new(origin: PolarLocation, width: f64, height: f64) -> Self {
        Self {
            origin,
            width,
            height,
            features: Vec::new(),
        }
    }

    /// Iterate over polygon features of the given category.
    pub fn polygons_of_type(
        &self,
        location_type: LocationType,
    ) -> impl Iterator<Item = &CartesianPolygon> {
        self.features
            .iter()
            .filter(move |f| f.location_type == location_type)
            .filter_map(|f| f.as_polygon())
    }
}

/// A single categorized map feature in geodetic coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolarFeature {
    pub location_type: LocationType,
    pub geometry: PolarGeometry,
}

/// Geometry of a polar map feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PolarGeometry {
    Polygon(Vec<PolarLocation>),
    Line(Vec<PolarLocation>),
    Point(PolarLocation),
}

/// A vector map in geodetic coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolarMap {
    pub origin: PolarLocation,
    pub width: f64,
    pub height: f64,
    pub features: Vec<PolarFeature>,
}

impl PolarMap {
    pub fn new(origin: PolarLocation, width: f64, height: f64) -> Self {
        Self {
            origin,
            width,
            height,
            features: Vec::new(),
        }
    }

    /// Reproject every feature into the local metric frame anchored at
    /// this map's origin.
    pub fn to_cartesian(&self) -> CartesianMap {
        let origin = self.origin;
        let project = |locations: &[PolarLocation]| -> Vec<CartesianLocation> {
            locations.iter().map(|l| l.to_cartesian(&origin)).collect()
        };

        let features = self
            .features
            .iter()
            .map(|f| {
                let geometry = match &f.geometry {
                    PolarGeometry::Polygon(vs) => {
                        CartesianGeometry::Polygon(CartesianPolygon::new(project(vs)))
                    }
                    PolarGeometry::Line(vs) => CartesianGeometry::Line(project(vs)),
                    PolarGeometry::Point(p) => CartesianGeometry::Point(p.to_cartesian(&origin)),
                };
                CartesianFeature {
                    location_type: f.location_type,
                    geometry,
                }
            })
            .collect();

        CartesianMap {
            origin,
            width: self.width,
            height: self.height,
            features,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square(offset: f64) -> CartesianPolygon {
        CartesianPolygon::new(vec![
            CartesianLocation::new(offset, offset),
            CartesianLocation::new(offset + 1.0, offset),
            CartesianLocation::new(offset + 1.0, offset + 1.0),
            CartesianLocation::new(offset, offset + 1.0),
        ])
    }

    #[test]
    fn test_polygon_contains() {
        let square = unit_square(0.0);
        assert!(square.contains(&CartesianLocation::new(0.5, 0.5)));
        assert!(!square.contains(&CartesianLocation::new(1.5, 0.5)));
        assert!(!square.contains(&CartesianLocation::new(-0.5, 0.5)));
    }

    #[test]
    fn test_polygon_contains_concave() {
        // L-shaped polygon: the notch at the top-right must be outside.
        let poly = CartesianPolygon::new(vec![
            CartesianLocation::new(0.0, 0.0),
            CartesianLocation::new(2.0, 0.0),
            CartesianLocation::new(2.0, 1.0),
            CartesianLocation::new(1.0, 1.0),
            CartesianLocation::new(1.0, 2.0),
            CartesianLocation::new(0.0, 2.0),
        ]);
        assert!(poly.contains(&CartesianLocation::new(0.5, 1.5)));
        assert!(poly.contains(&CartesianLocation::new(1.5, 0.5)));
        assert!(!poly.contains(&CartesianLocation::new(1.5, 1.5)));
    }

    #[test]
    fn test_degenerate_polygon() {
        let two_points = CartesianPolygon::new(vec![
            CartesianLocation::new(0.0, 0.0),
            CartesianLocation::new(1.0, 1.0),
        ]);
        assert!(!two_points.contains(&CartesianLocation::new(0.5, 0.5)));
        assert!(CartesianPolygon::default().bounding_box().is_none());
    }

    #[test]
    fn test_bounding_box() {
        let square = unit_square(2.0);
        let (min_e, min_n, max_e, max_n) = square.bounding_box().unwrap();
        assert_eq!((min_e, min_n, max_e, max_n), (2.0, 2.0, 3.0, 3.0));
    }

    #[test]
    fn test_polar_map_reprojection() {
        let origin = PolarLocation::new(49.87, 8.65);
        let mut map = PolarMap::new(origin, 1000.0, 1000.0);
        map.features.push(PolarFeature {
            location_type: LocationType::Park,
            geometry: PolarGeometry::Point(origin),
        });

        let cartesian = map.to_cartesian();
        assert_eq!(cartesian.width, 1000.0);
        match &cartesian.features[0].geometry {
            CartesianGeometry::Point(p) => {
                assert!(p.east.abs() < 1e-9, "origin point maps to frame origin");
                assert!(p.north.abs() < 1e-9);
            }
            other => panic!("expected point geometry, got {other:?}"),
        }
    }

    #[test]
    fn test_polygons_of_type_filter() {
        let mut map = CartesianMap::new(PolarLocation::default(), 10.0, 10.0);
        map.features.push(CartesianFeature::polygon(
            LocationType::Water,
            unit_square(0.0).vertices,
        ));
        map.features.push(CartesianFeature::polygon(
            LocationType::Park,
            unit_square(2.0).vertices,
        ));
        map.features.push(CartesianFeature {
            location_type: LocationType::Water,
            geometry: CartesianGeometry::Point(CartesianLocation::new(0.0, 0.0)),
        });

        // Only the water polygon qualifies; the water point does not.
        assert_eq!(map.polygons_of_type(LocationType::Water).count(), 1);
        assert_eq!(map.polygons_of_type(LocationType::Road).count(), 0);
    }
}
