//! Recursive quadrant splitting of raster bands.
//!
//! A split partitions a band into four geometrically consistent
//! sub-bands with no gap or overlap: quadrant widths sum to the parent
//! width, heights to the parent height, and pixel boundaries stay
//! aligned with the parent's pixel grid even for odd cell counts.

use probmap_core::CartesianLocation;

use crate::band::RasterBand;

/// Result of a quadrant split: either the unchanged band (when a
/// dimension is a single cell and cannot be halved) or four children in
/// fixed north-west, north-east, south-west, south-east order.
#[derive(Debug, Clone, PartialEq)]
pub enum QuadSplit {
    Leaf(RasterBand),
    Split(Box<[RasterBand; 4]>),
}

impl QuadSplit {
    /// The four children, if this band was split.
    pub fn children(&self) -> Option<&[RasterBand; 4]> {
        match self {
            QuadSplit::Leaf(_) => None,
            QuadSplit::Split(children) => Some(children),
        }
    }

    pub fn north_west(&self) -> Option<&RasterBand> {
        self.children().map(|c| &c[0])
    }

    pub fn north_east(&self) -> Option<&RasterBand> {
        self.children().map(|c| &c[1])
    }

    pub fn south_west(&self) -> Option<&RasterBand> {
        self.children().map(|c| &c[2])
    }

    pub fn south_east(&self) -> Option<&RasterBand> {
        self.children().map(|c| &c[3])
    }
}

/// Per-axis split geometry: cell count of the low-index half, physical
/// extents of both halves, and the distance of each half's center from
/// the parent center (unsigned; the caller applies the axis direction).
///
/// When the cell count is odd the low-index half is one pixel smaller,
/// keeping every child pixel boundary on the parent grid.
struct AxisSplit {
    low_cells: usize,
    low_extent: f64,
    high_extent: f64,
    low_offset: f64,
    high_offset: f64,
}

fn split_axis(cells: usize, extent: f64, pixel: f64) -> AxisSplit {
    let low_cells = cells / 2;
    if cells % 2 != 0 {
        AxisSplit {
            low_cells,
            low_extent: (extent - pixel) / 2.0,
            high_extent: (extent + pixel) / 2.0,
            low_offset: (extent + pixel) / 4.0,
            high_offset: (extent - pixel) / 4.0,
        }
    } else {
        AxisSplit {
            low_cells,
            low_extent: extent / 2.0,
            high_extent: extent / 2.0,
            low_offset: extent / 4.0,
            high_offset: extent / 4.0,
        }
    }
}

impl RasterBand {
    /// Partition this band into its four geometric quadrants.
    ///
    /// Returns [`QuadSplit::Leaf`] unchanged when either dimension is a
    /// single cell. Otherwise the grid splits at `floor(W/2)` cells on
    /// the east axis and `floor(H/2)` cells on the south axis, and each
    /// quadrant gets its own extent and geodetic origin such that the
    /// four quadrants tile the parent exactly.
    pub fn split(self) -> QuadSplit {
        let (w, h) = self.resolution;
        if w == 1 || h == 1 {
            return QuadSplit::Leaf(self);
        }

        // Low i is west (negative east offset); low j is north (positive
        // north offset).
        let east_axis = split_axis(w, self.width, self.pixel_width);
        let north_axis = split_axis(h, self.height, self.pixel_height);

        let west = 0..east_axis.low_cells;
        let east = east_axis.low_cells..w;
        let north = 0..north_axis.low_cells;
        let south = north_axis.low_cells..h;

        let north_west = self.quadrant(
            west.clone(),
            north.clone(),
            east_axis.low_extent,
            north_axis.low_extent,
            -east_axis.low_offset,
            north_axis.low_offset,
        );
        let north_east = self.quadrant(
            east.clone(),
            north,
            east_axis.high_extent,
            north_axis.low_extent,
            east_axis.high_offset,
            north_axis.low_offset,
        );
        let south_west = self.quadrant(
            west,
            south.clone(),
            east_axis.low_extent,
            north_axis.high_extent,
            -east_axis.low_offset,
            -north_axis.high_offset,
        );
        let south_east = self.quadrant(
            east,
            south,
            east_axis.high_extent,
            north_axis.high_extent,
            east_axis.high_offset,
            -north_axis.high_offset,
        );

        QuadSplit::Split(Box::new([north_west, north_east, south_west, south_east]))
    }

    /// Split recursively until `depth` levels are reached or bands become
    /// unsplittable, collecting the resulting leaves.
    pub fn split_to_depth(self, depth: usize) -> Vec<RasterBand> {
        if depth == 0 {
            return vec![self];
        }
        match self.split() {
            QuadSplit::Leaf(band) => vec![band],
            QuadSplit::Split(children) => {
                let mut leaves = Vec::new();
                for child in *children {
                    leaves.extend(child.split_to_depth(depth - 1));
                }
                leaves
            }
        }
    }

    /// Extract one quadrant: copy the cell range and anchor its origin at
    /// the given metric offset from the parent center.
    fn quadrant(
        &self,
        i_range: std::ops::Range<usize>,
        j_range: std::ops::Range<usize>,
        extent_width: f64,
        extent_height: f64,
        offset_east: f64,
        offset_north: f64,
    ) -> RasterBand {
        let (_, h) = self.resolution;
        let quadrant_h = j_range.len();
        let mut data = Vec::with_capacity(i_range.len() * quadrant_h);
        for i in i_range.clone() {
            for j in j_range.clone() {
                data.push(self.data[i * h + j]);
            }
        }

        let origin =
            CartesianLocation::new(offset_east, offset_north).to_polar(&self.origin);

        RasterBand::new(
            data,
            (i_range.len(), quadrant_h),
            origin,
            extent_width,
            extent_height,
        )
        .expect("quadrant geometry is derived from a valid parent")
    }
}
