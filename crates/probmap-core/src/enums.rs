//! Enumeration types used throughout the toolkit.

use serde::{Deserialize, Serialize};

/// Semantic category of a vector map feature.
///
/// Rasterization selects features by this tag, so one raster band
/// describes exactly one category of map content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationType {
    /// No category assigned.
    #[default]
    Unknown,
    /// Lakes, rivers, coastal water.
    Water,
    /// Public green areas.
    Park,
    /// Streets and paths.
    Road,
    /// Built structures.
    Building,
    /// Aerodromes and helipads.
    Airport,
    /// No-fly or otherwise restricted zones.
    Restricted,
    /// Rail lines and yards.
    Rail,
    /// Power lines, masts, and other vertical obstacles.
    Obstacle,
}
