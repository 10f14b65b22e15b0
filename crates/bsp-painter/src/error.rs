//! Validation errors for polygons entering the BSP builder.

use crate::PrimitiveKind;

/// Why a polygon was rejected as degenerate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolygonError {
    /// The ring has fewer points than its primitive kind needs
    #[error("(TooFewPoints) a {kind:?} needs at least {required} points, found {found}")]
    TooFewPoints {
        kind: PrimitiveKind,
        found: usize,
        required: usize,
    },
    /// The normal is zero-length or not finite (collinear or coincident points)
    #[error("(DegenerateNormal) the polygon normal is zero or not finite")]
    DegenerateNormal,
    /// A point has a NaN or infinite coordinate
    #[error("(InvalidCoordinate) point {index} has a NaN or infinite coordinate")]
    InvalidCoordinate { index: usize },
}
