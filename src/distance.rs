use anyhow::{bail, Result};
use geo::Coord;

use crate::layer::PolygonLayer;

/// Calculate the minimum nonzero distance between any two vertices of the
/// input geometries.
///
/// All features are merged into one unified shape first, so vertices that
/// coincide across touching features collapse before the scan. The scan is
/// quadratic in total vertex count; it is intended for the small-to-moderate
/// layers this crate targets, not as a general nearest-neighbor query.
///
/// Errors if the layer is empty or no pair of vertices is a nonzero distance
/// apart (e.g. every vertex coincides).
pub fn minimum_distance(layer: &PolygonLayer) -> Result<f64> {
    let Some(unified) = layer.union() else {
        bail!("cannot compute minimum distance of an empty layer");
    };

    let mut vertices: Vec<Coord<f64>> = Vec::new();
    for polygon in &unified.0 {
        vertices.extend(polygon.exterior().0.iter().copied());
    }

    let mut min_sq = f64::INFINITY;
    for i in 0..vertices.len() {
        for j in (i + 1)..vertices.len() {
            let dx = vertices[i].x - vertices[j].x;
            let dy = vertices[i].y - vertices[j].y;
            let d_sq = dx * dx + dy * dy;
            if d_sq > 0.0 && d_sq < min_sq {
                min_sq = d_sq;
            }
        }
    }

    if !min_sq.is_finite() {
        bail!("no pair of vertices is a nonzero distance apart");
    }
    Ok(min_sq.sqrt())
}
