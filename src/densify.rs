use std::str::FromStr;

use anyhow::{anyhow, bail, Result};
use geo::{Coord, Euclidean, Length, LineString, MultiPolygon, Polygon};

use crate::distance::minimum_distance;
use crate::layer::PolygonLayer;

/// Target spacing for boundary densification.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Spacing {
    /// One quarter of the minimum pairwise vertex distance of the whole
    /// layer, resolved once before any polygon is processed.
    #[default]
    Auto,
    /// Absolute distance between consecutive boundary points, in the
    /// layer's coordinate units.
    Distance(f64),
    /// Fraction of each ring's own perimeter (0–100 percent); every ring
    /// gets a different effective step size.
    Percent(f64),
}

impl From<f64> for Spacing {
    fn from(distance: f64) -> Self {
        Spacing::Distance(distance)
    }
}

impl FromStr for Spacing {
    type Err = anyhow::Error;

    /// Accepts `"auto"` (case-insensitive), a plain number, or a number
    /// with a trailing `%`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(Spacing::Auto);
        }
        if let Some(percent) = trimmed.strip_suffix('%') {
            return percent.trim().parse::<f64>().map(Spacing::Percent)
                .map_err(|_| anyhow!("spacing must be \"auto\", a number, or a percentage, got {s:?}"));
        }
        trimmed.parse::<f64>().map(Spacing::Distance)
            .map_err(|_| anyhow!("spacing must be \"auto\", a number, or a percentage, got {s:?}"))
    }
}

impl Spacing {
    /// Replace `Auto` with the absolute distance it stands for, computed
    /// over the whole layer. `Distance` and `Percent` pass through.
    fn resolve(self, layer: &PolygonLayer) -> Result<Spacing> {
        match self {
            Spacing::Auto => Ok(Spacing::Distance(0.25 * minimum_distance(layer)?)),
            other => Ok(other),
        }
    }

    /// The absolute step size to use for one ring.
    fn step_for(self, ring: &LineString<f64>) -> Result<f64> {
        let step = match self {
            Spacing::Auto => bail!("auto spacing must be resolved against a layer first"),
            Spacing::Distance(d) => d,
            Spacing::Percent(p) => (p.abs() / 100.0).min(1.0) * Euclidean.length(ring),
        };
        if !step.is_finite() || step <= 0.0 {
            bail!("spacing must resolve to a positive distance, got {step}");
        }
        Ok(step)
    }
}

/// Densify the vertices along the edges of every polygon in the layer.
///
/// Each exterior ring is replaced by a ring with additional points inserted
/// along its edges so that consecutive points are at most the resolved
/// spacing apart. Every original vertex is kept in place and every inserted
/// point lies exactly on an original edge, so the boundary path and the
/// enclosed area are unchanged. Interior rings and the EPSG tag are carried
/// through untouched.
pub fn densify_polygon(layer: &PolygonLayer, spacing: Spacing) -> Result<PolygonLayer> {
    let spacing = spacing.resolve(layer)?;
    let geoms = layer.geoms().iter()
        .map(|mp| densify_multi(mp, spacing))
        .collect::<Result<Vec<MultiPolygon<f64>>>>()?;
    Ok(PolygonLayer::new(geoms, layer.epsg()))
}

fn densify_multi(mp: &MultiPolygon<f64>, spacing: Spacing) -> Result<MultiPolygon<f64>> {
    let polygons = mp.0.iter()
        .map(|polygon| {
            let exterior = densify_ring(polygon.exterior(), spacing.step_for(polygon.exterior())?);
            Ok(Polygon::new(exterior, polygon.interiors().to_vec()))
        })
        .collect::<Result<Vec<Polygon<f64>>>>()?;
    Ok(MultiPolygon(polygons))
}

/// Insert evenly spaced points along each edge of a closed ring.
///
/// An edge of length `len` is split into `ceil(len / step)` equal parts, so
/// no resulting segment exceeds `step`. The final coordinate closes the
/// ring on the first.
fn densify_ring(ring: &LineString<f64>, step: f64) -> LineString<f64> {
    let coords = &ring.0;
    if coords.len() < 2 {
        return ring.clone();
    }

    let mut out: Vec<Coord<f64>> = Vec::with_capacity(coords.len());
    for edge in coords.windows(2) {
        let (a, b) = (edge[0], edge[1]);
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let len = (dx * dx + dy * dy).sqrt();
        // zero-length edges keep their single vertex
        let parts = ((len / step).ceil() as usize).max(1);
        for k in 0..parts {
            let t = k as f64 / parts as f64;
            out.push(Coord { x: a.x + dx * t, y: a.y + dy * t });
        }
    }
    if let Some(&last) = coords.last() {
        out.push(last);
    }
    LineString::new(out)
}
