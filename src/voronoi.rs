use ahash::AHashSet;
use anyhow::{anyhow, bail, Result};
use geo::{
    BooleanOps, BoundingRect, Coord, Intersects, LineString, MultiPolygon, Polygon, Rect,
    RemoveRepeatedPoints,
};
use rstar::{RTree, RTreeObject, AABB};
use voronoice::{BoundingBox, Point, VoronoiBuilder, VoronoiCell};

use crate::densify::{densify_polygon, Spacing};
use crate::holes::drop_holes_multi;
use crate::layer::PolygonLayer;

/// Geometry usable as the clipping boundary of a diagram.
pub trait ClipMask {
    fn to_mask(&self) -> MultiPolygon<f64>;
}

impl ClipMask for MultiPolygon<f64> {
    fn to_mask(&self) -> MultiPolygon<f64> { self.clone() }
}

impl ClipMask for Polygon<f64> {
    fn to_mask(&self) -> MultiPolygon<f64> { MultiPolygon(vec![self.clone()]) }
}

impl ClipMask for Rect<f64> {
    fn to_mask(&self) -> MultiPolygon<f64> { MultiPolygon(vec![self.to_polygon()]) }
}

impl ClipMask for PolygonLayer {
    fn to_mask(&self) -> MultiPolygon<f64> {
        self.union().unwrap_or_else(|| MultiPolygon(Vec::new()))
    }
}

/// Bounding box of one tessellation cell, for the R-tree used by the
/// cell-to-seed spatial join.
#[derive(Debug, Clone)]
struct CellBounds {
    idx: usize, // index of the corresponding cell polygon
    bbox: Rect<f64>,
}

impl RTreeObject for CellBounds {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// Create a Voronoi diagram / Thiessen polygons based on polygons.
///
/// Produces one region per seed polygon: the union of the Voronoi cells
/// generated from that seed's boundary vertices, clipped to `mask` and
/// stripped of holes. Tessellation construction is delegated to
/// [`voronoice`]; since that operates on point sites, enabling `densify`
/// samples every seed boundary at `spacing` first, which makes the result
/// approximate a diagram of the polygons themselves rather than of their
/// sparse corner vertices.
///
/// The input layer is never mutated; the output carries its EPSG tag but
/// none of its attributes, and regions are keyed to seeds positionally. A
/// seed whose region is empty after clipping yields no row. Malformed
/// geometry fails the whole call; there is no partial output.
pub fn voronoi_diagram(
    seeds: &PolygonLayer,
    mask: &impl ClipMask,
    densify: bool,
    spacing: Spacing,
) -> Result<PolygonLayer> {
    let seeds = if densify {
        densify_polygon(seeds, spacing)?
    } else {
        seeds.clone()
    };

    let unified = seeds.union()
        .ok_or_else(|| anyhow!("cannot build a voronoi diagram from an empty layer"))?;
    let mask = mask.to_mask();

    let sites = boundary_sites(&unified);
    if sites.len() < 3 {
        bail!("voronoi diagram needs at least 3 distinct boundary vertices, got {}", sites.len());
    }

    let envelope = diagram_envelope(&sites, &mask);
    let diagram = VoronoiBuilder::default()
        .set_sites(sites)
        .set_bounding_box(envelope)
        .build()
        .ok_or_else(|| anyhow!("voronoi construction failed on degenerate sites"))?;

    let cells: Vec<Polygon<f64>> = diagram.iter_cells().filter_map(cell_polygon).collect();
    let rtree = RTree::bulk_load(
        cells.iter().enumerate()
            .filter_map(|(idx, cell)| cell.bounding_rect().map(|bbox| CellBounds { idx, bbox }))
            .collect(),
    );

    let mut regions: Vec<MultiPolygon<f64>> = Vec::with_capacity(seeds.len());
    for seed in seeds.geoms() {
        let Some(rect) = seed.bounding_rect() else { continue };
        let search = AABB::from_corners(rect.min().into(), rect.max().into());

        // R-tree prefilter, then the exact predicate; a cell touching two
        // seeds is merged into both regions.
        let mut matched: Vec<usize> = rtree.locate_in_envelope_intersecting(&search)
            .filter(|cand| cells[cand.idx].intersects(seed))
            .map(|cand| cand.idx)
            .collect();
        matched.sort_unstable();

        let Some(region) = matched.iter()
            .map(|&idx| MultiPolygon(vec![cells[idx].clone()]))
            .reduce(|a, b| a.union(&b))
        else { continue };

        let clipped = region.intersection(&mask);
        if clipped.0.is_empty() {
            continue;
        }
        regions.push(drop_holes_multi(&clipped));
    }

    Ok(PolygonLayer::new(regions, seeds.epsg()))
}

/// Collect the distinct boundary vertices (exterior and interior rings) of
/// the unified seed shape as tessellation sites.
fn boundary_sites(unified: &MultiPolygon<f64>) -> Vec<Point> {
    let mut seen: AHashSet<(u64, u64)> = AHashSet::new();
    let mut sites = Vec::new();
    for polygon in &unified.0 {
        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors().iter()) {
            // the closing coordinate repeats the first; skip it
            for coord in ring.0.iter().take(ring.0.len().saturating_sub(1)) {
                if seen.insert((coord.x.to_bits(), coord.y.to_bits())) {
                    sites.push(Point { x: coord.x, y: coord.y });
                }
            }
        }
    }
    sites
}

/// Envelope handed to the tessellation constructor: the bounds of sites and
/// mask together, padded by the larger extent so that cells on the mask edge
/// are generated with room to spare before clipping.
fn diagram_envelope(sites: &[Point], mask: &MultiPolygon<f64>) -> BoundingBox {
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for site in sites {
        min_x = min_x.min(site.x);
        min_y = min_y.min(site.y);
        max_x = max_x.max(site.x);
        max_y = max_y.max(site.y);
    }
    if let Some(rect) = mask.bounding_rect() {
        min_x = min_x.min(rect.min().x);
        min_y = min_y.min(rect.min().y);
        max_x = max_x.max(rect.max().x);
        max_y = max_y.max(rect.max().y);
    }

    let width = max_x - min_x;
    let height = max_y - min_y;
    let margin = width.max(height).max(1.0);
    BoundingBox::new(
        Point { x: (min_x + max_x) / 2.0, y: (min_y + max_y) / 2.0 },
        width + margin,
        height + margin,
    )
}

/// Convert one tessellation cell into a closed ring polygon, fixing up
/// degenerate output (repeated points) and discarding cells that collapse
/// below ring arity.
fn cell_polygon(cell: VoronoiCell<'_>) -> Option<Polygon<f64>> {
    let mut coords: Vec<Coord<f64>> = cell.iter_vertices()
        .map(|vertex| Coord { x: vertex.x, y: vertex.y })
        .collect();
    if coords.len() < 3 {
        return None;
    }
    coords.push(coords[0]);

    let ring = LineString::new(coords).remove_repeated_points();
    if ring.0.len() < 4 {
        return None;
    }
    Some(Polygon::new(ring, Vec::new()))
}
