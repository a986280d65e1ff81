// End-to-end tests for the diagram orchestration: densify -> tessellate ->
// join -> dissolve -> clip -> hole removal.

use approx::assert_relative_eq;
use geo::{polygon, Area, BooleanOps, Contains, Coord, MultiPolygon, Polygon, Rect};
use thiessen::{voronoi_diagram, PolygonLayer, Spacing};

/// Unit square centered on (cx, cy).
fn unit_square(cx: f64, cy: f64) -> Polygon<f64> {
    polygon![
        (x: cx - 0.5, y: cy - 0.5),
        (x: cx + 0.5, y: cy - 0.5),
        (x: cx + 0.5, y: cy + 0.5),
        (x: cx - 0.5, y: cy + 0.5),
        (x: cx - 0.5, y: cy - 0.5),
    ]
}

fn two_seed_layer() -> PolygonLayer {
    PolygonLayer::from_polygons(vec![unit_square(0.0, 0.0), unit_square(4.0, 0.0)], Some(32650))
}

fn mask() -> Rect<f64> {
    Rect::new(Coord { x: -10.0, y: -10.0 }, Coord { x: 10.0, y: 10.0 })
}

#[test]
fn two_seeds_partition_the_mask() {
    let seeds = two_seed_layer();
    let result = voronoi_diagram(&seeds, &mask(), true, Spacing::Distance(0.1)).unwrap();

    assert_eq!(result.len(), 2);

    // Each region contains the seed it was generated from.
    for (region, seed) in result.geoms().iter().zip(seeds.geoms()) {
        assert!(region.contains(seed));
    }

    // Regions do not overlap (a shared boundary line has no area).
    let overlap = result.geoms()[0].intersection(&result.geoms()[1]);
    assert_relative_eq!(overlap.unsigned_area(), 0.0, epsilon = 1e-6);

    // Together the regions cover the whole mask.
    let covered: MultiPolygon<f64> = result.geoms()[0].union(&result.geoms()[1]);
    assert_relative_eq!(covered.unsigned_area(), 400.0, max_relative = 1e-6);
}

#[test]
fn crs_tag_is_carried_through() {
    let result = voronoi_diagram(&two_seed_layer(), &mask(), true, Spacing::Auto).unwrap();
    assert_eq!(result.epsg(), Some(32650));
}

#[test]
fn works_without_densification() {
    // With only the corner vertices as sites the diagram is coarser but the
    // association is still one region per seed.
    let seeds = two_seed_layer();
    let result = voronoi_diagram(&seeds, &mask(), false, Spacing::Auto).unwrap();

    assert_eq!(result.len(), 2);
    for (region, seed) in result.geoms().iter().zip(seeds.geoms()) {
        assert!(region.contains(seed));
    }
}

#[test]
fn output_regions_have_no_holes() {
    let result = voronoi_diagram(&two_seed_layer(), &mask(), true, Spacing::Distance(0.1)).unwrap();
    for region in result.geoms() {
        assert!(region.0.iter().all(|p| p.interiors().is_empty()));
    }
}

#[test]
fn polygonal_masks_are_accepted() {
    // Clip to a triangle that only covers the left seed's neighborhood.
    let triangle: Polygon<f64> = polygon![
        (x: -3.0, y: -3.0),
        (x: 1.9, y: -3.0),
        (x: -3.0, y: 3.0),
        (x: -3.0, y: -3.0),
    ];
    let result =
        voronoi_diagram(&two_seed_layer(), &triangle, true, Spacing::Distance(0.1)).unwrap();

    // The right seed's region lies entirely outside the mask and is dropped.
    assert_eq!(result.len(), 1);
}

#[test]
fn layer_mask_clips_like_its_union() {
    let seeds = two_seed_layer();
    let mask_layer =
        PolygonLayer::from_polygons(vec![mask().to_polygon()], Some(32650));
    let from_layer = voronoi_diagram(&seeds, &mask_layer, true, Spacing::Distance(0.1)).unwrap();
    let from_rect = voronoi_diagram(&seeds, &mask(), true, Spacing::Distance(0.1)).unwrap();
    assert_eq!(from_layer.len(), from_rect.len());
    for (a, b) in from_layer.geoms().iter().zip(from_rect.geoms()) {
        assert_relative_eq!(a.unsigned_area(), b.unsigned_area(), max_relative = 1e-9);
    }
}

#[test]
fn caller_layer_is_not_mutated() {
    let seeds = two_seed_layer();
    let before = seeds.clone();
    let _ = voronoi_diagram(&seeds, &mask(), true, Spacing::Distance(0.1)).unwrap();
    assert_eq!(seeds, before);
}

#[test]
fn empty_layer_is_rejected() {
    let empty = PolygonLayer::default();
    assert!(voronoi_diagram(&empty, &mask(), false, Spacing::Auto).is_err());
}
