use geo::{MultiPolygon, Polygon};

/// Remove the holes from a polygon, keeping only its exterior ring.
pub fn drop_holes(polygon: &Polygon<f64>) -> Polygon<f64> {
    Polygon::new(polygon.exterior().clone(), Vec::new())
}

/// Remove the holes from every constituent of a MultiPolygon.
pub fn drop_holes_multi(mp: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    MultiPolygon(mp.0.iter().map(drop_holes).collect())
}
