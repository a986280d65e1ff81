use geo::{BooleanOps, MultiPolygon, Polygon};

/// A collection of polygonal features tagged with a coordinate reference
/// system (EPSG code, if known).
///
/// The layer is the unit of input and output for every operation in this
/// crate. The EPSG tag is carried through unchanged — no transformation is
/// ever performed. Features are identified by position; row order is
/// preserved by [`densify_polygon`](crate::densify_polygon) and arbitrary in
/// the output of [`voronoi_diagram`](crate::voronoi_diagram).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonLayer {
    geoms: Vec<MultiPolygon<f64>>,
    epsg: Option<u32>,
}

impl PolygonLayer {
    /// Construct a layer from a vector of MultiPolygons.
    pub fn new(geoms: Vec<MultiPolygon<f64>>, epsg: Option<u32>) -> Self {
        Self { geoms, epsg }
    }

    /// Construct a layer with one single-polygon feature per input polygon.
    pub fn from_polygons(polygons: Vec<Polygon<f64>>, epsg: Option<u32>) -> Self {
        Self {
            geoms: polygons.into_iter().map(MultiPolygon::from).collect(),
            epsg,
        }
    }

    /// Get the number of features.
    #[inline] pub fn len(&self) -> usize { self.geoms.len() }

    /// Check if there are no features.
    #[inline] pub fn is_empty(&self) -> bool { self.geoms.is_empty() }

    /// Get a reference to the list of feature geometries.
    #[inline] pub fn geoms(&self) -> &Vec<MultiPolygon<f64>> { &self.geoms }

    /// Get the EPSG code, if known.
    #[inline] pub fn epsg(&self) -> Option<u32> { self.epsg }

    /// Compute the union of all features into a single MultiPolygon.
    /// This method may be slow for large numbers of complex polygons.
    pub fn union(&self) -> Option<MultiPolygon<f64>> {
        self.geoms.iter().cloned().reduce(|a, b| a.union(&b))
    }
}
