//! Approximate Voronoi (Thiessen) diagrams for polygon features.
//!
//! Given a layer of seed polygons and a clipping boundary, [`voronoi_diagram`]
//! produces one region per seed: the part of the plane closer to that seed's
//! boundary than to any other seed's, clipped to the boundary and stripped of
//! holes. The tessellation itself is delegated to an external constructor
//! ([`voronoice`]) over the seeds' boundary vertices; denser boundary sampling
//! via [`densify_polygon`] makes the result approximate a true polygon-based
//! diagram rather than a centroid-based one.

mod densify;
mod distance;
mod holes;
mod layer;
mod voronoi;

pub use densify::{densify_polygon, Spacing};
pub use distance::minimum_distance;
pub use holes::{drop_holes, drop_holes_multi};
pub use layer::PolygonLayer;
pub use voronoi::{voronoi_diagram, ClipMask};
