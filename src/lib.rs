//! Contouring and shading of triangulated elevation surfaces.
//!
//! Three products are derived from a TIN:
//! - contour polylines at chosen elevations ([`build_isolines`]),
//! - polygons tagged with the elevation band they fall in
//!   ([`build_polygons_for_level_ranges`]),
//! - polygons grouped by illumination under a directional light ([`build_shaded_relief`]).
//!
//! Each build call is self contained; nothing is cached between calls.
use rustc_hash::FxHashMap as HashMap;
use std::{fmt, iter::FromIterator};

#[cfg(test)]
extern crate quickcheck;
#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;

mod classify;
mod error;
mod extents;
mod index;
mod isolines;
mod levels;
mod plane;
mod point;
pub mod polygon;
mod polygonize;
mod polyline;
mod shade;
mod surface;
mod trimesh;

pub use classify::*;
pub use error::*;
pub use extents::*;
pub use index::*;
pub use isolines::*;
pub use levels::*;
pub use plane::*;
pub use point::*;
pub use polygon::*;
pub use polygonize::*;
pub use polyline::*;
pub use shade::*;
pub use surface::*;
pub use trimesh::*;

pub trait Envelops<O> {
    fn envelops(&self, object: O) -> bool;
}

/// Area can be calculated from an object.
///
/// Note that area is contextual from the object.
/// For instance, a [`Polygon2`] would be the _plan_ area, an [`Extents2`] the area of the box.
/// If implementing this trait be sure to be **explicit** about the area being calculated.
pub trait Area {
    /// Calculate the area of an object.
    fn area(&self) -> f64;
}

/// A 3x3 grid of points with a smooth hill in the middle, triangulated.
#[cfg(test)]
fn dummy_hill() -> Vec<Tri> {
    let pts = (0..3)
        .flat_map(|y| (0..3).map(move |x| (x, y)))
        .map(|(x, y)| {
            let z = if x == 1 && y == 1 { 10.0 } else { (x + y) as f64 };
            [x as f64 * 10.0, y as f64 * 10.0, z]
        })
        .collect::<Vec<_>>();
    TriMesh::from_points(pts)
        .expect("grid triangulates")
        .tris()
        .collect()
}

/// A triangle with finite, bounded coordinates.
#[cfg(test)]
#[derive(Clone, Debug)]
struct ArbTri(pub Tri);

#[cfg(test)]
impl quickcheck::Arbitrary for ArbTri {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let mut f = || <i16 as quickcheck::Arbitrary>::arbitrary(g) as f64 / 64.0;
        let mut p = || [f(), f(), f()];
        Self([p(), p(), p()])
    }
}
