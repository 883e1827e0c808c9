use crate::*;

/// The input surface of a build call.
///
/// Both variants are normalised into a single owned triangle sequence by
/// [`Surface::triangles`], so every build operation runs the same pipeline whichever form the
/// caller has.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Surface {
    /// Scattered elevation samples, Delaunay triangulated in plan.
    Points(Vec<Point3>),
    /// An already triangulated surface.
    Triangles(Vec<Tri>),
}

impl Surface {
    /// The triangles of the surface.
    ///
    /// Triangulates when built from points. Fails if the surface is empty or has non-finite
    /// coordinates.
    pub fn triangles(&self) -> Result<Vec<Tri>> {
        let tris = match self {
            Surface::Points(points) => TriMesh::from_points(points.clone())?.tris().collect(),
            Surface::Triangles(tris) => {
                if let Some(&point) = tris.iter().flatten().find(|p| !p.is_finite()) {
                    return Err(Error::NonFiniteCoordinate { point });
                }
                tris.clone()
            }
        };

        if tris.is_empty() {
            Err(Error::EmptySurface)
        } else {
            Ok(tris)
        }
    }
}

impl From<TriMesh> for Surface {
    fn from(mesh: TriMesh) -> Self {
        Surface::Triangles(mesh.tris().collect())
    }
}

impl From<Vec<Point3>> for Surface {
    fn from(points: Vec<Point3>) -> Self {
        Surface::Points(points)
    }
}

impl From<Vec<Tri>> for Surface {
    fn from(tris: Vec<Tri>) -> Self {
        Surface::Triangles(tris)
    }
}

/// Lowest and highest elevation over all triangle vertices.
pub fn z_range(tris: &[Tri]) -> (f64, f64) {
    tris.iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p[2]), hi.max(p[2]))
        })
}
