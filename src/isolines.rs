use crate::*;
use rayon::prelude::*;

/// Contour `surface` at each of `levels`.
///
/// Returns one [`Polyline`] per level, in the same order as `levels`. A level outside the
/// surface's elevation span gives an empty polyline. Paths are per-triangle pieces and are
/// **not** joined into continuous chains.
///
/// `levels` must be strictly descending.
///
/// # Example
/// ```rust
/// # use relief::*;
/// let surface = Surface::Triangles(vec![[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 10.0]]]);
/// let lines = build_isolines(&surface, &[20.0, 5.0]).unwrap();
///
/// assert_eq!(lines.len(), 2);
/// assert!(lines[0].is_empty());
/// assert_eq!(lines[1].len(), 1);
/// ```
pub fn build_isolines(surface: &Surface, levels: &[f64]) -> Result<Vec<Polyline>> {
    validate_levels(levels)?;
    let tris = surface.triangles()?;
    let faces = Faces::new(tris);

    let lines = faces.isolines(levels);
    log::debug!(
        "contoured {} levels over {} faces, {} paths",
        levels.len(),
        faces.len(),
        lines.iter().map(Polyline::len).sum::<usize>()
    );

    Ok(lines)
}

/// A triangle with its elevation span cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub minz: f64,
    pub maxz: f64,
    pub tri: Tri,
}

impl From<Tri> for Face {
    fn from(tri: Tri) -> Self {
        let [[_, _, a], [_, _, b], [_, _, c]] = tri;
        let minz = a.min(b).min(c);
        let maxz = a.max(b).max(c);
        Self { minz, maxz, tri }
    }
}

/// Triangles sorted ascending by their minimum elevation.
///
/// Built once per call and shared, read-only, by every level query.
#[derive(Debug, Clone, Default)]
pub struct Faces(Vec<Face>);

impl Faces {
    pub fn new(tris: impl IntoIterator<Item = Tri>) -> Self {
        let mut faces = tris.into_iter().map(Face::from).collect::<Vec<_>>();
        // stable, so equal minimums keep input order and output is deterministic
        faces.sort_by(|a, b| a.minz.total_cmp(&b.minz));
        Self(faces)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Face> + '_ {
        self.0.iter()
    }

    /// Elevation span over all faces, `None` if there are no faces.
    pub fn z_range(&self) -> Option<(f64, f64)> {
        let lo = self.0.first()?.minz;
        let hi = self.0.iter().map(|f| f.maxz).fold(f64::NEG_INFINITY, f64::max);
        Some((lo, hi))
    }

    /// Contour each level, in parallel, preserving the order of `levels`.
    pub fn isolines(&self, levels: &[f64]) -> Vec<Polyline> {
        levels.par_iter().map(|&z| self.isoline(z)).collect()
    }

    /// Contour the faces at elevation `z`.
    pub fn isoline(&self, z: f64) -> Polyline {
        // Faces are sorted by minimum, so once a face has `z <= minz` every later face does too
        // and none of them can cross `z`. Only the prefix with `minz < z` is scanned.
        let end = self.0.partition_point(|f| f.minz < z);

        self.0[..end]
            .iter()
            .filter(|f| z <= f.maxz)
            .filter_map(|f| contour_tri(&f.tri, z))
            .collect::<Polyline>()
            .simplify()
    }
}

/// The piece of `tri` lying at elevation `z`.
///
/// Expects `min < z <= max` of the triangle's elevations.
#[allow(clippy::float_cmp)]
fn contour_tri(tri: &Tri, z: f64) -> Option<LinePath> {
    let on = tri.map(|[_, _, tz]| tz == z);

    match on.iter().filter(|&&x| x).count() {
        // flat at z, contributes nothing
        3 => None,
        // an edge lies in the plane
        2 => Some(
            tri.iter()
                .zip(on)
                .filter_map(|(p, on)| on.then_some(*p))
                .collect(),
        ),
        _ => {
            let path = [(0, 1), (1, 2), (2, 0)]
                .into_iter()
                .map(|(a, b)| (tri[a], tri[b]))
                .filter(|&(a, b)| crosses(a[2], b[2], z))
                .map(|(a, b)| point_at_z(a, b, z))
                .collect::<LinePath>();
            (!path.is_empty()).then_some(path)
        }
    }
}

/// `z` lies between `za` and `zb`, inclusive.
fn crosses(za: f64, zb: f64, z: f64) -> bool {
    (za <= z && z <= zb) || (zb <= z && z <= za)
}

/// Linear interpolation along `a -> b` to elevation `z`.
///
/// The edge is always walked from its lesser end point (see [`ordpt`]) so the two triangles
/// sharing an edge produce bitwise identical points.
/// Callers guarantee `a` and `b` are not both at `z`.
fn point_at_z(a: Point3, b: Point3, z: f64) -> Point3 {
    let (a, b) = if ordpt(a, b).is_gt() { (b, a) } else { (a, b) };
    let [xa, ya, za] = a;
    let [xb, yb, zb] = b;
    let f = (z - za) / (zb - za);
    [xa + f * (xb - xa), ya + f * (yb - ya), z]
}
