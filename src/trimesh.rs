use crate::*;

/// Triangle represented by 3 points (A, B, C).
pub type Tri = [Point3; 3];

impl Aabb for Tri {
    type Space = Point3;
    fn aabb(&self) -> Extents<Self::Space> {
        Extents::from_iter(*self)
    }
}

/// A triangle mesh.
///
/// `PartialEq` is _derived_ but does _exact_ equality including structural equality. This is
/// **not** the same as value equality (it is a _subset_ of it) so `PartialEq` should not be used
/// for value equality.
#[derive(Debug, PartialEq, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TriMesh {
    /// The _distinct_ points.
    points: Vec<Point3>,
    /// Each _triangle_ is a triplet of points.
    ///
    /// Each tuple entry is the _index_ back into the `points`.
    /// This is done to save space so a 'triangle' takes up 12 bytes,
    /// and points are not duplicated. (A point itself takes **24 bytes**).
    triangles: Vec<(u32, u32, u32)>,
}

impl TriMesh {
    pub fn from_raw(points: Vec<Point3>, triangles: Vec<(u32, u32, u32)>) -> Self {
        let mut x = Self { points, triangles };
        x.consolidate();
        x
    }

    /// Delaunay triangulate `points` in plan.
    ///
    /// Elevations are carried through untouched. Points sharing a plan location with an earlier
    /// point are not used.
    ///
    /// # Example
    /// ```rust
    /// # use relief::*;
    /// let mesh = TriMesh::from_points(vec![
    ///     [0.0, 0.0, 1.0],
    ///     [1.0, 0.0, 2.0],
    ///     [1.0, 1.0, 3.0],
    ///     [0.0, 1.0, 4.0],
    /// ]).unwrap();
    ///
    /// assert_eq!(mesh.tri_len(), 2);
    /// assert_eq!(mesh.point_len(), 4);
    /// ```
    pub fn from_points(points: Vec<Point3>) -> Result<Self> {
        if points.len() < 3 {
            return Err(Error::InsufficientPoints {
                required: 3,
                actual: points.len(),
            });
        }
        if let Some(&point) = points.iter().find(|p| !p.is_finite()) {
            return Err(Error::NonFiniteCoordinate { point });
        }

        let coords = points
            .iter()
            .map(|&[x, y, _]| delaunator::Point { x, y })
            .collect::<Vec<_>>();
        let triangulation = delaunator::triangulate(&coords);
        let triangles = triangulation
            .triangles
            .chunks_exact(3)
            .map(|c| (c[0] as u32, c[1] as u32, c[2] as u32))
            .collect::<Vec<_>>();

        log::debug!(
            "triangulated {} points into {} triangles",
            points.len(),
            triangles.len()
        );

        Ok(Self::from_raw(points, triangles))
    }

    pub fn decompose(self) -> (Vec<Point3>, Vec<(u32, u32, u32)>) {
        let Self { points, triangles } = self;
        (points, triangles)
    }

    pub fn point_len(&self) -> usize {
        self.points.len()
    }

    pub fn tri_len(&self) -> usize {
        self.triangles.len()
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn tri_indices(&self) -> &[(u32, u32, u32)] {
        &self.triangles
    }

    pub fn tris(&self) -> impl ExactSizeIterator<Item = Tri> + '_ {
        self.triangles.iter().map(move |&(a, b, c)| {
            [
                self.points[a as usize],
                self.points[b as usize],
                self.points[c as usize],
            ]
        })
    }

    /// Ensures that there are **not** additional points that do not have faces by removing these
    /// extra points.
    pub fn consolidate(&mut self) {
        let len = self.point_len();
        let mut used = vec![false; len];
        for (a, b, c) in self.triangles.iter().copied() {
            used[a as usize] = true;
            used[b as usize] = true;
            used[c as usize] = true;
        }

        // new index of every kept point, built in one pass
        let mut remap = vec![0u32; len];
        let mut next = 0u32;
        for (i, &u) in used.iter().enumerate() {
            remap[i] = next;
            if u {
                next += 1;
            }
        }

        let mut i = 0;
        self.points.retain(|_| {
            let keep = used[i];
            i += 1;
            keep
        });

        for (a, b, c) in self.triangles.iter_mut() {
            *a = remap[*a as usize];
            *b = remap[*b as usize];
            *c = remap[*c as usize];
        }
    }
}

impl FromIterator<Tri> for TriMesh {
    /// Points are shared between triangles when they are bitwise equal.
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Tri>,
    {
        let mut points = Vec::new();
        let mut lookup: HashMap<[u64; 3], u32> = HashMap::default();
        let mut get_or_add = |p: Point3| {
            *lookup.entry(p.map(f64::to_bits)).or_insert_with(|| {
                points.push(p);
                (points.len() - 1) as u32
            })
        };

        let triangles = iter
            .into_iter()
            .map(|[a, b, c]| (get_or_add(a), get_or_add(b), get_or_add(c)))
            .collect();

        TriMesh { points, triangles }
    }
}

/// Test if a point lays **on** a [`TriMesh`].
///
/// Note this solely tests for 2D intersection.
impl Envelops<Point2> for TriMesh {
    fn envelops(&self, p: Point2) -> bool {
        if Extents2::from(self.aabb()).envelops(p) {
            self.tris().any(|tri| polygon::point_inside(&tri, p))
        } else {
            false
        }
    }
}

impl Aabb for TriMesh {
    type Space = Point3;
    fn aabb(&self) -> Extents3 {
        self.points().iter().copied().collect()
    }
}
