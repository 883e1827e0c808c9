use crate::*;

/// An ordered sequence of coordinates.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LinePath(Vec<Point3>);

impl LinePath {
    pub fn new<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Point3>,
    {
        LinePath(points.into_iter().collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn pts(&self) -> &[Point3] {
        &self.0
    }

    pub fn first(&self) -> Option<Point3> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<Point3> {
        self.0.last().copied()
    }

    /// Removes consecutive duplicates and interior points collinear with their neighbours.
    ///
    /// End points are never moved. Duplicates are judged with [`same_point3`].
    pub fn simplify(&mut self) {
        let pts = &mut self.0;
        pts.dedup_by(|b, a| same_point3(*a, *b));

        if pts.len() < 3 {
            return;
        }

        let mut keep = Vec::with_capacity(pts.len());
        let mut prev = pts[0];
        keep.push(prev);
        for i in 1..pts.len() - 1 {
            if !collinear(prev, pts[i], pts[i + 1]) {
                prev = pts[i];
                keep.push(prev);
            }
        }
        keep.push(pts[pts.len() - 1]);

        *pts = keep;
    }
}

/// `b` lies on the segment `a -> c`, in 3D.
fn collinear(a: Point3, b: Point3, c: Point3) -> bool {
    let ab = b.sub(a);
    let ac = c.sub(a);
    let cross = xprod(ab, ac).mag();
    let scale = ab.mag() * ac.mag();
    cross <= SAME_POINT_TOL * scale && dot_prod(ab, ac) >= 0.0 && ab.mag() <= ac.mag()
}

impl FromIterator<Point3> for LinePath {
    fn from_iter<I: IntoIterator<Item = Point3>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl IntoIterator for LinePath {
    type Item = Point3;
    type IntoIter = std::vec::IntoIter<Self::Item>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A set of [`LinePath`]s. May hold no paths at all.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Polyline(Vec<LinePath>);

impl Polyline {
    pub fn new(paths: Vec<LinePath>) -> Self {
        Self(paths)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn paths(&self) -> &[LinePath] {
        &self.0
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &LinePath> + '_ {
        self.0.iter()
    }

    /// Simplify every path, dropping those left with fewer than two points.
    ///
    /// Paths are not joined to each other.
    pub fn simplify(mut self) -> Self {
        self.0.iter_mut().for_each(LinePath::simplify);
        self.0.retain(|p| p.len() >= 2);
        self
    }
}

impl FromIterator<LinePath> for Polyline {
    fn from_iter<I: IntoIterator<Item = LinePath>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Polyline {
    type Item = LinePath;
    type IntoIter = std::vec::IntoIter<Self::Item>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
