use crate::*;

/// Ax + By + Cz = D
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    d: f64,
    normal: Point3,
}

impl Plane {
    pub fn new(point: Point3, normal: Point3) -> Self {
        let d = dot_prod(normal, point);
        Self { d, normal }
    }

    pub fn a(&self) -> f64 {
        self.normal[0]
    }

    pub fn b(&self) -> f64 {
        self.normal[1]
    }

    pub fn c(&self) -> f64 {
        self.normal[2]
    }

    pub fn d(&self) -> f64 {
        self.d
    }

    /// The (non-normalised) normal `[A, B, C]`.
    pub fn normal(&self) -> Point3 {
        self.normal
    }

    /// The normal has no length, the plane was built from collinear points.
    pub fn is_degenerate(&self) -> bool {
        self.normal.mag() == 0.0
    }

    pub fn is_vertical(&self) -> bool {
        self.c() == 0.0
    }

    /// Evaluate the plane equation at `p`: `Ax + By + Cz - D`.
    ///
    /// Positive values are on the side the normal points to, zero is on the plane.
    pub fn eval(&self, p: Point3) -> f64 {
        dot_prod(self.normal, p) - self.d
    }

    /// The elevation of the plane at the plan location `p`.
    ///
    /// Returns `None` if the plane is vertical (c == 0).
    pub fn register_z(&self, p: impl ToPoint2) -> Option<f64> {
        if self.is_vertical() {
            return None;
        }

        let [px, py] = p.to_p2();

        let i = self.d() - self.a() * px - self.b() * py;
        Some(i / self.c())
    }
}

impl From<&Tri> for Plane {
    /// Normal follows the right hand rule around `tri[0] -> tri[1] -> tri[2]`.
    fn from(tri: &Tri) -> Self {
        let a = tri[1].sub(tri[0]);
        let b = tri[2].sub(tri[0]);
        Plane::new(tri[0], xprod(a, b))
    }
}

impl From<Tri> for Plane {
    fn from(tri: Tri) -> Self {
        Self::from(&tri)
    }
}
