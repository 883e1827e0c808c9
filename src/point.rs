use std::ops;

/// Tolerance under which two coordinates are considered the same location.
pub const SAME_POINT_TOL: f64 = 1e-7;

pub trait Point: Copy + Sized + IntoIterator<Item = f64> {
    /// Set all the values to this value.
    fn all(v: f64) -> Self;

    /// Set all values to zero.
    fn zero() -> Self {
        Self::all(0.)
    }

    /// Scale point by multiplying all dimensions by `scalar`.
    fn scale(self, scalar: f64) -> Self;

    /// Calculate the magnitude of the vector.
    fn mag(self) -> f64 {
        self.into_iter().map(|a| a * a).sum::<f64>().sqrt()
    }

    /// Normalise the vector by the magnitude.
    fn unit(self) -> Self {
        self.scale(self.mag().recip())
    }

    /// Return the minimum of each dimension.
    fn min_all(self, b: Self) -> Self {
        Self::xfm(self, b, f64::min)
    }

    /// Return the maximum of each dimension.
    fn max_all(self, b: Self) -> Self {
        Self::xfm(self, b, f64::max)
    }

    /// All dimensions are finite (not NaN or infinite).
    fn is_finite(self) -> bool {
        self.into_iter().all(f64::is_finite)
    }

    /// Perform a transformation on each pair of dimensions.
    fn xfm<F: Fn(f64, f64) -> f64>(self, b: Self, f: F) -> Self;
}

pub trait Add<Rhs = Self> {
    fn add(self, rhs: Rhs) -> Self;
    fn sub(self, rhs: Rhs) -> Self
    where
        Self: Sized + Copy,
        Rhs: Point,
    {
        self.add(rhs.scale(-1.0))
    }
}

/// 2D Point (X,Y).
pub type Point2 = [f64; 2];

/// 3D Point (X,Y,Z).
pub type Point3 = [f64; 3];

impl Add for Point2 {
    fn add(self, rhs: Self) -> Self {
        Self::xfm(self, rhs, ops::Add::add)
    }

    fn sub(self, rhs: Self) -> Self {
        Self::xfm(self, rhs, ops::Sub::sub)
    }
}
impl Point for Point2 {
    fn all(v: f64) -> Self {
        [v; 2]
    }
    fn scale(self, scalar: f64) -> Self {
        self.map(|f| f * scalar)
    }
    fn xfm<F: Fn(f64, f64) -> f64>(self, [bx, by]: Self, f: F) -> Self {
        let [ax, ay] = self;
        [f(ax, bx), f(ay, by)]
    }
}

impl Add for Point3 {
    fn add(self, rhs: Self) -> Self {
        Self::xfm(self, rhs, ops::Add::add)
    }

    fn sub(self, rhs: Self) -> Self {
        Self::xfm(self, rhs, ops::Sub::sub)
    }
}
impl Point for Point3 {
    fn all(v: f64) -> Self {
        [v; 3]
    }
    fn scale(self, scalar: f64) -> Self {
        self.map(|f| f * scalar)
    }
    fn xfm<F: Fn(f64, f64) -> f64>(self, [bx, by, bz]: Self, f: F) -> Self {
        let [ax, ay, az] = self;
        [f(ax, bx), f(ay, by), f(az, bz)]
    }
}

pub trait ToPoint2 {
    fn to_p2(self) -> Point2;
}

impl ToPoint2 for Point2 {
    fn to_p2(self) -> Point2 {
        self
    }
}
impl ToPoint2 for &Point2 {
    fn to_p2(self) -> Point2 {
        *self
    }
}
impl ToPoint2 for Point3 {
    fn to_p2(self) -> Point2 {
        let [x, y, _] = self;
        [x, y]
    }
}
impl ToPoint2 for &Point3 {
    fn to_p2(self) -> Point2 {
        (*self).to_p2()
    }
}

pub trait WithZ: ToPoint2 + Sized {
    fn with_z(self, z: f64) -> Point3 {
        let [x, y] = self.to_p2();
        [x, y, z]
    }
}

impl WithZ for Point2 {}
impl WithZ for Point3 {}

pub fn dot_prod(a: Point3, b: Point3) -> f64 {
    a.into_iter().zip(b).map(|(a, b)| a * b).sum()
}

#[allow(clippy::many_single_char_names)]
pub fn xprod(a: Point3, b: Point3) -> Point3 {
    let [ax, ay, az] = a;
    let [bx, by, bz] = b;
    let x = ay * bz - az * by;
    let y = az * bx - ax * bz;
    let z = ax * by - ay * bx;
    [x, y, z]
}

/// Orientation of three points in plan.
///
/// > 0 : `a -> b -> c` turns counter-clockwise
/// = 0 : collinear
/// < 0 : clockwise
pub fn orient2d(a: impl ToPoint2, b: impl ToPoint2, c: impl ToPoint2) -> f64 {
    let a = a.to_p2();
    let [ux, uy] = b.to_p2().sub(a);
    let [vx, vy] = c.to_p2().sub(a);
    ux * vy - uy * vx
}

/// Apply an ordering to points by testing each x,y,z.
pub fn ordpt<P: Point>(a: P, b: P) -> std::cmp::Ordering {
    use std::cmp::Ordering::Equal;

    a.into_iter()
        .zip(b)
        .map(|(a, b)| a.total_cmp(&b))
        .find(|&o| o != Equal)
        .unwrap_or(Equal)
}

/// Same plan location, with tolerance.
pub fn same_point2(a: impl ToPoint2, b: impl ToPoint2) -> bool {
    a.to_p2()
        .xfm(b.to_p2(), |a, b| (a - b).abs())
        .into_iter()
        .all(|d| d < SAME_POINT_TOL)
}

/// Same location in all three dimensions, with tolerance.
pub fn same_point3(a: Point3, b: Point3) -> bool {
    a.xfm(b, |a, b| (a - b).abs())
        .into_iter()
        .all(|d| d < SAME_POINT_TOL)
}
