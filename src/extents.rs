use crate::*;

pub type Extents2 = Extents<Point2>;
pub type Extents3 = Extents<Point3>;

/// Axis aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Extents<P> {
    pub origin: P,
    pub size: P,
}

impl<P> Extents<P>
where
    P: Copy + Point + Add,
{
    pub fn zero() -> Self {
        Self {
            origin: P::zero(),
            size: P::zero(),
        }
    }

    pub fn from_min_max(min: P, max: P) -> Self {
        let size = max.sub(min);

        Self { origin: min, size }
    }

    pub fn max(&self) -> P {
        self.origin.add(self.size)
    }

    pub fn union(self, other: Self) -> Self {
        let origin = self.origin.min_all(other.origin);
        let max = self.max().max_all(other.max());
        let size = max.sub(origin);

        Self { origin, size }
    }

    /// Boxes touch or overlap. Touching boundaries count as intersecting.
    pub fn intersects(self, other: Self) -> bool {
        let outside = self.max().into_iter().zip(other.origin).any(|(m, c)| m < c)
            || self.origin.into_iter().zip(other.max()).any(|(o, c)| o > c);

        !outside
    }

    /// Expand the extents by a value.
    ///
    /// A negative value can be used to _shrink_ the extents.
    /// Note that shrinking beyond `size / 2` will result in a [`Self::zero`].
    /// Non-finite `by` values are ignored and `self` is returned unchanged.
    ///
    /// # Example
    /// ```rust
    /// # use relief::*;
    /// let e = Extents2::from_min_max([0.0, 0.0], [1.0, 1.0]);
    ///
    /// assert_eq!(e.expand(0.5), Extents2 {
    ///     origin: [-0.5, -0.5],
    ///     size: [2.0, 2.0]
    /// });
    /// ```
    pub fn expand(self, by: f64) -> Self {
        if !by.is_finite() {
            return self;
        }

        let x = P::all(by);

        let size = self.size.add(x.scale(2.0));
        if size.into_iter().any(|x| x < 0.0) {
            return Self::zero();
        }

        let origin = self.origin.sub(x);

        Self { origin, size }
    }
}

impl Extents2 {
    /// Split the box into four equal quadrants.
    ///
    /// Order is bottom-left, bottom-right, top-left, top-right.
    pub fn quadrants(&self) -> [Self; 4] {
        let size = self.size.scale(0.5);
        let [x0, y0] = self.origin;
        let [x1, y1] = self.origin.add(size);
        [[x0, y0], [x1, y0], [x0, y1], [x1, y1]].map(|origin| Self { origin, size })
    }

    /// This box fully contains `other` (shared boundaries allowed).
    pub fn contains(&self, other: &Self) -> bool {
        self.envelops(other.origin) && self.envelops(other.max())
    }
}

impl Area for Extents2 {
    /// Plan area of the box.
    fn area(&self) -> f64 {
        let [w, h] = self.size;
        w * h
    }
}

impl From<Extents3> for Extents2 {
    /// Convert a 3D AABB to 2D AABB by dropping Z value.
    fn from(value: Extents3) -> Self {
        let Extents { origin, size } = value;
        Self {
            origin: origin.to_p2(),
            size: size.to_p2(),
        }
    }
}

impl FromIterator<Point3> for Extents3 {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Point3>,
    {
        let mut iter = iter.into_iter();
        let Some(init) = iter.next() else { return Self::zero(); };

        let (min, max) = iter.fold((init, init), |(min, max), p| {
            (min.min_all(p), max.max_all(p))
        });

        Self::from_min_max(min, max)
    }
}

impl FromIterator<Point2> for Extents2 {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Point2>,
    {
        iter.into_iter()
            .map(|p| p.with_z(0.0))
            .collect::<Extents3>()
            .into()
    }
}

impl<O: ToPoint2> Envelops<O> for Extents2 {
    /// Inclusive of the boundary.
    fn envelops(&self, p: O) -> bool {
        let [x, y] = p.to_p2();

        let [mx, my] = self.origin;

        if x < mx || y < my {
            return false;
        }

        let [mx, my] = self.max();

        x <= mx && y <= my
    }
}

pub trait Aabb {
    type Space;

    fn aabb(&self) -> Extents<Self::Space>;
}
