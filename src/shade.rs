use crate::*;
use geo::BooleanOps;
use rayon::prelude::*;

/// Direction a directional light travels in.
///
/// `(0, 0, -1)` shines straight down.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Light {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Light {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn vector(&self) -> Point3 {
        [self.x, self.y, self.z]
    }
}

/// Inputs to [`build_shaded_relief`].
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShadeParams {
    pub light: Light,
    /// Vertical exaggeration applied to elevations before shading.
    pub z_factor: f64,
    /// Number of equal width luminosity classes.
    pub bins: usize,
}

impl Default for ShadeParams {
    /// Light from the north west, falling at 45°.
    fn default() -> Self {
        Self {
            light: Light::new(1.0, -1.0, -1.0),
            z_factor: 1.0,
            bins: 10,
        }
    }
}

impl ShadeParams {
    pub fn validate(&self) -> Result<()> {
        let light = self.light.vector();
        if !light.is_finite() || light.mag() == 0.0 {
            return Err(Error::InvalidLight { light });
        }
        if !self.z_factor.is_finite() || self.z_factor == 0.0 {
            return Err(Error::InvalidZFactor {
                z_factor: self.z_factor,
            });
        }
        if self.bins == 0 {
            return Err(Error::InvalidBinCount);
        }

        Ok(())
    }
}

/// The merged plan of all triangles in one luminosity class.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LightenedPolygon {
    /// Empty if no triangle fell in the class.
    pub polygon: geo::MultiPolygon<f64>,
    /// Midpoint of the class.
    pub luminosity: f64,
}

/// Illumination of `tri` by `light`, in `[0, 1]`.
///
/// The absolute cosine between the face normal and the light, with faces the light reaches
/// from behind set to 0. Elevations are multiplied by `z_factor` first. Degenerate triangles
/// give 0.
///
/// # Example
/// ```rust
/// # use relief::*;
/// let flat = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
/// assert_eq!(luminosity(&flat, Light::new(0.0, 0.0, -1.0), 1.0), 1.0);
/// // lit from underneath
/// assert_eq!(luminosity(&flat, Light::new(0.0, 0.0, 1.0), 1.0), 0.0);
/// ```
pub fn luminosity(tri: &Tri, light: Light, z_factor: f64) -> f64 {
    let mut tri = tri.map(|[x, y, z]| [x, y, z * z_factor]);
    if orient2d(tri[0], tri[1], tri[2]) < 0.0 {
        tri.swap(0, 1);
    }

    let plane = Plane::from(&tri);
    let l = light.vector();
    let n = plane.normal();

    let denom = n.mag() * l.mag();
    if denom == 0.0 || !denom.is_finite() {
        return 0.0;
    }

    // stepping along the light from the face lands above it: lit from behind
    if plane.eval(tri[0].add(l)) > 0.0 {
        return 0.0;
    }

    (dot_prod(n, l).abs() / denom).min(1.0)
}

/// Group the triangles of `surface` into `params.bins` equal width luminosity classes and merge
/// each class into one plan polygon.
///
/// Always returns exactly `params.bins` entries, ascending by luminosity, each tagged with the
/// midpoint of its class.
pub fn build_shaded_relief(
    surface: &Surface,
    params: &ShadeParams,
) -> Result<Vec<LightenedPolygon>> {
    params.validate()?;
    let tris = surface.triangles()?;

    let lums = tris
        .par_iter()
        .map(|t| luminosity(t, params.light, params.z_factor))
        .collect::<Vec<_>>();

    let bins = Bins::new(&lums, params.bins);
    let mut members = vec![Vec::new(); params.bins];
    for (tri, &l) in tris.iter().zip(&lums) {
        let footprint = Polygon2::footprint(tri);
        // no plan area, nothing to add to a union
        if footprint.signed_area() == 0.0 {
            log::trace!("skipping triangle with no plan area: {tri:?}");
            continue;
        }
        members[bins.index(l)].push(geo::MultiPolygon::from(geo::Polygon::from(&footprint)));
    }

    log::debug!(
        "shading {} triangles, luminosity {}..{}, bin occupancy {:?}",
        tris.len(),
        bins.min,
        bins.max,
        members.iter().map(Vec::len).collect::<Vec<_>>()
    );

    let out = members
        .into_par_iter()
        .enumerate()
        .map(|(i, polys)| LightenedPolygon {
            polygon: merge(polys),
            luminosity: bins.midpoint(i),
        })
        .collect();

    Ok(out)
}

/// Equal width classes over the observed luminosity span.
struct Bins {
    min: f64,
    max: f64,
    width: f64,
    count: usize,
}

impl Bins {
    fn new(lums: &[f64], count: usize) -> Self {
        let (min, max) = lums
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &l| {
                (lo.min(l), hi.max(l))
            });
        let width = (max - min) / count as f64;
        Self {
            min,
            max,
            width,
            count,
        }
    }

    /// The maximum itself lands one past the end, and belongs to the last class.
    fn index(&self, l: f64) -> usize {
        if self.width > 0.0 {
            (((l - self.min) / self.width) as usize).min(self.count - 1)
        } else {
            0
        }
    }

    fn midpoint(&self, i: usize) -> f64 {
        self.min + self.width * (i as f64 + 0.5)
    }
}

/// Union all polygons, pairing neighbours each round so the set halves every pass.
fn merge(mut polys: Vec<geo::MultiPolygon<f64>>) -> geo::MultiPolygon<f64> {
    while polys.len() > 1 {
        let mut it = polys.into_iter();
        let mut next = Vec::with_capacity(it.len() / 2 + 1);
        while let Some(a) = it.next() {
            next.push(match it.next() {
                Some(b) => a.union(&b),
                None => a,
            });
        }
        polys = next;
    }

    polys.pop().unwrap_or_else(|| geo::MultiPolygon::new(Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area as _;
    use quickcheck::TestResult;

    const DOWN: Light = Light {
        x: 0.0,
        y: 0.0,
        z: -1.0,
    };

    fn square(x: f64, y: f64) -> geo::MultiPolygon<f64> {
        let p = Polygon2::new([[x, y], [x + 1.0, y], [x + 1.0, y + 1.0], [x, y + 1.0]]).unwrap();
        geo::Polygon::from(&p).into()
    }

    #[test]
    fn lit_from_above() {
        let flat = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        assert_eq!(luminosity(&flat, DOWN, 1.0), 1.0);

        // winding does not matter
        let cw = [flat[1], flat[0], flat[2]];
        assert_eq!(luminosity(&cw, DOWN, 1.0), 1.0);

        // normal pointing along the light
        assert_eq!(luminosity(&flat, Light::new(0.0, 0.0, 1.0), 1.0), 0.0);
        assert_eq!(luminosity(&cw, Light::new(0.0, 0.0, 1.0), 1.0), 0.0);
    }

    #[test]
    fn pyramid_faces() {
        let gentle = [[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [0.0, 10.0, 1.0]];
        let steep = [[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [0.0, 1.0, 10.0]];
        let a = luminosity(&gentle, DOWN, 1.0);
        let b = luminosity(&steep, DOWN, 1.0);
        assert!(a > b, "{a} <= {b}");
        assert!((a - 100.0 / 10100f64.sqrt()).abs() < 1e-12);
        assert!((b - 10.0 / 10100f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn z_factor_steepens() {
        let t = [[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [0.0, 10.0, 5.0]];
        let a = luminosity(&t, DOWN, 1.0);
        let b = luminosity(&t, DOWN, 3.0);
        assert!(a > b);
    }

    #[test]
    fn degenerate_is_dark() {
        let line = [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]];
        assert_eq!(luminosity(&line, DOWN, 1.0), 0.0);
        let wall = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 0.0, 5.0]];
        assert_eq!(luminosity(&wall, DOWN, 1.0), 0.0);
    }

    #[quickcheck]
    fn luminosity_bounded(t: ArbTri, l: (i16, i16, i16), zf: i8) -> TestResult {
        if l == (0, 0, 0) || zf == 0 {
            return TestResult::discard();
        }
        let light = Light::new(l.0 as f64, l.1 as f64, l.2 as f64);
        let lum = luminosity(&t.0, light, zf as f64 / 8.0);
        TestResult::from_bool((0.0..=1.0).contains(&lum))
    }

    #[test]
    fn binning() {
        let b = Bins::new(&[0.2, 0.6, 1.0], 4);
        assert_eq!(b.index(0.2), 0);
        assert_eq!(b.index(0.5), 1);
        assert_eq!(b.index(1.0), 3);
        assert!((b.midpoint(0) - 0.3).abs() < 1e-12);
        assert!((b.midpoint(3) - 0.9).abs() < 1e-12);

        // one value, zero width
        let b = Bins::new(&[0.7, 0.7], 3);
        assert_eq!(b.index(0.7), 0);
        assert_eq!(b.midpoint(2), 0.7);
    }

    #[test]
    fn merging() {
        assert!(merge(Vec::new()).0.is_empty());

        let one = merge(vec![square(0.0, 0.0)]);
        assert_eq!(one.0.len(), 1);

        // a 3x1 strip plus a detached square, odd count exercises the carry
        let m = merge(vec![
            square(0.0, 0.0),
            square(1.0, 0.0),
            square(2.0, 0.0),
            square(5.0, 5.0),
            square(5.0, 6.0),
        ]);
        assert_eq!(m.0.len(), 2);
        assert!((m.unsigned_area() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn hill_relief() {
        let surface = Surface::Triangles(dummy_hill());
        let params = ShadeParams {
            bins: 4,
            ..Default::default()
        };
        let out = build_shaded_relief(&surface, &params).unwrap();
        assert_eq!(out.len(), 4);

        let lums = dummy_hill()
            .iter()
            .map(|t| luminosity(t, params.light, params.z_factor))
            .collect::<Vec<_>>();
        let min = lums.iter().copied().fold(f64::INFINITY, f64::min);
        let max = lums.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let w = (max - min) / 4.0;
        for (i, p) in out.iter().enumerate() {
            assert!((p.luminosity - (min + w * (i as f64 + 0.5))).abs() < 1e-12);
        }

        let area = out.iter().map(|p| p.polygon.unsigned_area()).sum::<f64>();
        assert!((area - 400.0).abs() < 1e-6, "{area}");
    }

    #[test]
    fn single_bin_merges_everything() {
        let surface = Surface::Triangles(dummy_hill());
        let params = ShadeParams {
            bins: 1,
            ..Default::default()
        };
        let out = build_shaded_relief(&surface, &params).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].polygon.0.len(), 1);
        assert!((out[0].polygon.unsigned_area() - 400.0).abs() < 1e-6);
    }

    #[test]
    fn empty_bin() {
        let light = Light::new(1.0, 0.0, -1.0);
        // z = x faces the light head on, z = -2x is lit from behind
        let lit = [[0.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 1.0, 0.0]];
        let dark = [[5.0, 0.0, -10.0], [6.0, 0.0, -12.0], [5.0, 1.0, -10.0]];
        assert!((luminosity(&lit, light, 1.0) - 1.0).abs() < 1e-12);
        assert_eq!(luminosity(&dark, light, 1.0), 0.0);

        let params = ShadeParams {
            light,
            z_factor: 1.0,
            bins: 3,
        };
        let out = build_shaded_relief(&Surface::Triangles(vec![lit, dark]), &params).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].polygon.0.len(), 1);
        assert!(out[1].polygon.0.is_empty());
        assert_eq!(out[2].polygon.0.len(), 1);
        assert!((out[1].luminosity - 0.5).abs() < 1e-12);
    }

    #[test]
    fn rejects_params() {
        let surface = Surface::Triangles(dummy_hill());
        let check = |params: ShadeParams| build_shaded_relief(&surface, &params).unwrap_err();

        let p = ShadeParams {
            light: Light::new(0.0, 0.0, 0.0),
            ..Default::default()
        };
        assert!(matches!(check(p), Error::InvalidLight { .. }));

        let p = ShadeParams {
            light: Light::new(f64::NAN, 0.0, -1.0),
            ..Default::default()
        };
        assert!(matches!(check(p), Error::InvalidLight { .. }));

        let p = ShadeParams {
            z_factor: 0.0,
            ..Default::default()
        };
        assert_eq!(check(p), Error::InvalidZFactor { z_factor: 0.0 });

        let p = ShadeParams {
            bins: 0,
            ..Default::default()
        };
        assert_eq!(check(p), Error::InvalidBinCount);
    }
}
