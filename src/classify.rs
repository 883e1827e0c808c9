use crate::*;
use geo::{ConvexHull, InteriorPoint};

/// A polygon of the surface's plan, tagged with the elevation band it lies in.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LevelRangePolygon {
    pub range: LevelRange,
    pub polygon: geo::Polygon<f64>,
}

/// Split the plan of `surface` into polygons bounded by the contours at `levels` and tag each
/// with its [`LevelRange`].
///
/// Uses the default [`IndexParams`] and [`Polygonizer`].
/// See [`build_polygons_for_level_ranges_with`].
pub fn build_polygons_for_level_ranges(
    surface: &Surface,
    levels: &[f64],
) -> Result<Vec<LevelRangePolygon>> {
    build_polygons_for_level_ranges_with(
        surface,
        levels,
        &IndexParams::default(),
        &Polygonizer::default(),
    )
}

/// Split the plan of `surface` into polygons bounded by the contours at `levels` and tag each
/// with its [`LevelRange`].
///
/// The contours, closed off by the convex hull of the surface, are handed to `polygonizer`.
/// Each resulting polygon is located on the mesh at an interior point and the surface elevation
/// there decides its range. Polygons which cannot be located on any triangle are dropped.
///
/// `levels` must be strictly descending. The number of polygons returned depends on the shape
/// of the surface, not on the number of levels.
///
/// # Example
/// ```rust
/// # use relief::*;
/// let surface = Surface::Triangles(vec![
///     [[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [10.0, 10.0, 10.0]],
///     [[0.0, 0.0, 0.0], [10.0, 10.0, 10.0], [0.0, 10.0, 10.0]],
/// ]);
/// let polygons = build_polygons_for_level_ranges(&surface, &[5.0]).unwrap();
///
/// assert_eq!(polygons.len(), 2);
/// assert!(polygons.iter().any(|p| p.range == LevelRange::new(5.0, 10.0).unwrap()));
/// assert!(polygons.iter().any(|p| p.range == LevelRange::new(0.0, 5.0).unwrap()));
/// ```
pub fn build_polygons_for_level_ranges_with<P: Polygonize>(
    surface: &Surface,
    levels: &[f64],
    params: &IndexParams,
    polygonizer: &P,
) -> Result<Vec<LevelRangePolygon>> {
    validate_levels(levels)?;
    let tris = surface.triangles()?;
    let (min, max) = z_range(&tris);
    let ranges = level_ranges(min, max, levels);

    let faces = Faces::new(tris.iter().copied());
    let mut lines = faces
        .isolines(levels)
        .iter()
        .flat_map(Polyline::iter)
        .map(|path| path.pts().iter().map(ToPoint2::to_p2).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    lines.push(hull_ring(&tris));

    let Subdivision {
        polygons,
        dangles,
        cuts,
    } = polygonizer.polygonize(&lines);
    log::debug!(
        "{} candidate polygons from {} lines, ignoring {} dangles and {} cuts",
        polygons.len(),
        lines.len(),
        dangles.len(),
        cuts.len()
    );

    let locator = Locator::new(&tris, params);
    let mut out = Vec::with_capacity(polygons.len());
    for polygon in polygons {
        let Some(z) = locator.elevation_in(&polygon) else {
            log::debug!("dropping polygon not located on the surface: {:?}", polygon);
            continue;
        };

        // rounding can push an interpolated value just past the surface span
        let z = z.clamp(min, max);
        let range = *classify(&ranges, z).ok_or(Error::Unclassified { z })?;
        out.push(LevelRangePolygon { range, polygon });
    }

    log::debug!("classified {} polygons into {} ranges", out.len(), ranges.len());

    Ok(out)
}

/// Closed ring around the convex hull of all vertices.
fn hull_ring(tris: &[Tri]) -> Vec<Point2> {
    let pts = tris
        .iter()
        .flatten()
        .map(|&[x, y, _]| geo::Point::new(x, y))
        .collect::<geo::MultiPoint<f64>>();

    pts.convex_hull()
        .exterior()
        .coords()
        .map(|c| [c.x, c.y])
        .collect()
}

/// Point location of plan positions on the triangles of a surface.
struct Locator<'a> {
    index: BoxIndex<(Polygon2, &'a Tri)>,
}

impl<'a> Locator<'a> {
    fn new(tris: &'a [Tri], params: &IndexParams) -> Self {
        let extents = tris.iter().flatten().map(ToPoint2::to_p2).collect::<Extents2>();

        // a vertical triangle has no plan interior and no defined elevation
        let entries = tris
            .iter()
            .filter(|t| !Plane::from(*t).is_vertical())
            .map(|t| (Extents2::from(t.aabb()), (Polygon2::footprint(t), t)))
            .collect();

        Self {
            index: BoxIndex::new(extents, entries, params),
        }
    }

    /// Surface elevation at the first triangle holding `p`.
    fn elevation_at(&self, p: Point2) -> Option<f64> {
        self.index
            .query_point(p)
            .into_iter()
            .find(|(footprint, _)| footprint.envelops(p))
            .and_then(|(_, tri)| Plane::from(*tri).register_z(p))
    }

    /// Surface elevation at an interior point of `polygon`.
    fn elevation_in(&self, polygon: &geo::Polygon<f64>) -> Option<f64> {
        let p = polygon.interior_point()?;
        self.elevation_at([p.x(), p.y()])
    }
}
