// Tests the build operations end to end, from points and from triangles
use geo::Area as _;
use relief::*;

/// A cone peaking at 10 in the middle of a 50 x 50 grid of 5 spaced points, lowest (~2.93) in
/// the corners.
fn cone() -> Vec<Point3> {
    (0..=10)
        .flat_map(|y| (0..=10).map(move |x| (x, y)))
        .map(|(x, y)| {
            let (x, y) = (x as f64 * 5.0, y as f64 * 5.0);
            let d = (x - 25.0).hypot(y - 25.0);
            [x, y, 10.0 - d / 5.0]
        })
        .collect()
}

fn same(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn isolines_one_per_level() {
    let surface = Surface::Points(cone());
    let levels = [20.0, 9.0, 5.0, 2.5, 0.0, -20.0];
    let lines = build_isolines(&surface, &levels).unwrap();

    assert_eq!(lines.len(), levels.len());
    assert!(lines[0].is_empty());
    assert!(lines[5].is_empty());
    for (line, z) in lines.iter().zip(levels).skip(1).take(2) {
        assert!(!line.is_empty());
        assert!(line.iter().flat_map(|p| p.pts()).all(|p| p[2] == z));
    }
}

#[test]
fn points_and_triangles_agree() {
    let pts = cone();
    let mesh = TriMesh::from_points(pts.clone()).unwrap();
    let levels = [7.5, 3.0];

    let a = build_isolines(&Surface::Points(pts), &levels).unwrap();
    let b = build_isolines(&Surface::from(mesh), &levels).unwrap();
    assert_eq!(a, b);
}

#[test]
fn flat_triangle_scenario() {
    let surface = Surface::Triangles(vec![[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]]);
    let lines = build_isolines(&surface, &[0.0]).unwrap();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].is_empty());
}

#[test]
fn sloped_triangle_scenario() {
    let surface = Surface::Triangles(vec![[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 10.0]]]);
    let lines = build_isolines(&surface, &[5.0]).unwrap();
    assert_eq!(lines[0].len(), 1);

    let pts = lines[0].paths()[0].pts();
    assert_eq!(pts.len(), 2);
    assert!(pts.contains(&[0.0, 1.0, 5.0]));
    assert!(pts.contains(&[1.0, 1.0, 5.0]));
}

#[test]
fn invalid_levels_rejected() {
    let surface = Surface::Points(cone());
    for levels in [&[1.0, 2.0][..], &[3.0, 3.0][..], &[f64::INFINITY][..]] {
        assert!(build_isolines(&surface, levels).is_err());
        assert!(build_polygons_for_level_ranges(&surface, levels).is_err());
    }
}

#[test]
fn bad_surfaces_rejected() {
    let err = build_isolines(&Surface::Points(vec![[0.0, 0.0, 0.0]]), &[1.0]).unwrap_err();
    assert_eq!(
        err,
        Error::InsufficientPoints {
            required: 3,
            actual: 1
        }
    );

    let collinear = vec![[0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [2.0, 2.0, 0.0]];
    let err = build_shaded_relief(&Surface::Points(collinear), &ShadeParams::default());
    assert_eq!(err, Err(Error::EmptySurface));

    let nan = vec![[0.0, 0.0, 0.0], [1.0, 0.0, f64::NAN], [0.0, 1.0, 0.0]];
    let err = build_isolines(&Surface::Points(nan), &[1.0]).unwrap_err();
    assert!(matches!(err, Error::NonFiniteCoordinate { .. }));
}

#[test]
fn cone_level_ranges() {
    let surface = Surface::Points(cone());
    let tris = surface.triangles().unwrap();
    let (min, max) = z_range(&tris);
    let levels = [8.0, 6.0, 4.0];

    let polygons = build_polygons_for_level_ranges(&surface, &levels).unwrap();
    let ranges = level_ranges(min, max, &levels);
    assert_eq!(ranges.len(), 4);

    // every range is represented and the plan is covered exactly once
    for r in &ranges {
        assert!(polygons.iter().any(|p| p.range == *r), "{r:?}");
    }
    let area = polygons.iter().map(|p| p.polygon.unsigned_area()).sum::<f64>();
    assert!((area - 2500.0).abs() < 1e-6, "{area}");

    // the peak band is a single island
    let top = polygons.iter().filter(|p| same(p.range.max(), max)).count();
    assert_eq!(top, 1);
}

#[test]
fn shaded_relief_bins() {
    let surface = Surface::Points(cone());
    for bins in [1, 3, 7] {
        let params = ShadeParams {
            bins,
            ..Default::default()
        };
        let out = build_shaded_relief(&surface, &params).unwrap();
        assert_eq!(out.len(), bins);
        assert!(out.windows(2).all(|w| w[0].luminosity < w[1].luminosity));
        assert!(out.iter().all(|p| (0.0..=1.0).contains(&p.luminosity)));

        let area = out.iter().map(|p| p.polygon.unsigned_area()).sum::<f64>();
        assert!((area - 2500.0).abs() < 1e-6, "{area}");
    }
}

#[test]
fn shaded_relief_midpoints() {
    let tris = TriMesh::from_points(cone()).unwrap().tris().collect::<Vec<_>>();
    let params = ShadeParams {
        light: Light::new(0.0, 0.0, -1.0),
        z_factor: 2.0,
        bins: 5,
    };

    let lums = tris
        .iter()
        .map(|t| luminosity(t, params.light, params.z_factor))
        .collect::<Vec<_>>();
    let min = lums.iter().copied().fold(f64::INFINITY, f64::min);
    let max = lums.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let w = (max - min) / 5.0;

    let out = build_shaded_relief(&Surface::Triangles(tris), &params).unwrap();
    for (i, p) in out.iter().enumerate() {
        assert!(same(p.luminosity, min + w * (i as f64 + 0.5)));
    }
}
