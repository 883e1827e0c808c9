use crate::*;

/// Builds the polygons of the planar subdivision formed by a set of line paths.
pub trait Polygonize {
    fn polygonize(&self, lines: &[Vec<Point2>]) -> Subdivision;
}

/// The output of a [`Polygonize`] run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subdivision {
    /// Bounded faces, counter-clockwise shells with any enclosed islands as holes.
    pub polygons: Vec<geo::Polygon<f64>>,
    /// Segments with a free end, which cannot bound a face.
    pub dangles: Vec<[Point2; 2]>,
    /// Segments with the same face on both sides.
    pub cuts: Vec<[Point2; 2]>,
}

/// Polygonizes line work that meets at end points.
///
/// End points within `tolerance` of each other are merged, and segments are split where another
/// path's vertex lies on them (such as contours ending on a boundary ring). Crossing segments
/// are **not** intersected.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Polygonizer {
    pub tolerance: f64,
}

impl Default for Polygonizer {
    fn default() -> Self {
        Self {
            tolerance: SAME_POINT_TOL,
        }
    }
}

impl Polygonize for Polygonizer {
    fn polygonize(&self, lines: &[Vec<Point2>]) -> Subdivision {
        let mut graph = Graph::build(lines, self.tolerance);
        let dangles = graph.strip_dangles();
        let mut cuts = Vec::new();

        let rings = loop {
            let rings = graph.trace();
            let cut = graph.cut_edges(&rings);
            if cut.is_empty() {
                break rings;
            }
            for &e in &cut {
                graph.alive[e] = false;
            }
            cuts.extend(cut);
            cuts.extend(graph.strip_dangles());
        };

        let polygons = graph.assemble(rings);
        log::debug!(
            "polygonized {} segments into {} polygons ({} dangles, {} cuts)",
            graph.edges.len(),
            polygons.len(),
            dangles.len(),
            cuts.len()
        );

        Subdivision {
            polygons,
            dangles: dangles.into_iter().map(|e| graph.segment(e)).collect(),
            cuts: cuts.into_iter().map(|e| graph.segment(e)).collect(),
        }
    }
}

/// Node table merging points within tolerance, bucketed on a hash grid.
struct Nodes {
    pts: Vec<Point2>,
    cells: HashMap<(i64, i64), Vec<usize>>,
    tol: f64,
}

impl Nodes {
    fn new(tol: f64) -> Self {
        Self {
            pts: Vec::new(),
            cells: HashMap::default(),
            tol,
        }
    }

    fn cell(&self, [x, y]: Point2) -> (i64, i64) {
        ((x / self.tol).floor() as i64, (y / self.tol).floor() as i64)
    }

    fn near(&self, a: Point2, b: Point2) -> bool {
        let [dx, dy] = a.sub(b);
        dx.abs() <= self.tol && dy.abs() <= self.tol
    }

    fn get_or_add(&mut self, p: Point2) -> usize {
        let (cx, cy) = self.cell(p);
        for dx in -1..=1 {
            for dy in -1..=1 {
                let near = self
                    .cells
                    .get(&(cx + dx, cy + dy))
                    .and_then(|ns| ns.iter().find(|&&n| self.near(self.pts[n], p)));
                if let Some(&n) = near {
                    return n;
                }
            }
        }

        let n = self.pts.len();
        self.pts.push(p);
        self.cells.entry((cx, cy)).or_default().push(n);
        n
    }
}

struct Graph {
    nodes: Vec<Point2>,
    /// Undirected, `a < b`. Half-edge `2e` runs `a -> b`, `2e + 1` runs `b -> a`.
    edges: Vec<(usize, usize)>,
    alive: Vec<bool>,
}

impl Graph {
    fn build(lines: &[Vec<Point2>], tol: f64) -> Self {
        let mut nodes = Nodes::new(tol);
        let mut edges = Vec::new();
        for line in lines {
            let ids = line.iter().map(|&p| nodes.get_or_add(p)).collect::<Vec<_>>();
            edges.extend(ids.windows(2).map(|w| (w[0], w[1])));
        }

        let nodes = nodes.pts;
        let edges = split_edges(&nodes, edges, tol);
        let alive = vec![true; edges.len()];
        Self {
            nodes,
            edges,
            alive,
        }
    }

    fn segment(&self, e: usize) -> [Point2; 2] {
        let (a, b) = self.edges[e];
        [self.nodes[a], self.nodes[b]]
    }

    fn origin(&self, h: usize) -> usize {
        let (a, b) = self.edges[h / 2];
        if h % 2 == 0 {
            a
        } else {
            b
        }
    }

    fn dest(&self, h: usize) -> usize {
        self.origin(h ^ 1)
    }

    /// Live edge ids incident to each node.
    fn incidence(&self) -> Vec<Vec<usize>> {
        let mut inc = vec![Vec::new(); self.nodes.len()];
        for (e, &(a, b)) in self.edges.iter().enumerate() {
            if self.alive[e] {
                inc[a].push(e);
                inc[b].push(e);
            }
        }
        inc
    }

    /// Repeatedly remove edges with a free end. Returns the removed edges.
    fn strip_dangles(&mut self) -> Vec<usize> {
        let inc = self.incidence();
        let mut degree = inc.iter().map(Vec::len).collect::<Vec<_>>();
        let mut stack = (0..degree.len()).filter(|&n| degree[n] == 1).collect::<Vec<_>>();
        let mut removed = Vec::new();

        while let Some(n) = stack.pop() {
            if degree[n] != 1 {
                continue;
            }
            let Some(&e) = inc[n].iter().find(|&&e| self.alive[e]) else {
                continue;
            };
            self.alive[e] = false;
            removed.push(e);

            let (a, b) = self.edges[e];
            let other = if a == n { b } else { a };
            degree[n] -= 1;
            degree[other] -= 1;
            if degree[other] == 1 {
                stack.push(other);
            }
        }

        removed
    }

    /// Walk every face of the live graph, keeping the face on the left of each half-edge.
    ///
    /// Bounded faces come out counter-clockwise, the outside of each connected piece clockwise.
    fn trace(&self) -> Vec<Vec<usize>> {
        let halves = self.edges.len() * 2;

        // outgoing half-edges per node, sorted counter-clockwise by angle
        let mut out = vec![Vec::new(); self.nodes.len()];
        for h in (0..halves).filter(|h| self.alive[h / 2]) {
            out[self.origin(h)].push(h);
        }
        let angle = |h: usize| {
            let [x, y] = self.nodes[self.dest(h)].sub(self.nodes[self.origin(h)]);
            y.atan2(x)
        };
        let mut pos = vec![0; halves];
        for hs in &mut out {
            hs.sort_by(|&a, &b| angle(a).total_cmp(&angle(b)));
            for (i, &h) in hs.iter().enumerate() {
                pos[h] = i;
            }
        }

        // next half-edge: the first turn clockwise from the way we came in
        let next = |h: usize| {
            let v = self.dest(h);
            let hs = &out[v];
            let i = pos[h ^ 1];
            hs[(i + hs.len() - 1) % hs.len()]
        };

        let mut visited = vec![false; halves];
        let mut rings = Vec::new();
        for start in 0..halves {
            if visited[start] || !self.alive[start / 2] {
                continue;
            }
            let mut ring = Vec::new();
            let mut h = start;
            while !visited[h] {
                visited[h] = true;
                ring.push(h);
                h = next(h);
            }
            rings.push(ring);
        }

        rings
    }

    /// Edges walked in both directions by the same ring.
    fn cut_edges(&self, rings: &[Vec<usize>]) -> Vec<usize> {
        let mut seen = vec![false; self.edges.len()];
        let mut cuts = Vec::new();
        for ring in rings {
            for &h in ring {
                let e = h / 2;
                if seen[e] {
                    cuts.push(e);
                }
                seen[e] = true;
            }
            for &h in ring {
                seen[h / 2] = false;
            }
        }
        cuts.sort_unstable();
        cuts.dedup();
        cuts
    }

    /// Label the connected piece each node belongs to.
    fn components(&self) -> Vec<usize> {
        fn find(parent: &mut [usize], mut n: usize) -> usize {
            while parent[n] != n {
                parent[n] = parent[parent[n]];
                n = parent[n];
            }
            n
        }

        let mut parent = (0..self.nodes.len()).collect::<Vec<_>>();
        for (e, &(a, b)) in self.edges.iter().enumerate() {
            if self.alive[e] {
                let (ra, rb) = (find(&mut parent, a), find(&mut parent, b));
                parent[ra] = rb;
            }
        }
        (0..self.nodes.len()).map(|n| find(&mut parent, n)).collect()
    }

    /// Turn traced rings into polygons, nesting islands as holes.
    fn assemble(&self, rings: Vec<Vec<usize>>) -> Vec<geo::Polygon<f64>> {
        struct Ring {
            pts: Vec<Point2>,
            area: f64,
            extents: Extents2,
            component: usize,
        }

        let comps = self.components();
        let rings = rings
            .into_iter()
            .map(|ring| {
                let pts = ring
                    .iter()
                    .map(|&h| self.nodes[self.origin(h)])
                    .collect::<Vec<_>>();
                Ring {
                    area: signed_area(&pts),
                    extents: pts.iter().copied().collect(),
                    component: comps[self.origin(ring[0])],
                    pts,
                }
            })
            .collect::<Vec<_>>();

        let shells = (0..rings.len())
            .filter(|&i| rings[i].area > 0.0)
            .collect::<Vec<_>>();
        let mut holes = vec![Vec::new(); rings.len()];

        for (i, ring) in rings.iter().enumerate().filter(|(_, r)| r.area < 0.0) {
            let p = ring.pts[0];
            let owner = shells
                .iter()
                .copied()
                .filter(|&s| rings[s].component != ring.component)
                .filter(|&s| rings[s].extents.envelops(p) && point_inside(&rings[s].pts, p))
                .min_by(|&a, &b| rings[a].area.total_cmp(&rings[b].area));
            // no owner means this is the unbounded face
            if let Some(s) = owner {
                holes[s].push(i);
            }
        }

        let to_ls = |pts: &[Point2]| {
            geo::LineString::new(pts.iter().map(|&[x, y]| geo::Coord { x, y }).collect())
        };

        shells
            .into_iter()
            .map(|s| {
                let interiors = holes[s].iter().map(|&h| to_ls(&rings[h].pts)).collect();
                geo::Polygon::new(to_ls(&rings[s].pts), interiors)
            })
            .collect()
    }
}

/// Split edges at any node lying on their interior, then drop repeats.
fn split_edges(nodes: &[Point2], edges: Vec<(usize, usize)>, tol: f64) -> Vec<(usize, usize)> {
    let mut edges = edges
        .into_iter()
        .filter(|(a, b)| a != b)
        .map(|(a, b)| if a < b { (a, b) } else { (b, a) })
        .collect::<Vec<_>>();
    sort_and_dedup_edges(&mut edges);

    let extents = nodes.iter().copied().collect::<Extents2>().expand(tol);
    let entries = edges
        .iter()
        .enumerate()
        .map(|(i, &(a, b))| {
            let e = Extents2::from_iter([nodes[a], nodes[b]]).expand(tol);
            (e, i)
        })
        .collect();
    let index = BoxIndex::new(extents, entries, &IndexParams::default());

    let mut splits: Vec<Vec<(f64, usize)>> = vec![Vec::new(); edges.len()];
    for (n, &p) in nodes.iter().enumerate() {
        for &e in index.query_point(p) {
            let (a, b) = edges[e];
            if n == a || n == b {
                continue;
            }
            if let Some(t) = on_segment(nodes[a], nodes[b], p, tol) {
                splits[e].push((t, n));
            }
        }
    }

    let mut out = Vec::with_capacity(edges.len());
    for ((a, b), mut s) in edges.into_iter().zip(splits) {
        s.sort_by(|x, y| x.0.total_cmp(&y.0));
        let chain = std::iter::once(a)
            .chain(s.into_iter().map(|(_, n)| n))
            .chain(std::iter::once(b))
            .collect::<Vec<_>>();
        out.extend(
            chain
                .windows(2)
                .filter(|w| w[0] != w[1])
                .map(|w| if w[0] < w[1] { (w[0], w[1]) } else { (w[1], w[0]) }),
        );
    }
    sort_and_dedup_edges(&mut out);
    out
}

fn sort_and_dedup_edges(edges: &mut Vec<(usize, usize)>) {
    edges.sort_unstable();
    edges.dedup();
}

/// Parameter along `a -> b` of the point closest to `p`, if `p` is within `tol` of the
/// segment's interior.
fn on_segment(a: Point2, b: Point2, p: Point2, tol: f64) -> Option<f64> {
    let ab = b.sub(a);
    let len2 = ab[0] * ab[0] + ab[1] * ab[1];
    if len2 == 0.0 {
        return None;
    }
    let ap = p.sub(a);
    let t = (ap[0] * ab[0] + ap[1] * ab[1]) / len2;
    if t <= 0.0 || t >= 1.0 {
        return None;
    }
    let dist = a.add(ab.scale(t)).sub(p).mag();
    (dist <= tol).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area as _;

    fn square(o: Point2, size: f64) -> Vec<Point2> {
        let [x, y] = o;
        vec![
            [x, y],
            [x + size, y],
            [x + size, y + size],
            [x, y + size],
            [x, y],
        ]
    }

    #[test]
    fn single_ring() {
        let s = Polygonizer::default().polygonize(&[square([0.0, 0.0], 2.0)]);
        assert_eq!(s.polygons.len(), 1);
        assert!((s.polygons[0].unsigned_area() - 4.0).abs() < 1e-11);
        assert!(s.dangles.is_empty());
        assert!(s.cuts.is_empty());
    }

    #[test]
    fn line_splits_ring() {
        // a line across the square, ending on (but not at vertices of) the ring
        let lines = [square([0.0, 0.0], 2.0), vec![[1.0, 0.0], [1.0, 2.0]]];
        let s = Polygonizer::default().polygonize(&lines);
        assert_eq!(s.polygons.len(), 2);
        for p in &s.polygons {
            assert!((p.unsigned_area() - 2.0).abs() < 1e-11);
            assert!(p.interiors().is_empty());
        }
    }

    #[test]
    fn island_becomes_hole() {
        let lines = [square([0.0, 0.0], 10.0), square([4.0, 4.0], 2.0)];
        let s = Polygonizer::default().polygonize(&lines);
        assert_eq!(s.polygons.len(), 2);

        let outer = s
            .polygons
            .iter()
            .find(|p| !p.interiors().is_empty())
            .expect("outer has a hole");
        assert_eq!(outer.interiors().len(), 1);
        assert!((outer.unsigned_area() - 96.0).abs() < 1e-9);

        let inner = s
            .polygons
            .iter()
            .find(|p| p.interiors().is_empty())
            .expect("island itself");
        assert!((inner.unsigned_area() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn dangles_and_cuts() {
        // dangle poking into the square
        let lines = [square([0.0, 0.0], 2.0), vec![[1.0, 0.0], [1.0, 1.0]]];
        let s = Polygonizer::default().polygonize(&lines);
        assert_eq!(s.polygons.len(), 1);
        assert_eq!(s.dangles, [[[1.0, 0.0], [1.0, 1.0]]]);

        // two squares joined by a bridge
        let lines = [
            square([0.0, 0.0], 1.0),
            square([3.0, 0.0], 1.0),
            vec![[1.0, 0.5], [3.0, 0.5]],
        ];
        let s = Polygonizer::default().polygonize(&lines);
        assert_eq!(s.polygons.len(), 2);
        assert_eq!(s.cuts, [[[1.0, 0.5], [3.0, 0.5]]]);
    }

    #[test]
    fn near_points_merge() {
        let mut ring = square([0.0, 0.0], 1.0);
        ring[4] = [1e-9, -1e-9];
        let s = Polygonizer::default().polygonize(&[ring]);
        assert_eq!(s.polygons.len(), 1);
    }

    #[test]
    fn on_segment_test() {
        let t = on_segment([0.0, 0.0], [2.0, 0.0], [0.5, 0.0], 1e-7);
        assert_eq!(t, Some(0.25));
        assert_eq!(on_segment([0.0, 0.0], [2.0, 0.0], [0.5, 0.1], 1e-7), None);
        assert_eq!(on_segment([0.0, 0.0], [2.0, 0.0], [2.0, 0.0], 1e-7), None);
        assert_eq!(on_segment([0.0, 0.0], [0.0, 0.0], [0.0, 0.0], 1e-7), None);
    }
}
