use crate::*;

/// Tuning of a [`BoxIndex`].
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IndexParams {
    /// A node holding this many entries or fewer is not split.
    pub min_objects: usize,
    /// Nodes at this depth are not split.
    pub max_depth: usize,
    /// Nodes smaller than this fraction of the indexed area are not split.
    pub min_area_ratio: f64,
}

impl Default for IndexParams {
    fn default() -> Self {
        Self {
            min_objects: 8,
            max_depth: 12,
            min_area_ratio: 1e-4,
        }
    }
}

/// A bulk loaded quadtree over bounding boxes.
///
/// Each entry is stored at the deepest node whose box fully contains it; entries straddling a
/// quadrant split stay with the parent.
#[derive(Debug, Clone)]
pub struct BoxIndex<T> {
    entries: Vec<(Extents2, T)>,
    root: Node,
}

#[derive(Debug, Clone)]
struct Node {
    extents: Extents2,
    /// Indices into `entries`.
    items: Vec<usize>,
    children: Option<Box<[Node; 4]>>,
}

impl<T> BoxIndex<T> {
    /// Build the index over `entries`, covering `extents`.
    ///
    /// Entries lying outside `extents` are held at the root and still found by queries.
    pub fn new(extents: Extents2, entries: Vec<(Extents2, T)>, params: &IndexParams) -> Self {
        let min_area = extents.area() * params.min_area_ratio;
        let items = (0..entries.len()).collect();
        let root = Node::build(extents, items, &entries, 0, min_area, params);
        Self { entries, root }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries whose box contains `p` (boundary inclusive), in insertion order.
    pub fn query_point(&self, p: impl ToPoint2) -> Vec<&T> {
        let p = p.to_p2();
        let mut hits = Vec::new();
        self.root.query(p, &self.entries, &mut hits);
        hits.sort_unstable();
        hits.dedup();
        hits.into_iter().map(|i| &self.entries[i].1).collect()
    }

    /// Depth of the deepest node.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

impl Node {
    fn build<T>(
        extents: Extents2,
        items: Vec<usize>,
        entries: &[(Extents2, T)],
        depth: usize,
        min_area: f64,
        params: &IndexParams,
    ) -> Self {
        if items.len() <= params.min_objects
            || depth >= params.max_depth
            || extents.area() < min_area
        {
            return Node {
                extents,
                items,
                children: None,
            };
        }

        let quads = extents.quadrants();
        let mut buckets: [Vec<usize>; 4] = Default::default();
        let mut straddle = Vec::new();
        for i in items {
            match quads.iter().position(|q| q.contains(&entries[i].0)) {
                Some(q) => buckets[q].push(i),
                None => straddle.push(i),
            }
        }

        if buckets.iter().all(Vec::is_empty) {
            // nothing fits further down
            return Node {
                extents,
                items: straddle,
                children: None,
            };
        }

        let [q0, q1, q2, q3] = quads;
        let [b0, b1, b2, b3] = buckets;
        let child = |q, b| Node::build(q, b, entries, depth + 1, min_area, params);
        let children = [child(q0, b0), child(q1, b1), child(q2, b2), child(q3, b3)];

        Node {
            extents,
            items: straddle,
            children: Some(Box::new(children)),
        }
    }

    fn query<T>(&self, p: Point2, entries: &[(Extents2, T)], hits: &mut Vec<usize>) {
        hits.extend(self.items.iter().copied().filter(|&i| entries[i].0.envelops(p)));

        if let Some(children) = &self.children {
            // a point on a quadrant boundary can sit in more than one child
            for c in children.iter().filter(|c| c.extents.envelops(p)) {
                c.query(p, entries, hits);
            }
        }
    }

    fn depth(&self) -> usize {
        self.children
            .as_ref()
            .map(|cs| 1 + cs.iter().map(Node::depth).max().unwrap_or(0))
            .unwrap_or(0)
    }
}
