//! Quadtree over point positions for nearest-point hover queries.
//!
//! The tree is built once per dataset in data space. Zoom and pan never touch
//! it: callers shrink the query radius by the zoom factor instead.

use crate::data::point::Point;

const LEAF_CAPACITY: usize = 8;
// Coincident points would split forever; stop here and keep a fat leaf.
const MAX_DEPTH: usize = 24;

/// A position stored in the tree together with its dataset index.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Entry {
    pub x: f64,
    pub y: f64,
    pub index: usize,
}

#[derive(Copy, Clone, Debug)]
struct Bounds {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

impl Bounds {
    fn mid(&self) -> (f64, f64) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    /// Quadrant index: bit 0 = right half, bit 1 = bottom half.
    fn quadrant(&self, x: f64, y: f64) -> usize {
        let (mx, my) = self.mid();
        (x >= mx) as usize | (((y >= my) as usize) << 1)
    }

    fn child(&self, q: usize) -> Bounds {
        let (mx, my) = self.mid();
        let (x0, x1) = if q & 1 == 0 { (self.x0, mx) } else { (mx, self.x1) };
        let (y0, y1) = if q & 2 == 0 { (self.y0, my) } else { (my, self.y1) };
        Bounds { x0, y0, x1, y1 }
    }

    /// Squared distance from a point to this box (zero inside).
    fn dist2(&self, x: f64, y: f64) -> f64 {
        let dx = if x < self.x0 {
            self.x0 - x
        } else if x > self.x1 {
            x - self.x1
        } else {
            0.0
        };
        let dy = if y < self.y0 {
            self.y0 - y
        } else if y > self.y1 {
            y - self.y1
        } else {
            0.0
        };
        dx * dx + dy * dy
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf(Vec<Entry>),
    Internal([usize; 4]),
}

/// Point-region quadtree with bucketed leaves.
#[derive(Debug, Clone)]
pub struct QuadTree {
    nodes: Vec<Node>,
    bounds: Bounds,
    len: usize,
}

impl Default for QuadTree {
    fn default() -> Self {
        Self {
            nodes: vec![Node::Leaf(Vec::new())],
            bounds: Bounds {
                x0: 0.0,
                y0: 0.0,
                x1: 0.0,
                y1: 0.0,
            },
            len: 0,
        }
    }
}

impl QuadTree {
    /// Index every point with finite coordinates.
    pub fn build(points: &[Point]) -> Self {
        Self::from_entries(points.iter().enumerate().map(|(index, p)| Entry {
            x: p.x,
            y: p.y,
            index,
        }))
    }

    pub fn from_entries<I: IntoIterator<Item = Entry>>(entries: I) -> Self {
        let entries: Vec<Entry> = entries
            .into_iter()
            .filter(|e| e.x.is_finite() && e.y.is_finite())
            .collect();
        let mut tree = Self::default();
        let Some(first) = entries.first() else {
            return tree;
        };
        let mut b = Bounds {
            x0: first.x,
            y0: first.y,
            x1: first.x,
            y1: first.y,
        };
        for e in &entries {
            b.x0 = b.x0.min(e.x);
            b.y0 = b.y0.min(e.y);
            b.x1 = b.x1.max(e.x);
            b.y1 = b.y1.max(e.y);
        }
        tree.bounds = b;
        for e in entries {
            tree.insert(e);
        }
        tree
    }

    fn insert(&mut self, e: Entry) {
        let mut node = 0;
        let mut bounds = self.bounds;
        let mut depth = 0;
        loop {
            match &mut self.nodes[node] {
                Node::Internal(children) => {
                    let q = bounds.quadrant(e.x, e.y);
                    node = children[q];
                    bounds = bounds.child(q);
                    depth += 1;
                }
                Node::Leaf(items) => {
                    items.push(e);
                    if items.len() > LEAF_CAPACITY && depth < MAX_DEPTH {
                        let items = std::mem::take(items);
                        self.split(node, bounds, items);
                    }
                    break;
                }
            }
        }
        self.len += 1;
    }

    fn split(&mut self, node: usize, bounds: Bounds, items: Vec<Entry>) {
        let base = self.nodes.len();
        let mut buckets: [Vec<Entry>; 4] = Default::default();
        for e in items {
            buckets[bounds.quadrant(e.x, e.y)].push(e);
        }
        for bucket in buckets {
            self.nodes.push(Node::Leaf(bucket));
        }
        self.nodes[node] = Node::Internal([base, base + 1, base + 2, base + 3]);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Closest entry within `radius` of `query` (inclusive), if any.
    pub fn nearest(&self, query: [f64; 2], radius: f64) -> Option<Entry> {
        let [qx, qy] = query;
        if self.is_empty() || !qx.is_finite() || !qy.is_finite() || !(radius >= 0.0) {
            return None;
        }
        let mut best: Option<Entry> = None;
        let mut best_d2 = radius * radius;
        let mut stack = vec![(0usize, self.bounds)];
        while let Some((node, bounds)) = stack.pop() {
            if bounds.dist2(qx, qy) > best_d2 {
                continue;
            }
            match &self.nodes[node] {
                Node::Leaf(items) => {
                    for e in items {
                        let d2 = (e.x - qx).powi(2) + (e.y - qy).powi(2);
                        if d2 <= best_d2 {
                            best_d2 = d2;
                            best = Some(*e);
                        }
                    }
                }
                Node::Internal(children) => {
                    // Pushed last is popped first: visit the query's own
                    // quadrant before its siblings.
                    let own = bounds.quadrant(qx, qy);
                    for q in (0..4).filter(|&q| q != own) {
                        stack.push((children[q], bounds.child(q)));
                    }
                    stack.push((children[own], bounds.child(own)));
                }
            }
        }
        best
    }
}

/// Hover radius in data units: one percent of each axis extent, combined.
pub fn hover_radius(x_extent: Option<(f64, f64)>, y_extent: Option<(f64, f64)>) -> f64 {
    let span = |e: Option<(f64, f64)>| e.map(|(lo, hi)| (hi - lo) / 100.0).unwrap_or(0.0);
    let dx = span(x_extent);
    let dy = span(y_extent);
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pts: &[(f64, f64)]) -> QuadTree {
        QuadTree::from_entries(
            pts.iter()
                .enumerate()
                .map(|(index, &(x, y))| Entry { x, y, index }),
        )
    }

    fn brute_force(pts: &[(f64, f64)], q: [f64; 2], r: f64) -> Option<f64> {
        pts.iter()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|(x, y)| ((x - q[0]).powi(2) + (y - q[1]).powi(2)).sqrt())
            .filter(|d| *d <= r)
            .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |a| a.min(d))))
    }

    #[test]
    fn nearest_within_radius() {
        let tree = entries(&[(0.0, 0.0), (10.0, 10.0), (3.0, 4.0)]);
        assert_eq!(tree.len(), 3);
        let hit = tree.nearest([2.5, 3.5], 1.0).unwrap();
        assert_eq!(hit.index, 2);
        assert!(tree.nearest([50.0, 50.0], 5.0).is_none());
    }

    #[test]
    fn radius_is_inclusive() {
        let tree = entries(&[(3.0, 4.0)]);
        assert!(tree.nearest([0.0, 0.0], 5.0).is_some());
        assert!(tree.nearest([0.0, 0.0], 4.999).is_none());
    }

    #[test]
    fn matches_brute_force_on_a_grid_of_queries() {
        // deterministic pseudo-random cloud, enough points to force splits
        let mut pts = Vec::new();
        let mut s: u64 = 7;
        for _ in 0..2000 {
            s = s.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let x = (s >> 33) as f64 / (1u64 << 31) as f64 * 1000.0 - 500.0;
            s = s.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let y = (s >> 33) as f64 / (1u64 << 31) as f64 * 1000.0 - 500.0;
            pts.push((x, y));
        }
        let tree = entries(&pts);
        for qx in (-500..=500).step_by(97) {
            for qy in (-500..=500).step_by(89) {
                let q = [qx as f64, qy as f64];
                let got = tree
                    .nearest(q, 30.0)
                    .map(|e| ((e.x - q[0]).powi(2) + (e.y - q[1]).powi(2)).sqrt());
                let want = brute_force(&pts, q, 30.0);
                match (got, want) {
                    (Some(g), Some(w)) => assert!((g - w).abs() < 1e-9),
                    (None, None) => {}
                    other => panic!("mismatch at {q:?}: {other:?}"),
                }
            }
        }
    }

    #[test]
    fn coincident_points_do_not_overflow() {
        let pts = vec![(1.0, 1.0); 500];
        let tree = entries(&pts);
        assert_eq!(tree.len(), 500);
        assert!(tree.nearest([1.0, 1.0], 0.0).is_some());
    }

    #[test]
    fn non_finite_positions_are_skipped() {
        let tree = entries(&[(f64::NAN, 0.0), (1.0, f64::INFINITY), (2.0, 2.0)]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.nearest([2.0, 2.0], 1.0).map(|e| e.index), Some(2));
        assert!(tree.nearest([f64::NAN, 0.0], 10.0).is_none());
        assert!(QuadTree::default().nearest([0.0, 0.0], 10.0).is_none());
    }

    #[test]
    fn hover_radius_from_extents() {
        let r = hover_radius(Some((0.0, 300.0)), Some((0.0, 400.0)));
        assert!((r - 5.0).abs() < 1e-12);
        assert_eq!(hover_radius(None, None), 0.0);
    }
}
