//! Free-form polygon ("lasso") containment.

/// Even-odd ray casting test of `point` against the closed polygon `vs`.
///
/// The polygon is implicitly closed (last vertex connects to the first).
/// Points exactly on an edge may fall on either side.
pub fn point_in_polygon(point: [f64; 2], vs: &[[f64; 2]]) -> bool {
    let [x, y] = point;
    let mut inside = false;
    let n = vs.len();
    if n == 0 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let [xi, yi] = vs[i];
        let [xj, yj] = vs[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// The polygon being drawn by an in-progress lasso drag, in data space,
/// together with its screen-space anchor and last screen position.
#[derive(Debug, Clone, Default)]
pub struct LassoPath {
    vertices: Vec<[f64; 2]>,
    anchor: Option<[f64; 2]>,
    last: Option<[f64; 2]>,
}

impl LassoPath {
    /// Start a new path anchored at a screen position.
    pub fn begin(&mut self, anchor_screen: [f64; 2]) {
        self.vertices.clear();
        self.anchor = Some(anchor_screen);
        self.last = Some(anchor_screen);
    }

    /// Append a vertex. Returns the screen segment to draw for this tick.
    pub fn extend(&mut self, data: [f64; 2], screen: [f64; 2]) -> Option<([f64; 2], [f64; 2])> {
        self.vertices.push(data);
        let seg = self.last.map(|from| (from, screen));
        self.last = Some(screen);
        seg
    }

    /// The closing segment back to the anchor, if any vertex was added.
    pub fn closing_segment(&self) -> Option<([f64; 2], [f64; 2])> {
        if self.vertices.is_empty() {
            return None;
        }
        Some((self.last?, self.anchor?))
    }

    pub fn vertices(&self) -> &[[f64; 2]] {
        &self.vertices
    }

    pub fn contains(&self, point: [f64; 2]) -> bool {
        point_in_polygon(point, &self.vertices)
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.anchor = None;
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_contains_only_inner_point() {
        let poly = [[-1.0, -1.0], [-1.0, 5.0], [5.0, 5.0], [5.0, -1.0]];
        assert!(point_in_polygon([0.0, 0.0], &poly));
        assert!(!point_in_polygon([10.0, 10.0], &poly));
    }

    #[test]
    fn concave_polygon_notch_is_outside() {
        // U shape opening upwards
        let poly = [
            [0.0, 0.0],
            [6.0, 0.0],
            [6.0, 6.0],
            [4.0, 6.0],
            [4.0, 2.0],
            [2.0, 2.0],
            [2.0, 6.0],
            [0.0, 6.0],
        ];
        assert!(point_in_polygon([1.0, 5.0], &poly));
        assert!(point_in_polygon([5.0, 5.0], &poly));
        assert!(!point_in_polygon([3.0, 5.0], &poly));
        assert!(point_in_polygon([3.0, 1.0], &poly));
    }

    #[test]
    fn degenerate_polygons_contain_nothing() {
        assert!(!point_in_polygon([0.0, 0.0], &[]));
        assert!(!point_in_polygon([0.0, 0.0], &[[0.0, 0.0]]));
        assert!(!point_in_polygon([0.5, 0.0], &[[0.0, 0.0], [1.0, 0.0]]));
    }

    #[test]
    fn path_tracks_segments_and_closing_edge() {
        let mut path = LassoPath::default();
        path.begin([10.0, 10.0]);
        assert!(path.closing_segment().is_none());
        let seg = path.extend([0.0, 0.0], [20.0, 10.0]);
        assert_eq!(seg, Some(([10.0, 10.0], [20.0, 10.0])));
        let seg = path.extend([1.0, 0.0], [20.0, 30.0]);
        assert_eq!(seg, Some(([20.0, 10.0], [20.0, 30.0])));
        assert_eq!(path.closing_segment(), Some(([20.0, 30.0], [10.0, 10.0])));
        assert_eq!(path.vertices().len(), 2);
        path.clear();
        assert!(path.vertices().is_empty());
    }
}
