use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Width over height. Zero-height rects report an aspect ratio of 0.
    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            0.0
        }
    }
}

/// Closed region boundary as an ordered point sequence.
///
/// The last point is implicitly connected back to the first; callers should
/// not duplicate the first point at the end. All derived quantities treat the
/// polygon as closed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    points: Vec<Point2<f32>>,
}

impl Contour {
    pub fn new(points: Vec<Point2<f32>>) -> Self {
        Self { points }
    }

    #[inline]
    pub fn points(&self) -> &[Point2<f32>] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Closed perimeter: sum of edge lengths including the closing edge.
    pub fn arc_length(&self) -> f32 {
        if self.points.len() < 2 {
            return 0.0;
        }
        let mut total = 0.0;
        for i in 0..self.points.len() {
            let a = self.points[i];
            let b = self.points[(i + 1) % self.points.len()];
            total += (b - a).norm();
        }
        total
    }

    /// Twice the signed shoelace area. Positive for counter-clockwise winding
    /// in a y-up frame.
    fn signed_area2(&self) -> f32 {
        if self.points.len() < 3 {
            return 0.0;
        }
        let mut acc = 0.0;
        for i in 0..self.points.len() {
            let a = self.points[i];
            let b = self.points[(i + 1) % self.points.len()];
            acc += a.x * b.y - b.x * a.y;
        }
        acc
    }

    /// Enclosed area (always non-negative).
    pub fn area(&self) -> f32 {
        0.5 * self.signed_area2().abs()
    }

    /// Area-weighted centroid from the polygon moments.
    ///
    /// Returns `None` when the zeroth moment vanishes (degenerate contour:
    /// fewer than three points, or all points collinear). Such contours are
    /// skipped by matching, never surfaced as errors.
    pub fn centroid(&self) -> Option<Point2<f32>> {
        let a2 = self.signed_area2();
        if a2.abs() < f32::EPSILON {
            return None;
        }
        let mut cx = 0.0;
        let mut cy = 0.0;
        for i in 0..self.points.len() {
            let a = self.points[i];
            let b = self.points[(i + 1) % self.points.len()];
            let cross = a.x * b.y - b.x * a.y;
            cx += (a.x + b.x) * cross;
            cy += (a.y + b.y) * cross;
        }
        let scale = 1.0 / (3.0 * a2);
        Some(Point2::new(cx * scale, cy * scale))
    }

    /// Axis-aligned bounding rectangle, or `None` for an empty contour.
    pub fn bounding_rect(&self) -> Option<Rect> {
        let first = self.points.first()?;
        let (mut min_x, mut min_y) = (first.x, first.y);
        let (mut max_x, mut max_y) = (first.x, first.y);
        for p in &self.points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Rect {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        })
    }

    /// Reduce the closed contour to a coarser polygon with the
    /// Ramer-Douglas-Peucker algorithm. Every original point stays within
    /// `epsilon` of the returned polygon.
    ///
    /// The closed curve is split at the vertex farthest from the first point
    /// and each half is simplified as an open chain, so the result does not
    /// depend on a fixed start edge.
    pub fn approx_polygon(&self, epsilon: f32) -> Contour {
        let n = self.points.len();
        if n < 3 || epsilon <= 0.0 {
            return self.clone();
        }

        // Split vertex: farthest point from points[0].
        let anchor = self.points[0];
        let mut split = 1;
        let mut best = 0.0f32;
        for (i, p) in self.points.iter().enumerate().skip(1) {
            let d = (p - anchor).norm_squared();
            if d > best {
                best = d;
                split = i;
            }
        }
        if best == 0.0 {
            // All points coincide.
            return Contour::new(vec![anchor]);
        }

        let mut first_half = simplify_chain(&self.points[..=split], epsilon);
        let mut second: Vec<Point2<f32>> = self.points[split..].to_vec();
        second.push(anchor);
        let second_half = simplify_chain(&second, epsilon);

        // Both chains keep their endpoints; drop the duplicated ones.
        first_half.pop();
        let mut out = first_half;
        out.extend_from_slice(&second_half[..second_half.len() - 1]);
        Contour::new(out)
    }
}

/// Douglas-Peucker on an open chain. Endpoints are always kept.
fn simplify_chain(points: &[Point2<f32>], epsilon: f32) -> Vec<Point2<f32>> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let (start, end) = (points[0], points[points.len() - 1]);
    let mut worst = 0usize;
    let mut worst_dist = 0.0f32;
    for (i, p) in points.iter().enumerate().take(points.len() - 1).skip(1) {
        let d = segment_distance(*p, start, end);
        if d > worst_dist {
            worst_dist = d;
            worst = i;
        }
    }
    if worst_dist <= epsilon {
        return vec![start, end];
    }
    let mut left = simplify_chain(&points[..=worst], epsilon);
    let right = simplify_chain(&points[worst..], epsilon);
    left.pop();
    left.extend_from_slice(&right);
    left
}

/// Distance from `p` to the segment `a`-`b`.
fn segment_distance(p: Point2<f32>, a: Point2<f32>, b: Point2<f32>) -> f32 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq <= f32::EPSILON {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    let proj = a + ab * t;
    (p - proj).norm()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(side: f32) -> Contour {
        Contour::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(side, 0.0),
            Point2::new(side, side),
            Point2::new(0.0, side),
        ])
    }

    #[test]
    fn square_perimeter_and_area() {
        let c = square(100.0);
        assert_relative_eq!(c.arc_length(), 400.0);
        assert_relative_eq!(c.area(), 10_000.0);
    }

    #[test]
    fn square_centroid() {
        let c = square(100.0);
        let m = c.centroid().unwrap();
        assert_relative_eq!(m.x, 50.0, epsilon = 1e-3);
        assert_relative_eq!(m.y, 50.0, epsilon = 1e-3);
    }

    #[test]
    fn degenerate_contours_have_no_centroid() {
        assert!(Contour::new(vec![]).centroid().is_none());
        assert!(Contour::new(vec![Point2::new(1.0, 2.0)]).centroid().is_none());
        // Collinear: zero enclosed area.
        let line = Contour::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 0.0),
            Point2::new(10.0, 0.0),
        ]);
        assert!(line.centroid().is_none());
        assert_relative_eq!(line.area(), 0.0);
    }

    #[test]
    fn bounding_rect_spans_extremes() {
        let c = Contour::new(vec![
            Point2::new(2.0, 3.0),
            Point2::new(12.0, 3.0),
            Point2::new(12.0, 8.0),
            Point2::new(2.0, 8.0),
        ]);
        let r = c.bounding_rect().unwrap();
        assert_relative_eq!(r.x, 2.0);
        assert_relative_eq!(r.y, 3.0);
        assert_relative_eq!(r.width, 10.0);
        assert_relative_eq!(r.height, 5.0);
        assert_relative_eq!(r.aspect_ratio(), 2.0);
    }

    #[test]
    fn approx_keeps_square_corners() {
        let c = square(100.0);
        let approx = c.approx_polygon(0.02 * c.arc_length());
        assert_eq!(approx.len(), 4);
    }

    #[test]
    fn approx_drops_collinear_midpoints() {
        // Square with extra midpoints along each edge.
        let c = Contour::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(50.0, 0.0),
            Point2::new(100.0, 0.0),
            Point2::new(100.0, 50.0),
            Point2::new(100.0, 100.0),
            Point2::new(50.0, 100.0),
            Point2::new(0.0, 100.0),
            Point2::new(0.0, 50.0),
        ]);
        let approx = c.approx_polygon(0.02 * c.arc_length());
        assert_eq!(approx.len(), 4);
    }

    #[test]
    fn approx_retains_circle_vertices() {
        let n = 64;
        let pts: Vec<_> = (0..n)
            .map(|k| {
                let t = std::f32::consts::TAU * k as f32 / n as f32;
                Point2::new(100.0 * t.cos(), 100.0 * t.sin())
            })
            .collect();
        let c = Contour::new(pts);
        let approx = c.approx_polygon(0.02 * c.arc_length());
        // A hexagon would deviate ~13.4px from a radius-100 circle, above the
        // ~12.6px tolerance, so the simplification must keep at least 7 vertices.
        assert!(approx.len() >= 7, "got {} vertices", approx.len());
    }
}
