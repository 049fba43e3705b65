use beacon_core::Contour;
use serde::{Deserialize, Serialize};

/// Geometric class of a contour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeLabel {
    Square,
    Rectangle,
    Circle,
    Unidentified,
}

impl ShapeLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Unidentified => "unidentified",
        }
    }
}

impl std::fmt::Display for ShapeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tuning knobs for [`ShapeClassifier`].
///
/// The defaults track the upstream pipeline this detector was tuned against.
/// `epsilon_frac` controls how aggressively the polygon is simplified before
/// counting vertices; larger values yield coarser polygons.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ShapeClassifierParams {
    /// Simplification tolerance as a fraction of the perimeter (0.02..0.04).
    pub epsilon_frac: f32,
    /// Quad aspect-ratio band treated as a square (inclusive).
    pub square_aspect_min: f32,
    pub square_aspect_max: f32,
    /// A circle needs strictly more simplified vertices than this.
    pub circle_vertex_threshold: usize,
    /// Minimum circularity `4*pi*area / perimeter^2` for a circle.
    pub circle_min_circularity: f32,
}

impl Default for ShapeClassifierParams {
    fn default() -> Self {
        Self {
            epsilon_frac: 0.02,
            square_aspect_min: 0.95,
            square_aspect_max: 1.05,
            circle_vertex_threshold: 6,
            circle_min_circularity: 0.80,
        }
    }
}

/// Polygon-approximation shape classifier.
///
/// A contour simplifying to exactly 4 vertices is a square or rectangle
/// depending on its bounding-box aspect ratio; a high-vertex, high-circularity
/// contour is a circle; everything else (triangles, higher-order polygons,
/// degenerate input) is [`ShapeLabel::Unidentified`].
#[derive(Clone, Debug, Default)]
pub struct ShapeClassifier {
    params: ShapeClassifierParams,
}

impl ShapeClassifier {
    pub fn new(params: ShapeClassifierParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &ShapeClassifierParams {
        &self.params
    }

    /// Classify one contour. Never fails; malformed geometry yields
    /// [`ShapeLabel::Unidentified`].
    pub fn classify(&self, contour: &Contour) -> ShapeLabel {
        let perimeter = contour.arc_length();
        if perimeter <= 0.0 {
            return ShapeLabel::Unidentified;
        }
        let approx = contour.approx_polygon(self.params.epsilon_frac * perimeter);

        if approx.len() == 4 {
            let ar = match approx.bounding_rect() {
                Some(rect) => rect.aspect_ratio(),
                None => return ShapeLabel::Unidentified,
            };
            return if ar >= self.params.square_aspect_min && ar <= self.params.square_aspect_max {
                ShapeLabel::Square
            } else {
                ShapeLabel::Rectangle
            };
        }

        if approx.len() > self.params.circle_vertex_threshold {
            // Circularity is measured on the raw contour, not the simplified
            // polygon, so a dense noisy boundary still scores honestly.
            let circularity = circularity(contour.area(), perimeter);
            if circularity > self.params.circle_min_circularity {
                return ShapeLabel::Circle;
            }
        }

        ShapeLabel::Unidentified
    }
}

/// Roundness metric: 1.0 for a perfect circle, lower for everything else.
/// Requires a positive perimeter.
pub(crate) fn circularity(area: f32, perimeter: f32) -> f32 {
    4.0 * std::f32::consts::PI * area / (perimeter * perimeter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    fn quad(w: f32, h: f32) -> Contour {
        Contour::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(w, 0.0),
            Point2::new(w, h),
            Point2::new(0.0, h),
        ])
    }

    fn ngon(n: usize, radius: f32) -> Contour {
        Contour::new(
            (0..n)
                .map(|k| {
                    let t = std::f32::consts::TAU * k as f32 / n as f32;
                    Point2::new(radius * t.cos(), radius * t.sin())
                })
                .collect(),
        )
    }

    #[test]
    fn unit_aspect_quad_is_square() {
        let sd = ShapeClassifier::default();
        assert_eq!(sd.classify(&quad(100.0, 100.0)), ShapeLabel::Square);
        // Within the inclusive aspect band.
        assert_eq!(sd.classify(&quad(104.0, 100.0)), ShapeLabel::Square);
    }

    #[test]
    fn elongated_quad_is_rectangle() {
        let sd = ShapeClassifier::default();
        assert_eq!(sd.classify(&quad(160.0, 100.0)), ShapeLabel::Rectangle);
        assert_eq!(sd.classify(&quad(100.0, 160.0)), ShapeLabel::Rectangle);
        // Just outside the band.
        assert_eq!(sd.classify(&quad(106.0, 100.0)), ShapeLabel::Rectangle);
    }

    #[test]
    fn dense_round_contour_is_circle() {
        let sd = ShapeClassifier::default();
        let circle = ngon(64, 100.0);
        assert_eq!(sd.classify(&circle), ShapeLabel::Circle);
    }

    #[test]
    fn triangle_is_unidentified() {
        let sd = ShapeClassifier::default();
        let tri = Contour::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            Point2::new(50.0, 80.0),
        ]);
        assert_eq!(sd.classify(&tri), ShapeLabel::Unidentified);
    }

    #[test]
    fn low_circularity_blob_is_unidentified() {
        let sd = ShapeClassifier::default();
        // A star polygon has many vertices but poor circularity.
        let star = Contour::new(
            (0..16)
                .map(|k| {
                    let t = std::f32::consts::TAU * k as f32 / 16.0;
                    let r = if k % 2 == 0 { 100.0 } else { 30.0 };
                    Point2::new(r * t.cos(), r * t.sin())
                })
                .collect(),
        );
        assert_eq!(sd.classify(&star), ShapeLabel::Unidentified);
    }

    #[test]
    fn degenerate_input_is_unidentified() {
        let sd = ShapeClassifier::default();
        assert_eq!(sd.classify(&Contour::new(vec![])), ShapeLabel::Unidentified);
        assert_eq!(
            sd.classify(&Contour::new(vec![Point2::new(1.0, 1.0)])),
            ShapeLabel::Unidentified
        );
    }

    #[test]
    fn circularity_of_perfect_circle_near_one() {
        let c = ngon(256, 50.0);
        let value = circularity(c.area(), c.arc_length());
        assert!(value > 0.99 && value <= 1.0 + 1e-3);
    }
}
