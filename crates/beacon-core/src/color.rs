use serde::{Deserialize, Serialize};

/// Color in the 8-bit scaled CIE L*a*b* space.
///
/// Channels follow the usual 8-bit scaling of Lab images: `l` spans 0..=255
/// (L* scaled by 255/100), `a` and `b` are offset by +128. Euclidean distance
/// in this space approximates perceived color difference, which is what the
/// nearest-palette classifier relies on.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabColor {
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

impl LabColor {
    pub const fn new(l: f32, a: f32, b: f32) -> Self {
        Self { l, a, b }
    }

    /// Convert an 8-bit sRGB triple (D65 white point) to scaled L*a*b*.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        let rl = srgb_to_linear(r);
        let gl = srgb_to_linear(g);
        let bl = srgb_to_linear(b);

        // sRGB to XYZ, D65.
        let x = 0.4124564 * rl + 0.3575761 * gl + 0.1804375 * bl;
        let y = 0.2126729 * rl + 0.7151522 * gl + 0.0721750 * bl;
        let z = 0.0193339 * rl + 0.1191920 * gl + 0.9503041 * bl;

        let fx = lab_f(x / 0.950_47);
        let fy = lab_f(y);
        let fz = lab_f(z / 1.088_83);

        let l_star = 116.0 * fy - 16.0;
        let a_star = 500.0 * (fx - fy);
        let b_star = 200.0 * (fy - fz);

        Self {
            l: l_star * 255.0 / 100.0,
            a: a_star + 128.0,
            b: b_star + 128.0,
        }
    }

    /// Euclidean distance to another Lab color.
    pub fn distance(&self, other: &LabColor) -> f32 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        (dl * dl + da * da + db * db).sqrt()
    }
}

fn srgb_to_linear(c: u8) -> f32 {
    let c = c as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn lab_f(t: f32) -> f32 {
    const DELTA3: f32 = 0.008856; // (6/29)^3
    if t > DELTA3 {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn white_maps_to_top_of_lightness_axis() {
        let c = LabColor::from_rgb8(255, 255, 255);
        assert_relative_eq!(c.l, 255.0, epsilon = 1.0);
        assert_relative_eq!(c.a, 128.0, epsilon = 1.5);
        assert_relative_eq!(c.b, 128.0, epsilon = 1.5);
    }

    #[test]
    fn black_maps_to_bottom_of_lightness_axis() {
        let c = LabColor::from_rgb8(0, 0, 0);
        assert_relative_eq!(c.l, 0.0, epsilon = 1.0);
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {
        let red = LabColor::from_rgb8(246, 26, 35);
        let blue = LabColor::from_rgb8(0, 116, 217);
        assert_relative_eq!(red.distance(&red), 0.0);
        assert_relative_eq!(red.distance(&blue), blue.distance(&red));
        assert!(red.distance(&blue) > 50.0);
    }

    #[test]
    fn red_has_positive_a_axis() {
        let red = LabColor::from_rgb8(255, 0, 0);
        assert!(red.a > 128.0);
        let green = LabColor::from_rgb8(0, 255, 0);
        assert!(green.a < 128.0);
    }
}
