use beacon_core::LabColor;
use serde::{Deserialize, Serialize};

/// A palette entry: symbolic name plus its reference Lab color.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NamedColor {
    pub name: String,
    pub lab: LabColor,
}

impl NamedColor {
    pub fn from_rgb8(name: &str, r: u8, g: u8, b: u8) -> Self {
        Self {
            name: name.to_string(),
            lab: LabColor::from_rgb8(r, g, b),
        }
    }
}

/// Nearest-palette color classifier.
///
/// The default palette carries several shade variants per hue family
/// (`orange1`..`orange5`, `red1`..`red5`, `blue1`..`blue5`, `white`). Rule
/// matching tests the returned name by prefix, so the variants collapse into
/// one semantic family while keeping the nearest-neighbor match tight under
/// varying lighting.
#[derive(Clone, Debug)]
pub struct ColorClassifier {
    palette: Vec<NamedColor>,
}

impl Default for ColorClassifier {
    fn default() -> Self {
        Self::with_palette(default_palette())
    }
}

impl ColorClassifier {
    pub fn with_palette(palette: Vec<NamedColor>) -> Self {
        Self { palette }
    }

    #[inline]
    pub fn palette(&self) -> &[NamedColor] {
        &self.palette
    }

    /// Name of the palette entry closest to the region-average sample.
    ///
    /// Deterministic: ties keep the earliest palette entry. Returns `None`
    /// only for an empty palette.
    pub fn classify(&self, sample: &LabColor) -> Option<&str> {
        let mut best: Option<(&str, f32)> = None;
        for entry in &self.palette {
            let d = entry.lab.distance(sample);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((&entry.name, d)),
            }
        }
        best.map(|(name, _)| name)
    }
}

/// The reference palette: shade variants per hue family, in declaration
/// order. Order matters for tie-breaking.
pub fn default_palette() -> Vec<NamedColor> {
    [
        ("orange1", (255u8, 98u8, 0u8)),
        ("orange2", (253, 127, 44)),
        ("orange3", (253, 147, 70)),
        ("orange4", (253, 167, 102)),
        ("orange5", (253, 183, 119)),
        ("red1", (182, 8, 13)),
        ("red2", (221, 17, 27)),
        ("red3", (246, 26, 35)),
        ("red4", (255, 50, 50)),
        ("red5", (255, 70, 70)),
        ("blue1", (0, 116, 217)),
        ("blue2", (0, 150, 255)),
        ("blue3", (0, 191, 255)),
        ("blue4", (30, 144, 255)),
        ("blue5", (70, 130, 180)),
        ("white", (255, 255, 255)),
    ]
    .into_iter()
    .map(|(name, (r, g, b))| NamedColor::from_rgb8(name, r, g, b))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_palette_color_returns_its_own_name() {
        let cl = ColorClassifier::default();
        let white = LabColor::from_rgb8(255, 255, 255);
        assert_eq!(cl.classify(&white), Some("white"));
        let orange3 = LabColor::from_rgb8(253, 147, 70);
        assert_eq!(cl.classify(&orange3), Some("orange3"));
    }

    #[test]
    fn nearby_shades_stay_in_family() {
        let cl = ColorClassifier::default();
        for rgb in [(250u8, 140u8, 60u8), (255, 100, 10), (250, 175, 110)] {
            let name = cl.classify(&LabColor::from_rgb8(rgb.0, rgb.1, rgb.2)).unwrap();
            assert!(name.starts_with("orange"), "got {name}");
        }
        for rgb in [(230u8, 20u8, 30u8), (200, 10, 15)] {
            let name = cl.classify(&LabColor::from_rgb8(rgb.0, rgb.1, rgb.2)).unwrap();
            assert!(name.starts_with("red"), "got {name}");
        }
        for rgb in [(10u8, 120u8, 220u8), (60, 135, 190)] {
            let name = cl.classify(&LabColor::from_rgb8(rgb.0, rgb.1, rgb.2)).unwrap();
            assert!(name.starts_with("blue"), "got {name}");
        }
    }

    #[test]
    fn classification_is_deterministic() {
        let cl = ColorClassifier::default();
        let sample = LabColor::new(140.0, 150.0, 160.0);
        let first = cl.classify(&sample).map(str::to_string);
        for _ in 0..10 {
            assert_eq!(cl.classify(&sample).map(str::to_string), first);
        }
    }

    #[test]
    fn ties_resolve_to_earliest_palette_entry() {
        let lab = LabColor::new(100.0, 128.0, 128.0);
        let cl = ColorClassifier::with_palette(vec![
            NamedColor {
                name: "first".into(),
                lab,
            },
            NamedColor {
                name: "second".into(),
                lab,
            },
        ]);
        assert_eq!(cl.classify(&lab), Some("first"));
    }

    #[test]
    fn empty_palette_classifies_nothing() {
        let cl = ColorClassifier::with_palette(Vec::new());
        assert_eq!(cl.classify(&LabColor::new(0.0, 0.0, 0.0)), None);
    }
}
