use std::fmt;

use eframe::egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::GrapherError;

/// An opaque RGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb([r, g, b])
    }

    pub fn to_color32(self) -> Color32 {
        let [r, g, b] = self.0;
        Color32::from_rgb(r, g, b)
    }
}

impl fmt::Display for Rgb {
    /// CSS notation, e.g. `rgb(255, 0, 0)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "rgb({r}, {g}, {b})")
    }
}

/// Foreground colors of the object-map colormap. The background slot (label 0)
/// is not part of the cycle, so region 0 (label 1) takes the first entry.
pub const OBJECTMAP_COLORS: [Rgb; 12] = [
    Rgb::new(255, 0, 0),     // Red
    Rgb::new(0, 255, 0),     // Green
    Rgb::new(0, 0, 255),     // Blue
    Rgb::new(255, 255, 0),   // Yellow
    Rgb::new(0, 255, 255),   // Cyan
    Rgb::new(255, 0, 255),   // Magenta
    Rgb::new(255, 128, 0),   // Orange
    Rgb::new(128, 0, 255),   // Violet
    Rgb::new(0, 160, 80),    // Teal green
    Rgb::new(255, 105, 180), // Pink
    Rgb::new(160, 82, 45),   // Sienna
    Rgb::new(128, 128, 255), // Periwinkle
];

/// A non-empty, cyclically indexed color sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Rgb>", into = "Vec<Rgb>")]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    pub fn new(colors: Vec<Rgb>) -> Result<Self, GrapherError> {
        if colors.is_empty() {
            return Err(GrapherError::Config("palette must contain at least one color".into()));
        }
        Ok(Self { colors })
    }

    /// Color of the region at zero-based `region`, wrapping at the palette length.
    pub fn color_for_region(&self, region: usize) -> Rgb {
        self.colors[region % self.colors.len()]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: OBJECTMAP_COLORS.to_vec(),
        }
    }
}

impl TryFrom<Vec<Rgb>> for Palette {
    type Error = GrapherError;

    fn try_from(colors: Vec<Rgb>) -> Result<Self, Self::Error> {
        Palette::new(colors)
    }
}

impl From<Palette> for Vec<Rgb> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_at_exact_multiple_of_length() {
        let palette = Palette::default();
        let n = OBJECTMAP_COLORS.len();
        assert_eq!(palette.color_for_region(0), palette.color_for_region(n));
        assert_eq!(palette.color_for_region(n - 1), palette.color_for_region(2 * n - 1));
        assert_eq!(palette.color_for_region(5 * n + 3), OBJECTMAP_COLORS[3]);
    }

    #[test]
    fn test_never_out_of_range() {
        let palette = Palette::new(vec![Rgb::new(1, 2, 3)]).unwrap();
        for region in [0, 1, 7, usize::MAX] {
            assert_eq!(palette.color_for_region(region), Rgb::new(1, 2, 3));
        }
    }

    #[test]
    fn test_empty_palette_rejected() {
        assert!(Palette::new(Vec::new()).is_err());
        assert!(serde_json::from_str::<Palette>("[]").is_err());
    }

    #[test]
    fn test_css_notation() {
        assert_eq!(Rgb::new(10, 20, 30).to_string(), "rgb(10, 20, 30)");
    }

    #[test]
    fn test_json_shape() {
        let palette: Palette = serde_json::from_str("[[1,2,3],[4,5,6]]").unwrap();
        assert_eq!(palette.color_for_region(3), Rgb::new(4, 5, 6));
        assert_eq!(serde_json::to_string(&palette).unwrap(), "[[1,2,3],[4,5,6]]");
    }
}
