use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Residue colours: peptide residue number → Color32
// ---------------------------------------------------------------------------

/// One colour per peptide residue, stable for a given peptide length.
#[derive(Debug, Clone, Default)]
pub struct ResiduePalette {
    colors: Vec<Color32>,
}

impl ResiduePalette {
    pub fn new(peptide_len: usize) -> Self {
        ResiduePalette {
            colors: generate_palette(peptide_len),
        }
    }

    /// Colour for 1-based residue `num`; grey when out of range.
    pub fn color_for(&self, num: usize) -> Color32 {
        num.checked_sub(1)
            .and_then(|i| self.colors.get(i))
            .copied()
            .unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let p = ResiduePalette::new(4);
        assert_ne!(p.color_for(1), p.color_for(2));
        assert_eq!(p.color_for(0), Color32::GRAY);
        assert_eq!(p.color_for(5), Color32::GRAY);
        assert!(generate_palette(0).is_empty());
    }
}
