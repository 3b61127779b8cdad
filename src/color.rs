use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| hsl_to_color32(210.0 + (i as f32 / n as f32) * 360.0, 0.75, 0.55))
        .collect()
}

/// Line colours for the selected state and the national average.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesColors {
    pub state: Color32,
    pub national: Color32,
}

impl Default for SeriesColors {
    fn default() -> Self {
        let palette = generate_palette(2);
        SeriesColors {
            state: palette[0],
            national: palette[1],
        }
    }
}

// ---------------------------------------------------------------------------
// Percent-change colouring
// ---------------------------------------------------------------------------

/// Green for increases, red for decreases, grey for no change. Saturation
/// grows with magnitude and saturates at ±100 %.
pub fn change_color(pct: f64) -> Color32 {
    if pct == 0.0 || !pct.is_finite() {
        return Color32::GRAY;
    }
    let hue = if pct > 0.0 { 120.0 } else { 0.0 };
    let strength = (pct.abs() / 100.0).min(1.0) as f32;
    hsl_to_color32(hue, 0.35 + 0.5 * strength, 0.5)
}
