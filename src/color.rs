use std::collections::BTreeMap;

use ad_insights::data::metrics::Metric;
use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Fill for the rate scatter points.
pub const SCATTER: Color32 = Color32::from_rgb(0x19, 0x7d, 0x8c);
/// Highlight for totals under the query tables.
pub const TOTAL: Color32 = Color32::ORANGE;
/// Term colour in the glossaries.
pub const GLOSSARY_TERM: Color32 = Color32::from_rgb(0xff, 0x4b, 0x4b);

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
            let hsl = Hsl::new(hue, 0.65, 0.45);
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
// Metric → Color32
// ---------------------------------------------------------------------------

/// One fixed colour per metric so a series keeps its colour when others are
/// toggled off.
#[derive(Debug, Clone)]
pub struct MetricColors {
    mapping: BTreeMap<Metric, Color32>,
}

impl Default for MetricColors {
    fn default() -> Self {
        let mapping = Metric::ALL
            .into_iter()
            .zip(generate_palette(Metric::ALL.len()))
            .collect();
        Self { mapping }
    }
}

impl MetricColors {
    pub fn color_for(&self, metric: Metric) -> Color32 {
        self.mapping.get(&metric).copied().unwrap_or(Color32::GRAY)
    }
}
