pub mod map;
pub mod panels;

use eframe::egui::Color32;
use electoral_lens::color::{self, Color};

/// Convert an engine colour to egui, applying the layer opacity.
pub fn to_color32(color: Color, opacity: f32) -> Color32 {
    let [r, g, b] = color::to_rgb8(color);
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(r, g, b, alpha)
}
