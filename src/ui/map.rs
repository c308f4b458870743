use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Plot, PlotPoints, Polygon};

use electoral_lens::data::geometry::polygon_rings;
use electoral_lens::state::AppState;

use super::to_color32;

// ---------------------------------------------------------------------------
// Choropleth map (central panel)
// ---------------------------------------------------------------------------

/// Draw every polygon feature of the merged collection, filled with its
/// choropleth colour at the current layer opacity.
pub fn choropleth_map(ui: &mut Ui, state: &AppState) {
    let merged = match &state.merged {
        Some(fc) => fc,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                if state.has_data() {
                    ui.heading("Load a GeoJSON file to see the map  (File → Open…)");
                } else {
                    ui.heading("Open a CSV or GeoJSON file to begin  (File → Open…)");
                }
            });
            return;
        }
    };

    let outline = Stroke::new(0.5, Color32::WHITE);

    Plot::new("choropleth_map")
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (idx, feature) in merged.features.iter().enumerate() {
                let Some(geometry) = &feature.geometry else {
                    continue;
                };
                let fill = state
                    .colors
                    .get(idx)
                    .map(|c| to_color32(*c, state.opacity))
                    .unwrap_or(Color32::TRANSPARENT);

                // Hover name: the metric value when present, else the index.
                let name = state
                    .metric
                    .as_deref()
                    .and_then(|m| feature.properties.get(m))
                    .filter(|v| !v.is_null())
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| format!("feature {idx}"));

                for ring in polygon_rings(geometry) {
                    let points: PlotPoints = ring.into_iter().collect();
                    plot_ui.polygon(
                        Polygon::new(points)
                            .name(&name)
                            .fill_color(fill)
                            .stroke(outline),
                    );
                }
            }
        });
}
