use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Plot};

use electoral_lens::color::generate_palette;
use electoral_lens::data::loader::load_file;
use electoral_lens::data::model::{ColumnStats, Value};
use electoral_lens::data::stats::{category_counts, party_column};
use electoral_lens::state::{Action, AppState};

use super::to_color32;

// ---------------------------------------------------------------------------
// Right side panel
// ---------------------------------------------------------------------------

/// Render the side panel: map controls, statistics and the party chart.
pub fn side_panel(ui: &mut Ui, state: &AppState, actions: &mut Vec<Action>) {
    if !state.has_data() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            controls(ui, state, actions);
            ui.separator();
            statistics_table(ui, state);
            ui.separator();
            party_chart(ui, state);
        });
}

fn controls(ui: &mut Ui, state: &AppState, actions: &mut Vec<Action>) {
    ui.heading("Map controls");

    ui.strong("Choropleth metric");
    let current = state.metric.clone().unwrap_or_default();
    egui::ComboBox::from_id_salt("metric")
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            if state.metrics.is_empty() {
                ui.label("No numeric metrics found");
            }
            for metric in &state.metrics {
                if ui.selectable_label(current == *metric, metric).clicked() {
                    actions.push(Action::MetricChanged(metric.clone()));
                }
            }
        });

    if let Some(scale) = &state.scale {
        ui.horizontal(|ui: &mut Ui| {
            for (label, color) in scale.legend_entries() {
                ui.label(RichText::new("■").color(to_color32(color, 1.0)));
                ui.label(label);
            }
        });
    }

    ui.strong("Layer opacity");
    let mut opacity = state.opacity;
    let slider = egui::Slider::new(&mut opacity, 0.0..=1.0)
        .step_by(0.1)
        .fixed_decimals(1);
    if ui.add(slider).changed() {
        actions.push(Action::OpacityChanged(opacity));
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

fn statistics_table(ui: &mut Ui, state: &AppState) {
    ui.heading("Descriptive statistics");

    let Some(stats) = state.statistics.as_ref().filter(|s| !s.is_empty()) else {
        ui.label("No statistics available for this dataset.");
        return;
    };

    let fields: [(&str, fn(&ColumnStats) -> String); 6] = [
        ("Mean", |s| format_number(s.mean)),
        ("Median", |s| format_number(s.median)),
        ("Mode", |s| format_mode(s.mode.as_ref())),
        ("Std. Dev", |s| format_number(s.std_dev)),
        ("Min", |s| format_number(s.min)),
        ("Max", |s| format_number(s.max)),
    ];

    ui.push_id("statistics", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::auto().at_least(80.0))
            .columns(Column::auto().at_least(50.0), fields.len())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Column");
                });
                for (label, _) in &fields {
                    header.col(|ui| {
                        ui.strong(*label);
                    });
                }
            })
            .body(|mut body| {
                for (name, column) in stats {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label(RichText::new(name).strong());
                        });
                        for (_, field) in &fields {
                            row.col(|ui| {
                                ui.monospace(field(column));
                            });
                        }
                    });
                }
            });
    });
}

/// Integers print as-is, everything else with at most two decimals.
fn format_number(value: Option<f64>) -> String {
    match value {
        None => "N/A".to_string(),
        Some(v) if v.fract() == 0.0 => format!("{v}"),
        Some(v) => {
            let rounded = format!("{v:.2}");
            rounded.trim_end_matches('0').trim_end_matches('.').to_string()
        }
    }
}

fn format_mode(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(v)) => format_number(Some(*v)),
        Some(Value::Text(s)) => s.clone(),
        _ => "N/A".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Party chart
// ---------------------------------------------------------------------------

fn party_chart(ui: &mut Ui, state: &AppState) {
    ui.heading("Party breakdown");

    let rows = state.tabular.as_deref().unwrap_or_default();
    let counts = category_counts(rows);
    if counts.is_empty() {
        ui.label("No chartable data found. Try a dataset with a categorical column like 'party'.");
        return;
    }

    let palette = generate_palette(counts.len());
    let bars: Vec<Bar> = counts
        .iter()
        .zip(palette)
        .enumerate()
        .map(|(i, ((label, count), color))| {
            Bar::new(i as f64, *count as f64)
                .name(label)
                .fill(Color32::from_rgb(color.red, color.green, color.blue))
        })
        .collect();

    let title = party_column(rows).unwrap_or_default().to_string();
    Plot::new("party_chart")
        .height(220.0)
        .legend(egui_plot::Legend::default())
        .y_axis_label("Rows")
        .x_axis_label(title)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &AppState, actions: &mut Vec<Action>) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(actions);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.has_data(), egui::Button::new("Clear"))
                .clicked()
            {
                actions.push(Action::Cleared);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(name) = &state.file_name {
            ui.label(name);
        }
        if let Some(merged) = &state.merged {
            ui.label(format!("{} features", merged.len()));
        }
        if let Some(rows) = &state.tabular {
            ui.label(format!("{} records", rows.len()));
        }
        if state.loading {
            ui.spinner();
        }

        if let Some(msg) = &state.error {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(actions: &mut Vec<Action>) {
    let file = rfd::FileDialog::new()
        .set_title("Open election data")
        .add_filter("Supported files", &["csv", "json", "geojson"])
        .add_filter("CSV", &["csv"])
        .add_filter("GeoJSON", &["json", "geojson"])
        .pick_file();

    let Some(path) = file else {
        return;
    };

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    actions.push(Action::LoadStarted { file_name });

    match load_file(&path) {
        Ok(dataset) => actions.push(Action::Loaded(dataset)),
        Err(e) => {
            log::error!("Failed to load file: {e:#}");
            actions.push(Action::LoadFailed(format!("Error: {e:#}")));
        }
    }
}
