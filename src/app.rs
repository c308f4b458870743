use eframe::egui;

use electoral_lens::state::{Action, AppState};

use crate::ui::{map, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct ElectoralLensApp {
    pub state: AppState,
}

impl ElectoralLensApp {
    fn dispatch(&mut self, actions: Vec<Action>) {
        for action in actions {
            self.state = std::mem::take(&mut self.state).reduce(action);
        }
    }
}

impl eframe::App for ElectoralLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Widgets only read the state; changes come back as actions.
        let mut actions = Vec::new();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state, &mut actions);
        });

        // ---- Right side panel: controls, statistics, chart ----
        egui::SidePanel::right("summary_panel")
            .default_width(360.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.state, &mut actions);
            });

        // ---- Central panel: map ----
        egui::CentralPanel::default().show(ctx, |ui| {
            map::choropleth_map(ui, &self.state);
        });

        self.dispatch(actions);
    }
}
