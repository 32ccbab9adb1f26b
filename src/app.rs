use eframe::egui::{self, RichText, ScrollArea, Ui};

use catalog_lens::state::AppState;

use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CatalogLensApp {
    pub state: AppState,
    /// Admin token being typed into the session menu.
    token_input: String,
}

impl CatalogLensApp {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            token_input: String::new(),
        }
    }
}

impl eframe::App for CatalogLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, &mut self.token_input);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: KPIs, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            central_panel(ui, &mut self.state);
        });
    }
}

fn central_panel(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a catalog to browse it  (File → Open…)");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(state.screen.kind.to_string());

            if let Some(report) = &state.report {
                plot::kpi_row(ui, report);
                if !report.upcoming.is_empty() {
                    ui.add_space(6.0);
                    ui.strong("Coming soon");
                    ui.horizontal_wrapped(|ui: &mut Ui| {
                        for rec in &report.upcoming {
                            ui.label(RichText::new(&rec.title).monospace());
                        }
                    });
                }
                ui.add_space(8.0);
                plot::report_charts(ui, report);
            }

            ui.separator();
            table::record_table(ui, state);
        });
}
