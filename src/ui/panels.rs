use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use catalog_lens::auth::AuthContext;
use catalog_lens::data::filter::Criterion;
use catalog_lens::data::model::FieldValue;
use catalog_lens::screen::{FilterField, FilterKind, ScreenKind};
use catalog_lens::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel for the open screen.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Choices are resolved up front so the widgets can mutate `state`.
    let fields: Vec<(FilterField, Vec<FieldValue>)> = state
        .screen
        .kind
        .config()
        .filters
        .iter()
        .map(|f| (*f, f.choices(dataset)))
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (field, choices) in &fields {
                match field.kind {
                    FilterKind::Search => search_box(ui, state, field),
                    FilterKind::Single | FilterKind::Platform { multi: false } => {
                        single_select(ui, state, field, choices)
                    }
                    FilterKind::Multi | FilterKind::Platform { multi: true } => {
                        multi_select(ui, state, field, choices)
                    }
                    FilterKind::Range { lo, hi, min_only } => {
                        range_slider(ui, state, field, lo, hi, min_only)
                    }
                }
                ui.add_space(6.0);
            }

            ui.separator();
            if ui
                .add_enabled(state.screen.criteria.is_active(), egui::Button::new("Reset filters"))
                .clicked()
            {
                state.clear_filters();
            }
        });
}

fn search_box(ui: &mut Ui, state: &mut AppState, field: &FilterField) {
    ui.strong(field.label);
    let mut text = state.screen.criteria.search().unwrap_or_default().to_string();
    let edit = egui::TextEdit::singleline(&mut text).hint_text("Search by title…");
    if ui.add(edit).changed() {
        state.set_search(&text);
    }
}

fn single_select(ui: &mut Ui, state: &mut AppState, field: &FilterField, choices: &[FieldValue]) {
    ui.strong(field.label);
    let current = state.screen.criteria.get(field.field).clone();
    let selected = choices
        .iter()
        .find(|c| field.is_selected(&current, c))
        .map_or_else(|| format!("All {}s", field.label), |c| c.to_string());

    egui::ComboBox::from_id_salt(field.label)
        .selected_text(selected)
        .show_ui(ui, |ui: &mut Ui| {
            if ui
                .selectable_label(current == Criterion::All, "All")
                .clicked()
            {
                state.select(field, None);
            }
            for choice in choices {
                let on = field.is_selected(&current, choice);
                if ui.selectable_label(on, choice.to_string()).clicked() {
                    state.select(field, Some(choice));
                }
            }
        });
}

fn multi_select(ui: &mut Ui, state: &mut AppState, field: &FilterField, choices: &[FieldValue]) {
    let current = state.screen.criteria.get(field.field).clone();
    let n_selected = choices
        .iter()
        .filter(|c| field.is_selected(&current, c))
        .count();
    let header_text = format!("{}  ({n_selected}/{})", field.label, choices.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(field.label)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            if ui.small_button("Clear").clicked() {
                state.set_criterion(field.field, Criterion::All);
            }
            for choice in choices {
                let mut checked = field.is_selected(&current, choice);
                if ui.checkbox(&mut checked, choice.to_string()).changed() {
                    state.toggle(field, choice);
                }
            }
        });
}

fn range_slider(
    ui: &mut Ui,
    state: &mut AppState,
    field: &FilterField,
    lo: f64,
    hi: f64,
    min_only: bool,
) {
    ui.strong(field.label);
    let (mut min, mut max) = match state.screen.criteria.get(field.field) {
        Criterion::Range { min, max } => (*min, *max),
        _ => (lo, hi),
    };

    let mut changed = ui
        .add(egui::Slider::new(&mut min, lo..=hi).step_by(0.5).text("min"))
        .changed();
    if !min_only {
        changed |= ui
            .add(egui::Slider::new(&mut max, lo..=hi).step_by(0.5).text("max"))
            .changed();
    }
    if changed {
        let criterion = if min <= lo && max >= hi {
            Criterion::All
        } else {
            Criterion::Range {
                min,
                max: max.max(min),
            }
        };
        state.set_criterion(field.field, criterion);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState, token_input: &mut String) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.menu_button("Session", |ui: &mut Ui| {
            if state.auth.is_admin() {
                if ui.button("Sign out").clicked() {
                    state.sign_out();
                    ui.close_menu();
                }
            } else {
                ui.label("Admin token");
                ui.add(egui::TextEdit::singleline(token_input).password(true));
                if ui.button("Sign in").clicked() {
                    state.sign_in(token_input);
                    token_input.clear();
                    ui.close_menu();
                }
            }
        });

        ui.separator();

        let current = state.screen.kind;
        let screens: Vec<ScreenKind> = ScreenKind::available(&state.auth).collect();
        egui::ComboBox::from_id_salt("screen")
            .selected_text(current.to_string())
            .show_ui(ui, |ui: &mut Ui| {
                for kind in screens {
                    if ui.selectable_label(kind == current, kind.to_string()).clicked() {
                        state.switch_screen(kind);
                    }
                }
            });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let shown = state.view.as_ref().map_or(0, |v| v.len());
            ui.label(format!("{} records loaded, {shown} shown", ds.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Open catalog data")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_files();

    if let Some(paths) = files {
        match catalog_lens::data::loader::load_merged(&paths) {
            Ok(dataset) => state.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
