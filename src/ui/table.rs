use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use catalog_lens::data::model::{ContentRecord, Record, UserRecord};
use catalog_lens::data::paginate::Page;
use catalog_lens::screen::ScreenView;
use catalog_lens::state::AppState;

const CONTENT_COLUMNS: &[(&str, &str)] = &[
    ("title", "Title"),
    ("year", "Year"),
    ("type", "Type"),
    ("category", "Category"),
    ("industry", "Industry"),
    ("platform", "Platform"),
    ("rating", "IMDb"),
    ("collection", "Collection (Cr)"),
    ("status", "Status"),
];

const USER_COLUMNS: &[(&str, &str)] = &[
    ("username", "Username"),
    ("email", "Email"),
    ("subscription_tier", "Tier"),
    ("account_status", "Status"),
    ("watch_time_mins", "Watch Time"),
    ("preferences", "Preferences"),
];

/// What the user clicked this frame; applied after the table is drawn.
enum TableAction {
    Sort(String),
    Page(usize),
}

// ---------------------------------------------------------------------------
// Record table with pagination
// ---------------------------------------------------------------------------

pub fn record_table(ui: &mut Ui, state: &mut AppState) {
    let Some(view) = &state.view else {
        return;
    };
    let config = state.screen.kind.config();
    let sort = state.screen.sort.as_ref();
    let header = |key: &str, label: &str| -> (bool, String) {
        let sortable = config.sort_keys.iter().any(|(k, _)| *k == key);
        match sort {
            Some(s) if sortable && s.key == key => (true, format!("{label} {}", s.direction.arrow())),
            _ => (sortable, label.to_string()),
        }
    };

    let action = match view {
        ScreenView::Content(v) => {
            let page = v.page(state.screen.page);
            let clicked = draw_table(ui, CONTENT_COLUMNS, &header, &page, content_cell);
            clicked.or_else(|| pager(ui, &page))
        }
        ScreenView::Users(v) => {
            let page = v.page(state.screen.page);
            let clicked = draw_table(ui, USER_COLUMNS, &header, &page, user_cell);
            clicked.or_else(|| pager(ui, &page))
        }
    };

    match action {
        Some(TableAction::Sort(key)) => state.request_sort(&key),
        Some(TableAction::Page(p)) => state.go_to_page(p),
        None => {}
    }
}

fn content_cell(rec: &ContentRecord, key: &str) -> String {
    rec.field(key).map(|v| v.to_string()).unwrap_or_default()
}

fn user_cell(rec: &UserRecord, key: &str) -> String {
    match key {
        "watch_time_mins" => rec.watch_time_label(),
        _ => rec.field(key).map(|v| v.to_string()).unwrap_or_default(),
    }
}

fn draw_table<R>(
    ui: &mut Ui,
    columns: &[(&str, &str)],
    header: &dyn Fn(&str, &str) -> (bool, String),
    page: &Page<'_, R>,
    cell: fn(&R, &str) -> String,
) -> Option<TableAction> {
    let mut action = None;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(420.0)
        .column(Column::auto().at_least(160.0))
        .columns(Column::auto().at_least(60.0), columns.len() - 1)
        .header(22.0, |mut row| {
            for (key, label) in columns {
                row.col(|ui: &mut Ui| {
                    let (sortable, text) = header(key, label);
                    if sortable {
                        if ui.button(RichText::new(text).strong()).clicked() {
                            action = Some(TableAction::Sort(key.to_string()));
                        }
                    } else {
                        ui.strong(text);
                    }
                });
            }
        })
        .body(|mut body| {
            for rec in page.items {
                body.row(20.0, |mut row| {
                    for (key, _) in columns {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell(rec, key));
                        });
                    }
                });
            }
        });

    action
}

fn pager<R>(ui: &mut Ui, page: &Page<'_, R>) -> Option<TableAction> {
    let mut action = None;
    ui.separator();
    ui.horizontal(|ui: &mut Ui| {
        if ui
            .add_enabled(page.has_prev(), egui::Button::new("◀ Prev"))
            .clicked()
        {
            action = Some(TableAction::Page(page.page - 1));
        }
        ui.label(format!("Page {} of {}", page.page, page.total_pages));
        if ui
            .add_enabled(page.has_next(), egui::Button::new("Next ▶"))
            .clicked()
        {
            action = Some(TableAction::Page(page.page + 1));
        }
        ui.separator();
        let (first, last) = page.shown_range();
        ui.label(format!("Showing {first}–{last} of {}", page.total_items));
    });
    action
}
