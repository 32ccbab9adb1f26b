use eframe::egui::{self, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use catalog_lens::screen::{Chart, ChartKind, ScreenReport};

use crate::color::{ColorMap, ACCENT};

const CHART_HEIGHT: f32 = 220.0;

// ---------------------------------------------------------------------------
// Report charts (central panel)
// ---------------------------------------------------------------------------

/// Render every chart of the report, two per row.
pub fn report_charts(ui: &mut Ui, report: &ScreenReport) {
    for pair in report.charts.chunks(2) {
        ui.columns(2, |cols: &mut [Ui]| {
            for (col, chart) in cols.iter_mut().zip(pair) {
                col.group(|ui: &mut Ui| {
                    ui.strong(chart.title);
                    render_chart(ui, chart);
                });
            }
        });
        ui.add_space(6.0);
    }
}

fn render_chart(ui: &mut Ui, chart: &Chart) {
    if chart.points.is_empty() {
        ui.label("No data");
        return;
    }
    match chart.kind {
        ChartKind::Bar | ChartKind::Histogram => bar_chart(ui, chart),
        ChartKind::Pie => share_chart(ui, chart),
        ChartKind::Line => line_chart(ui, chart),
    }
}

/// Category axis: integer grid marks show the point labels.
fn labelled_plot(chart: &Chart) -> Plot<'static> {
    let labels: Vec<String> = chart.points.iter().map(|p| p.label.clone()).collect();
    Plot::new(chart.title)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_grid([false, true])
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
}

fn bar_chart(ui: &mut Ui, chart: &Chart) {
    let colors = ColorMap::new(chart.points.iter().map(|p| p.label.as_str()));
    let width = if chart.kind == ChartKind::Histogram { 0.95 } else { 0.6 };
    let bars: Vec<Bar> = chart
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let fill = match chart.kind {
                ChartKind::Histogram => ACCENT,
                _ => colors.color_for(&p.label),
            };
            Bar::new(i as f64, p.value).name(&p.label).width(width).fill(fill)
        })
        .collect();

    labelled_plot(chart).show(ui, |plot_ui| {
        plot_ui.bar_chart(BarChart::new(bars).name(chart.title));
    });
}

/// Share of each label, drawn as one legend entry per slice.
fn share_chart(ui: &mut Ui, chart: &Chart) {
    let colors = ColorMap::new(chart.points.iter().map(|p| p.label.as_str()));
    let total: f64 = chart.points.iter().map(|p| p.value).sum();

    labelled_plot(chart)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            for (i, p) in chart.points.iter().enumerate() {
                let share = if total > 0.0 { 100.0 * p.value / total } else { 0.0 };
                let bar = Bar::new(i as f64, p.value).width(0.6);
                plot_ui.bar_chart(
                    BarChart::new(vec![bar])
                        .name(format!("{} ({share:.0}%)", p.label))
                        .color(colors.color_for(&p.label)),
                );
            }
        });
}

fn line_chart(ui: &mut Ui, chart: &Chart) {
    let coords: Vec<[f64; 2]> = chart
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| [i as f64, p.value])
        .collect();

    labelled_plot(chart).show(ui, |plot_ui| {
        plot_ui.line(
            Line::new(PlotPoints::from(coords.clone()))
                .name(chart.title)
                .color(ACCENT)
                .width(2.0),
        );
        plot_ui.points(Points::new(PlotPoints::from(coords)).radius(4.0).color(ACCENT));
    });
}

// ---------------------------------------------------------------------------
// KPI cards
// ---------------------------------------------------------------------------

pub fn kpi_row(ui: &mut Ui, report: &ScreenReport) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for kpi in &report.kpis {
            ui.group(|ui: &mut Ui| {
                ui.vertical(|ui: &mut Ui| {
                    ui.label(egui::RichText::new(kpi.label).small());
                    ui.label(egui::RichText::new(&kpi.value).heading().strong());
                });
            });
        }
    });
}
