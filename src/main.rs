mod app;
mod color;
mod ui;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use eframe::egui;
use log::LevelFilter;

use app::CatalogLensApp;
use catalog_lens::auth::{SessionAuth, ADMIN_TOKEN_ENV};
use catalog_lens::data::filter::Criterion;
use catalog_lens::data::loader::load_merged;
use catalog_lens::data::model::FieldValue;
use catalog_lens::screen::{FilterKind, ScreenKind, ScreenView};
use catalog_lens::state::{AppState, ScreenState};

/// Browse a media catalog and its admin analytics.
#[derive(Debug, Parser)]
#[command(name = "catalog-lens", version, about)]
struct Opts {
    /// Record file to open (.json, .csv, .parquet); repeat to merge content files in order
    #[arg(short, long = "data", value_name = "PATH")]
    data: Vec<PathBuf>,

    /// Screen to open
    #[arg(short, long, value_enum, default_value_t = ScreenKind::Trending)]
    screen: ScreenKind,

    /// Admin session token; required for every screen but Trending
    #[arg(long, env = ADMIN_TOKEN_ENV, hide_env_values = true)]
    admin_token: Option<String>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the screen's report and one table page as JSON instead of opening a window
    Report {
        /// 1-based table page
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Title search
        #[arg(long)]
        search: Option<String>,

        /// Filter as FIELD=VALUE; ranges as FIELD=MIN..MAX
        #[arg(long = "filter", value_name = "FIELD=VALUE", value_parser = parse_filter)]
        filters: Vec<(String, String)>,

        /// Sort key; repeating a key flips the direction
        #[arg(long = "sort", value_name = "KEY")]
        sort: Vec<String>,

        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn parse_filter(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected FIELD=VALUE, got '{s}'")),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Info,
        (false, 2) => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // RUST_LOG wins over the flags.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .init();
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    init_logging(opts.verbose, opts.quiet);

    let auth = SessionAuth::from_config(opts.admin_token.as_deref());
    match opts.command {
        Some(Command::Report {
            page,
            search,
            filters,
            sort,
            pretty,
        }) => {
            if opts.data.is_empty() {
                bail!("report needs at least one --data file");
            }
            let dataset = load_merged(&opts.data)?;
            let mut screen = ScreenState::new(opts.screen);
            for (field, value) in &filters {
                screen.set_criterion(field, criterion(opts.screen, field, value)?);
            }
            if let Some(term) = &search {
                screen.set_search(term);
            }
            for key in &sort {
                screen.request_sort(key);
            }

            let view = opts.screen.build(&dataset, &screen.query(), &auth)?;
            let report = opts.screen.report(&dataset, &screen.criteria, &auth)?;
            let out = match &view {
                ScreenView::Content(v) => serde_json::json!({ "report": report, "page": v.page(page) }),
                ScreenView::Users(v) => serde_json::json!({ "report": report, "page": v.page(page) }),
            };
            let text = if pretty {
                serde_json::to_string_pretty(&out)
            } else {
                serde_json::to_string(&out)
            }
            .context("serializing report")?;
            println!("{text}");
            Ok(())
        }
        None => run_gui(opts.data, opts.screen, auth),
    }
}

/// Criterion for a `--filter FIELD=VALUE` argument on `kind`.
fn criterion(kind: ScreenKind, field: &str, value: &str) -> Result<Criterion> {
    let widget = kind.config().filters.iter().find(|f| f.field == field);
    let Some(widget) = widget else {
        log::warn!("{kind} has no '{field}' filter; matching it exactly");
        return Ok(Criterion::Exact(FieldValue::from(value)));
    };
    match widget.kind {
        FilterKind::Range { hi, min_only, .. } => {
            let (min, max) = match value.split_once("..") {
                Some((min, max)) => (min, max),
                None if min_only => (value, ""),
                None => bail!("'{field}' expects MIN..MAX, got '{value}'"),
            };
            let min: f64 = min.trim().parse().with_context(|| format!("'{field}' minimum"))?;
            let max: f64 = match max.trim() {
                "" => hi,
                m => m.parse().with_context(|| format!("'{field}' maximum"))?,
            };
            Ok(Criterion::Range { min, max })
        }
        FilterKind::Multi => Ok(Criterion::any_of(value.split(',').map(str::trim))),
        FilterKind::Platform { multi: true } => Ok(Criterion::platforms(value.split(',').map(str::trim))),
        _ => Ok(widget.criterion_for(&FieldValue::from(value))),
    }
}

fn run_gui(data: Vec<PathBuf>, screen: ScreenKind, auth: SessionAuth) -> Result<()> {
    let mut state = AppState::new(auth, screen);
    if !data.is_empty() {
        match load_merged(&data) {
            Ok(dataset) => state.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Catalog Lens",
        options,
        Box::new(|_cc| Ok(Box::new(CatalogLensApp::new(state)))),
    )
    .map_err(|e| anyhow!("{e}"))
}
