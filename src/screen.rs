//! Per-screen configuration and reports.
//!
//! A screen fixes, at compile time, which filters it offers, its page size,
//! its default ordering and where deduplication runs. [`ScreenKind::build`]
//! runs the pipeline for a screen and [`ScreenKind::report`] derives the KPIs
//! and chart series shown above its table.

use std::fmt;

use clap::ValueEnum;
use serde::Serialize;

use crate::auth::AuthContext;
use crate::data::aggregate::{
    count_where, fmt_kpi, group_count, group_sum, platform_counts, sum, top_n, values, year_trend,
    BucketCount, GroupCount, GroupSum, Histogram, NumericSummary, TopEntry, TOP_LABEL_BUDGET,
};
use crate::data::dedupe::DedupeOrder;
use crate::data::filter::{filter, Criterion, FilterCriteria};
use crate::data::model::{
    ContentRecord, Dataset, FieldValue, Status, UserRecord, LIBRARY_PLATFORMS,
};
use crate::data::normalize::Domain;
use crate::data::paginate::PageSize;
use crate::data::pipeline::{Query, View};
use crate::data::sort::{Direction, Missing, SortSpec};
use crate::error::EngineError;

/// Release year of the "coming soon" strip on the trending screen.
pub const UPCOMING_YEAR: i64 = 2026;
/// Number of titles in the "coming soon" strip.
pub const UPCOMING_STRIP_LEN: usize = 8;
/// Years plotted by the movie analytics trend line.
pub const TREND_YEARS: [i64; 2] = [2025, 2026];
/// Stored `type` values counted as series.
pub const SERIES_TYPES: [&str; 3] = ["series", "tv show", "tv-show"];

// ---------------------------------------------------------------------------
// Filter widgets
// ---------------------------------------------------------------------------

/// How a filter field is edited and which [`Criterion`] it produces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterKind {
    /// One value or `All` → [`Criterion::Exact`].
    Single,
    /// Any number of values → [`Criterion::AnyOf`].
    Multi,
    /// Closed interval → [`Criterion::Range`]. With `min_only` only the lower
    /// bound is editable and the upper bound stays at `hi`.
    Range { lo: f64, hi: f64, min_only: bool },
    /// Platform membership → [`Criterion::Platform`] or [`Criterion::Platforms`].
    Platform { multi: bool },
    /// Title substring search.
    Search,
}

/// A choice that stands for several stored values, e.g. `series/tv show`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionGroup {
    pub label: &'static str,
    pub members: &'static [&'static str],
}

/// One filter control of a screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterField {
    pub field: &'static str,
    pub label: &'static str,
    pub kind: FilterKind,
    /// Fixed choices. Empty means the dataset's distinct values.
    pub options: &'static [&'static str],
    pub groups: &'static [OptionGroup],
}

impl FilterField {
    const fn new(field: &'static str, label: &'static str, kind: FilterKind) -> Self {
        FilterField {
            field,
            label,
            kind,
            options: &[],
            groups: &[],
        }
    }

    const fn with_options(self, options: &'static [&'static str]) -> Self {
        FilterField { options, ..self }
    }

    const fn with_groups(self, groups: &'static [OptionGroup]) -> Self {
        FilterField { groups, ..self }
    }

    /// Values offered by a select: the fixed options and groups, or the
    /// distinct values found in `dataset`.
    pub fn choices(&self, dataset: &Dataset) -> Vec<FieldValue> {
        if !self.options.is_empty() || !self.groups.is_empty() {
            return self
                .options
                .iter()
                .chain(self.groups.iter().map(|g| &g.label))
                .map(|s| FieldValue::from(*s))
                .collect();
        }
        match self.kind {
            FilterKind::Platform { .. } => dataset.options("platform"),
            FilterKind::Search | FilterKind::Range { .. } => Vec::new(),
            FilterKind::Single | FilterKind::Multi => dataset.options(self.field),
        }
    }

    /// Criterion selecting exactly `choice`.
    pub fn criterion_for(&self, choice: &FieldValue) -> Criterion {
        if let FilterKind::Platform { multi } = self.kind {
            let name = choice.to_string();
            return if multi {
                Criterion::platforms([name])
            } else {
                Criterion::Platform(name)
            };
        }
        match self.group(choice) {
            Some(group) => Criterion::any_of(group.members.iter().copied()),
            None => Criterion::Exact(choice.clone()),
        }
    }

    /// Multi-select toggle: add `choice` to `current`, or remove it if present.
    pub fn toggled(&self, current: &Criterion, choice: &FieldValue) -> Criterion {
        match (self.kind, current) {
            (FilterKind::Platform { .. }, Criterion::Platforms(set)) => {
                let mut set = set.clone();
                let name = choice.to_string();
                if !set.remove(&name) {
                    set.insert(name);
                }
                Criterion::Platforms(set)
            }
            (FilterKind::Multi, Criterion::AnyOf(set)) => {
                let mut set = set.clone();
                if !set.remove(choice) {
                    set.insert(choice.clone());
                }
                Criterion::AnyOf(set)
            }
            (FilterKind::Platform { .. }, _) => Criterion::platforms([choice.to_string()]),
            _ => Criterion::AnyOf([choice.clone()].into()),
        }
    }

    /// Whether `choice` is part of `current`, for checkbox and combo state.
    pub fn is_selected(&self, current: &Criterion, choice: &FieldValue) -> bool {
        match current {
            Criterion::Exact(v) => v == choice,
            Criterion::AnyOf(set) => match self.group(choice) {
                Some(group) => {
                    set.len() == group.members.len()
                        && group.members.iter().all(|m| set.contains(&FieldValue::from(*m)))
                }
                None => set.contains(choice),
            },
            Criterion::Platform(name) => choice.to_string() == *name,
            Criterion::Platforms(set) => set.contains(&choice.to_string()),
            Criterion::All | Criterion::Range { .. } => false,
        }
    }

    fn group(&self, choice: &FieldValue) -> Option<&'static OptionGroup> {
        self.groups
            .iter()
            .find(|g| matches!(choice, FieldValue::String(s) if s == g.label))
    }
}

// ---------------------------------------------------------------------------
// Screen configuration
// ---------------------------------------------------------------------------

/// Static configuration of one screen.
#[derive(Debug, Clone, Copy)]
pub struct ScreenConfig {
    pub title: &'static str,
    pub domain: Domain,
    pub filters: &'static [FilterField],
    pub page_size: PageSize,
    pub dedupe: DedupeOrder,
    pub admin_only: bool,
    /// Sortable columns as `(field, header)`.
    pub sort_keys: &'static [(&'static str, &'static str)],
    /// How null keys sort on this screen.
    pub missing: Missing,
}

const SEARCH: FilterField = FilterField::new("title", "Search", FilterKind::Search);

const TRENDING_FILTERS: &[FilterField] = &[
    FilterField::new("year", "Release Year", FilterKind::Single).with_options(&["2025", "2026"]),
    FilterField::new("industry", "Industry", FilterKind::Multi)
        .with_options(&["Hollywood", "Bollywood", "Tollywood"]),
    FilterField::new("category", "Category", FilterKind::Multi).with_options(&[
        "Action", "Drama", "Sci-Fi", "Thriller", "Family", "Fantasy", "Romance",
    ]),
    FilterField::new("platform", "Platform", FilterKind::Platform { multi: true })
        .with_options(&["Theatrical", "Netflix", "Prime Video", "Disney+", "Hulu"]),
];

const LIBRARY_FILTERS: &[FilterField] = &[
    SEARCH,
    FilterField::new("type", "Type", FilterKind::Single),
    FilterField::new("platform", "Platform", FilterKind::Platform { multi: false })
        .with_options(&LIBRARY_PLATFORMS),
    FilterField::new("year", "Year", FilterKind::Single),
    FilterField::new(
        "rating",
        "Min Rating",
        FilterKind::Range { lo: 0.0, hi: 10.0, min_only: true },
    ),
];

const MOVIE_ANALYTICS_FILTERS: &[FilterField] = &[
    FilterField::new("year", "Release Year", FilterKind::Single),
    FilterField::new("industry", "Industry", FilterKind::Single),
    FilterField::new("category", "Category", FilterKind::Single),
    FilterField::new("platform", "Platform", FilterKind::Platform { multi: false }),
    FilterField::new("status", "Status", FilterKind::Single),
];

const SERIES_GROUP: OptionGroup = OptionGroup {
    label: "series/tv show",
    members: &SERIES_TYPES,
};

const LIBRARY_ANALYTICS_FILTERS: &[FilterField] = &[
    FilterField::new("year", "Year", FilterKind::Single),
    FilterField::new(
        "rating",
        "IMDb Range",
        FilterKind::Range { lo: 0.0, hi: 10.0, min_only: false },
    ),
    FilterField::new("type", "Type", FilterKind::Single)
        .with_options(&["movie"])
        .with_groups(&[SERIES_GROUP]),
    FilterField::new("platform", "Platform", FilterKind::Platform { multi: false })
        .with_options(&LIBRARY_PLATFORMS),
    SEARCH,
];

const USER_FILTERS: &[FilterField] = &[
    FilterField::new("username", "Search", FilterKind::Search),
    FilterField::new("account_status", "Status", FilterKind::Single)
        .with_options(&["Active", "Banned", "Inactive"]),
    FilterField::new("subscription_tier", "Tier", FilterKind::Single)
        .with_options(&["Free", "Basic", "Standard", "Premium"]),
];

const TRENDING: ScreenConfig = ScreenConfig {
    title: "Trending Movies",
    domain: Domain::Content,
    filters: TRENDING_FILTERS,
    page_size: PageSize::fixed(100),
    dedupe: DedupeOrder::Never,
    admin_only: false,
    sort_keys: &[],
    missing: Missing::Zero,
};

const CONTENT_LIBRARY: ScreenConfig = ScreenConfig {
    title: "Content Library",
    domain: Domain::Content,
    filters: LIBRARY_FILTERS,
    page_size: PageSize::fixed(15),
    dedupe: DedupeOrder::Never,
    admin_only: true,
    sort_keys: &[("year", "Year"), ("rating", "IMDb"), ("title", "Title")],
    missing: Missing::Zero,
};

const MOVIE_ANALYTICS: ScreenConfig = ScreenConfig {
    title: "Movie Analytics",
    domain: Domain::Content,
    filters: MOVIE_ANALYTICS_FILTERS,
    page_size: PageSize::fixed(25),
    dedupe: DedupeOrder::AfterSort,
    admin_only: true,
    sort_keys: &[
        ("title", "Title"),
        ("year", "Year"),
        ("industry", "Industry"),
        ("category", "Category"),
        ("platform", "Platform"),
        ("rating", "IMDb"),
        ("collection", "Collection (Cr)"),
        ("status", "Status"),
    ],
    missing: Missing::BelowAll,
};

const LIBRARY_ANALYTICS: ScreenConfig = ScreenConfig {
    title: "Library Analytics",
    domain: Domain::Content,
    filters: LIBRARY_ANALYTICS_FILTERS,
    page_size: PageSize::fixed(10),
    dedupe: DedupeOrder::Never,
    admin_only: true,
    sort_keys: &[],
    missing: Missing::Zero,
};

const USER_MANAGEMENT: ScreenConfig = ScreenConfig {
    title: "User Management",
    domain: Domain::User,
    filters: USER_FILTERS,
    page_size: PageSize::fixed(10),
    dedupe: DedupeOrder::Never,
    admin_only: true,
    sort_keys: &[],
    missing: Missing::Zero,
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ScreenKind {
    #[default]
    Trending,
    ContentLibrary,
    MovieAnalytics,
    LibraryAnalytics,
    UserManagement,
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config().title)
    }
}

impl ScreenKind {
    pub const ALL: [ScreenKind; 5] = [
        ScreenKind::Trending,
        ScreenKind::ContentLibrary,
        ScreenKind::MovieAnalytics,
        ScreenKind::LibraryAnalytics,
        ScreenKind::UserManagement,
    ];

    pub fn config(self) -> &'static ScreenConfig {
        match self {
            ScreenKind::Trending => &TRENDING,
            ScreenKind::ContentLibrary => &CONTENT_LIBRARY,
            ScreenKind::MovieAnalytics => &MOVIE_ANALYTICS,
            ScreenKind::LibraryAnalytics => &LIBRARY_ANALYTICS,
            ScreenKind::UserManagement => &USER_MANAGEMENT,
        }
    }

    /// Ordering applied when the screen opens.
    pub fn default_sort(self) -> Option<SortSpec> {
        match self {
            ScreenKind::Trending => Some(
                SortSpec::descending("rating").then("collection", Direction::Descending, Missing::Zero),
            ),
            ScreenKind::ContentLibrary => Some(SortSpec::descending("year")),
            ScreenKind::MovieAnalytics => Some(SortSpec::descending("rating").missing(Missing::BelowAll)),
            ScreenKind::LibraryAnalytics | ScreenKind::UserManagement => None,
        }
    }

    /// Sort spec for a header click: same key toggles, a new key starts
    /// descending. Nulls sort per the screen's [`ScreenConfig::missing`].
    pub fn request_sort(self, current: Option<SortSpec>, key: &str) -> SortSpec {
        let missing = self.config().missing;
        match current {
            Some(mut spec) => {
                spec.request(key);
                spec.missing = missing;
                spec
            }
            None => SortSpec::descending(key).missing(missing),
        }
    }

    pub fn query(self, criteria: FilterCriteria, sort: Option<SortSpec>) -> Query {
        Query {
            criteria,
            sort,
            dedupe: self.config().dedupe,
        }
    }

    /// Screens `auth` may open, in menu order.
    pub fn available(auth: &dyn AuthContext) -> impl Iterator<Item = ScreenKind> + '_ {
        ScreenKind::ALL
            .into_iter()
            .filter(move |kind| kind.authorize(auth).is_ok())
    }

    /// First screen that shows records of `domain` and that `auth` may open.
    pub fn default_for(domain: Domain, auth: &dyn AuthContext) -> Option<ScreenKind> {
        ScreenKind::available(auth).find(|kind| kind.config().domain == domain)
    }

    pub fn authorize(self, auth: &dyn AuthContext) -> Result<(), EngineError> {
        if self.config().admin_only && !auth.is_admin() {
            return Err(EngineError::AdminRequired(self.config().title));
        }
        Ok(())
    }

    fn wrong_domain(self) -> EngineError {
        EngineError::WrongDomain {
            screen: self.config().title,
            expected: match self.config().domain {
                Domain::Content => "content",
                Domain::User => "user",
            },
        }
    }

    /// Run the screen's pipeline over `dataset`.
    pub fn build(
        self,
        dataset: &Dataset,
        query: &Query,
        auth: &dyn AuthContext,
    ) -> Result<ScreenView, EngineError> {
        self.authorize(auth)?;
        let page_size = self.config().page_size;
        match (self.config().domain, dataset.content(), dataset.users()) {
            (Domain::Content, Some(records), _) => {
                Ok(ScreenView::Content(View::build(records, query, page_size)))
            }
            (Domain::User, _, Some(records)) => {
                Ok(ScreenView::Users(View::build(records, query, page_size)))
            }
            _ => Err(self.wrong_domain()),
        }
    }

    /// KPIs and chart series over the records passing `criteria`. The search
    /// term only narrows the table and is ignored here.
    pub fn report(
        self,
        dataset: &Dataset,
        criteria: &FilterCriteria,
        auth: &dyn AuthContext,
    ) -> Result<ScreenReport, EngineError> {
        self.authorize(auth)?;
        let mut criteria = criteria.clone();
        criteria.set_search("");

        let mut report = ScreenReport::new(self);
        match (self, dataset.content(), dataset.users()) {
            (ScreenKind::UserManagement, _, Some(users)) => {
                let users = filter(users, &criteria);
                report.matching = users.len();
                user_report(&mut report, &users);
            }
            (ScreenKind::UserManagement, _, None) => return Err(self.wrong_domain()),
            (_, Some(content), _) => {
                let rows = filter(content, &criteria);
                report.matching = rows.len();
                match self {
                    ScreenKind::Trending => report.upcoming = upcoming_strip(content),
                    ScreenKind::ContentLibrary => library_report(&mut report, &rows),
                    ScreenKind::MovieAnalytics => movie_report(&mut report, &rows),
                    ScreenKind::LibraryAnalytics => library_analytics_report(&mut report, &rows),
                    ScreenKind::UserManagement => {}
                }
            }
            _ => return Err(self.wrong_domain()),
        }
        log::debug!(
            "{} report: {} records, {} KPIs, {} charts",
            self,
            report.matching,
            report.kpis.len(),
            report.charts.len()
        );
        Ok(report)
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Pipeline output of a screen, typed by record domain.
#[derive(Debug, Clone)]
pub enum ScreenView {
    Content(View<ContentRecord>),
    Users(View<UserRecord>),
}

impl ScreenView {
    pub fn len(&self) -> usize {
        match self {
            ScreenView::Content(v) => v.len(),
            ScreenView::Users(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_pages(&self) -> usize {
        match self {
            ScreenView::Content(v) => v.page(1).total_pages,
            ScreenView::Users(v) => v.page(1).total_pages,
        }
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpi {
    pub label: &'static str,
    pub value: String,
}

impl Kpi {
    fn count(label: &'static str, n: usize) -> Self {
        Kpi {
            label,
            value: n.to_string(),
        }
    }

    fn number(label: &'static str, v: Option<f64>) -> Self {
        Kpi {
            label,
            value: fmt_kpi(v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Pie,
    Line,
    Histogram,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

impl From<GroupCount> for ChartPoint {
    fn from(g: GroupCount) -> Self {
        ChartPoint {
            label: g.label,
            value: g.count as f64,
        }
    }
}

impl From<GroupSum> for ChartPoint {
    fn from(g: GroupSum) -> Self {
        ChartPoint {
            label: g.label,
            value: g.total,
        }
    }
}

impl From<BucketCount> for ChartPoint {
    fn from(b: BucketCount) -> Self {
        ChartPoint {
            label: b.label,
            value: b.count as f64,
        }
    }
}

impl<R> From<TopEntry<R>> for ChartPoint {
    fn from(t: TopEntry<R>) -> Self {
        ChartPoint {
            label: t.label,
            value: t.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub title: &'static str,
    pub kind: ChartKind,
    pub points: Vec<ChartPoint>,
}

impl Chart {
    fn new<P: Into<ChartPoint>>(title: &'static str, kind: ChartKind, points: Vec<P>) -> Self {
        Chart {
            title,
            kind,
            points: points.into_iter().map(Into::into).collect(),
        }
    }
}

/// Everything a screen shows besides its table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenReport {
    pub screen: ScreenKind,
    /// Records passing the filters, before search and deduplication.
    pub matching: usize,
    pub kpis: Vec<Kpi>,
    pub charts: Vec<Chart>,
    /// Trending only: upcoming titles, independent of the filters.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub upcoming: Vec<ContentRecord>,
}

impl ScreenReport {
    fn new(screen: ScreenKind) -> Self {
        ScreenReport {
            screen,
            matching: 0,
            kpis: Vec::new(),
            charts: Vec::new(),
            upcoming: Vec::new(),
        }
    }

    pub fn kpi(&self, label: &str) -> Option<&str> {
        self.kpis
            .iter()
            .find(|k| k.label == label)
            .map(|k| k.value.as_str())
    }

    pub fn chart(&self, title: &str) -> Option<&Chart> {
        self.charts.iter().find(|c| c.title == title)
    }
}

/// The first [`UPCOMING_STRIP_LEN`] upcoming titles of [`UPCOMING_YEAR`], in
/// catalog order.
pub fn upcoming_strip(records: &[ContentRecord]) -> Vec<ContentRecord> {
    records
        .iter()
        .filter(|r| r.year == Some(UPCOMING_YEAR) && r.status == Some(Status::Upcoming))
        .take(UPCOMING_STRIP_LEN)
        .cloned()
        .collect()
}

fn is_series(r: &ContentRecord) -> bool {
    r.content_type
        .as_deref()
        .is_some_and(|t| SERIES_TYPES.contains(&t))
}

fn is_movie(r: &ContentRecord) -> bool {
    r.content_type.as_deref() == Some("movie")
}

/// `"tv show"` → `"Tv show"`, leaving the rest as stored.
fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn library_report(report: &mut ScreenReport, rows: &[ContentRecord]) {
    report.kpis = vec![
        Kpi::count("Total Titles", rows.len()),
        Kpi::count("Movies", count_where(rows, is_movie)),
        Kpi::count("Series", count_where(rows, is_series)),
    ];
}

fn movie_report(report: &mut ScreenReport, rows: &[ContentRecord]) {
    let released: Vec<ContentRecord> = rows.iter().filter(|r| r.is_released()).cloned().collect();

    report.kpis = vec![
        Kpi::count("Total Movies", rows.len()),
        Kpi::count("Released", released.len()),
        Kpi::count("Upcoming", count_where(rows, |r| r.status == Some(Status::Upcoming))),
        Kpi::number("Avg Rating", NumericSummary::of(values(&released, "rating")).mean),
        Kpi::number("Total Collection (Cr)", Some(sum(&released, "collection"))),
    ];
    report.charts = vec![
        Chart::new("Industry Distribution", ChartKind::Pie, group_count(rows, "industry")),
        Chart::new(
            "Collection by Industry",
            ChartKind::Bar,
            group_sum(&released, "industry", "collection"),
        ),
        Chart::new(
            "Top 10 by Collection",
            ChartKind::Bar,
            top_n(rows, "collection", 10, TOP_LABEL_BUDGET),
        ),
        Chart::new(
            "Yearly Trend",
            ChartKind::Line,
            year_trend(rows, "year", Some(&TREND_YEARS)),
        ),
    ];
}

fn library_analytics_report(report: &mut ScreenReport, rows: &[ContentRecord]) {
    // Zero means "no score" in the library export.
    let rated = NumericSummary::of(values(rows, "rating").filter(|r| *r > 0.0));

    report.kpis = vec![
        Kpi::count("Total Titles", rows.len()),
        Kpi::count("Movies", count_where(rows, is_movie)),
        Kpi::count("Series", count_where(rows, is_series)),
        Kpi::number("Avg IMDb", rated.mean),
        Kpi::number("Max IMDb", rated.max),
        Kpi::number("Min IMDb", rated.min),
    ];

    let types: Vec<GroupCount> = group_count(rows, "type")
        .into_iter()
        .map(|g| GroupCount {
            label: capitalize(&g.label),
            count: g.count,
        })
        .collect();

    report.charts = vec![
        Chart::new("Titles by Year", ChartKind::Bar, year_trend(rows, "year", None)),
        Chart::new(
            "Titles by Platform",
            ChartKind::Bar,
            platform_counts(rows, &LIBRARY_PLATFORMS),
        ),
        Chart::new(
            "IMDb Distribution",
            ChartKind::Histogram,
            Histogram::ratings().bucket(rows, "rating"),
        ),
        Chart::new("Type Distribution", ChartKind::Pie, types),
    ];
}

fn user_report(report: &mut ScreenReport, users: &[UserRecord]) {
    let watch = NumericSummary::of(values(users, "watch_time_mins"));
    report.kpis = vec![
        Kpi::count("Total Users", users.len()),
        Kpi::count(
            "Active",
            count_where(users, |u| u.account_status == UserRecord::DEFAULT_STATUS),
        ),
        Kpi::count(
            "Paid",
            count_where(users, |u| u.subscription_tier != UserRecord::DEFAULT_TIER),
        ),
        Kpi::number("Avg Watch Time (h)", watch.mean.map(|m| m / 60.0)),
    ];
    report.charts = vec![
        Chart::new("Users by Tier", ChartKind::Pie, group_count(users, "subscription_tier")),
        Chart::new("Users by Status", ChartKind::Bar, group_count(users, "account_status")),
        Chart::new(
            "Platform Preferences",
            ChartKind::Bar,
            platform_counts(users, &LIBRARY_PLATFORMS),
        ),
    ];
}
