use crate::auth::{AuthContext, SessionAuth};
use crate::data::filter::{Criterion, FilterCriteria};
use crate::data::model::{Dataset, FieldValue};
use crate::data::paginate::clamp_page;
use crate::data::pipeline::Query;
use crate::data::sort::SortSpec;
use crate::screen::{FilterField, ScreenKind, ScreenReport, ScreenView};

// ---------------------------------------------------------------------------
// Per-screen selections
// ---------------------------------------------------------------------------

/// Filter, sort and page selections of the open screen.
///
/// Every change to the criteria, the search term or the sort sends the
/// page back to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenState {
    pub kind: ScreenKind,
    pub criteria: FilterCriteria,
    pub sort: Option<SortSpec>,
    /// 1-based.
    pub page: usize,
}

impl ScreenState {
    pub fn new(kind: ScreenKind) -> Self {
        Self {
            kind,
            criteria: FilterCriteria::new(),
            sort: kind.default_sort(),
            page: 1,
        }
    }

    fn reset_page_if(&mut self, changed: bool) -> bool {
        if changed {
            self.page = 1;
        }
        changed
    }

    pub fn set_criterion(&mut self, field: &str, criterion: Criterion) -> bool {
        let changed = self.criteria.set(field, criterion);
        self.reset_page_if(changed)
    }

    /// Select `choice` in a single-select, or `All` with `None`.
    pub fn select(&mut self, field: &FilterField, choice: Option<&FieldValue>) -> bool {
        let criterion = choice.map_or(Criterion::All, |c| field.criterion_for(c));
        self.set_criterion(field.field, criterion)
    }

    /// Flip `choice` in a multi-select.
    pub fn toggle(&mut self, field: &FilterField, choice: &FieldValue) -> bool {
        let next = field.toggled(self.criteria.get(field.field), choice);
        self.set_criterion(field.field, next)
    }

    pub fn set_search(&mut self, term: &str) -> bool {
        let changed = self.criteria.set_search(term.trim());
        self.reset_page_if(changed)
    }

    /// Header click on `key`.
    pub fn request_sort(&mut self, key: &str) {
        self.sort = Some(self.kind.request_sort(self.sort.take(), key));
        self.page = 1;
    }

    pub fn clear_filters(&mut self) -> bool {
        let changed = self.criteria.clear();
        self.reset_page_if(changed)
    }

    /// Move to `page`, clamped into `[1, total_pages]`.
    pub fn set_page(&mut self, page: usize, total_pages: usize) {
        self.page = clamp_page(page, total_pages);
    }

    pub fn query(&self) -> Query {
        self.kind.query(self.criteria.clone(), self.sort.clone())
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    pub auth: SessionAuth,

    /// Selections of the open screen.
    pub screen: ScreenState,

    /// Pipeline result for the open screen (cached).
    pub view: Option<ScreenView>,

    /// KPIs and charts for the open screen (cached).
    pub report: Option<ScreenReport>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(SessionAuth::anonymous(), ScreenKind::default())
    }
}

impl AppState {
    pub fn new(auth: SessionAuth, kind: ScreenKind) -> Self {
        Self {
            dataset: None,
            auth,
            screen: ScreenState::new(kind),
            view: None,
            report: None,
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset. The open screen is kept when it shows
    /// this kind of record, otherwise the first matching screen opens.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        let domain = crate::data::normalize::Domain::of(&dataset);
        let kind = if self.screen.kind.config().domain == domain {
            self.screen.kind
        } else {
            ScreenKind::default_for(domain, &self.auth).unwrap_or(self.screen.kind)
        };
        self.screen = ScreenState::new(kind);
        self.dataset = Some(dataset);
        self.recompute();
    }

    /// Open another screen with fresh selections.
    pub fn switch_screen(&mut self, kind: ScreenKind) {
        if kind != self.screen.kind {
            log::debug!("Switching to {kind}");
            self.screen = ScreenState::new(kind);
            self.recompute();
        }
    }

    /// Re-run the pipeline and the report of the open screen.
    pub fn recompute(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let kind = self.screen.kind;
        let result = kind
            .build(ds, &self.screen.query(), &self.auth)
            .and_then(|view| Ok((view, kind.report(ds, &self.screen.criteria, &self.auth)?)));
        match result {
            Ok((view, report)) => {
                self.screen.page = clamp_page(self.screen.page, view.total_pages());
                self.view = Some(view);
                self.report = Some(report);
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("{e}");
                self.view = None;
                self.report = None;
                self.status_message = Some(e.to_string());
            }
        }
    }

    pub fn set_criterion(&mut self, field: &str, criterion: Criterion) {
        if self.screen.set_criterion(field, criterion) {
            self.recompute();
        }
    }

    pub fn select(&mut self, field: &FilterField, choice: Option<&FieldValue>) {
        if self.screen.select(field, choice) {
            self.recompute();
        }
    }

    pub fn toggle(&mut self, field: &FilterField, choice: &FieldValue) {
        if self.screen.toggle(field, choice) {
            self.recompute();
        }
    }

    pub fn set_search(&mut self, term: &str) {
        if self.screen.set_search(term) {
            self.recompute();
        }
    }

    pub fn request_sort(&mut self, key: &str) {
        self.screen.request_sort(key);
        self.recompute();
    }

    pub fn clear_filters(&mut self) {
        if self.screen.clear_filters() {
            self.recompute();
        }
    }

    /// Paging only re-slices the cached view.
    pub fn go_to_page(&mut self, page: usize) {
        let total = self.view.as_ref().map_or(1, ScreenView::total_pages);
        self.screen.set_page(page, total);
    }

    pub fn sign_in(&mut self, token: &str) {
        self.auth = SessionAuth::with_token(token);
        if self.auth.is_admin() {
            log::info!("Admin session opened");
        }
        self.recompute();
    }

    /// Drop admin rights; an admin screen falls back to a public one.
    pub fn sign_out(&mut self) {
        self.auth.sign_out();
        if self.screen.kind.authorize(&self.auth).is_err() {
            self.screen = ScreenState::new(ScreenKind::default());
        }
        self.recompute();
    }
}
