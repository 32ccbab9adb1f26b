use std::collections::{BTreeMap, BTreeSet};

use crate::error::EngineError;

use super::model::{FieldValue, Record};

// ---------------------------------------------------------------------------
// Criterion: the rule attached to one field
// ---------------------------------------------------------------------------

/// A single field-level filter rule.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Criterion {
    /// No constraint.
    #[default]
    All,
    /// Keep records whose field matches the value (see [`FieldValue::matches`]).
    Exact(FieldValue),
    /// Keep records whose field matches any value of the set.
    /// An empty set is no constraint.
    AnyOf(BTreeSet<FieldValue>),
    /// Keep records with `min <= field <= max`; a missing value counts as 0.
    Range { min: f64, max: f64 },
    /// Keep records available on the platform.
    Platform(String),
    /// Keep records available on any of the platforms.
    /// An empty set is no constraint.
    Platforms(BTreeSet<String>),
}

impl Criterion {
    /// Multi-select over string values.
    pub fn any_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Criterion::AnyOf(
            values
                .into_iter()
                .map(|s| FieldValue::String(s.into()))
                .collect(),
        )
    }

    pub fn platforms<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Criterion::Platforms(names.into_iter().map(Into::into).collect())
    }

    /// Whether the criterion can remove anything.
    pub fn is_active(&self) -> bool {
        match self {
            Criterion::All => false,
            Criterion::AnyOf(set) => !set.is_empty(),
            Criterion::Platforms(set) => !set.is_empty(),
            _ => true,
        }
    }

    /// Platform criteria test membership flags, not the keyed field.
    fn reads_field(&self) -> bool {
        !matches!(self, Criterion::Platform(_) | Criterion::Platforms(_))
    }

    /// `None` when `field` is not a field of `R`: the criterion is skipped.
    fn accepts<R: Record>(&self, field: &str, record: &R) -> Option<bool> {
        let pass = match self {
            Criterion::All => true,
            Criterion::Platform(name) => record.on_platform(name),
            Criterion::Platforms(names) => {
                names.is_empty() || names.iter().any(|n| record.on_platform(n))
            }
            Criterion::Exact(want) => want.matches(&record.field(field)?),
            Criterion::AnyOf(allowed) => {
                let value = record.field(field)?;
                allowed.is_empty() || allowed.iter().any(|a| a.matches(&value))
            }
            Criterion::Range { min, max } => {
                let value = record.field(field)?.as_f64().unwrap_or(0.0);
                *min <= value && value <= *max
            }
        };
        Some(pass)
    }
}

// ---------------------------------------------------------------------------
// FilterCriteria: all active rules of a screen
// ---------------------------------------------------------------------------

/// Per-field criteria plus an optional title search.
/// Fields absent from the map, or set to [`Criterion::All`], are unconstrained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    fields: BTreeMap<String, Criterion>,
    search: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FilterCriteria::set`].
    pub fn with(mut self, field: impl Into<String>, criterion: Criterion) -> Self {
        self.set(field, criterion);
        self
    }

    /// Builder form of [`FilterCriteria::set_search`].
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.set_search(term);
        self
    }

    /// Replace the criterion of `field`. Returns whether anything changed.
    pub fn set(&mut self, field: impl Into<String>, criterion: Criterion) -> bool {
        let field = field.into();
        if self.get(&field) == &criterion {
            return false;
        }
        if criterion == Criterion::All {
            self.fields.remove(&field);
        } else {
            self.fields.insert(field, criterion);
        }
        true
    }

    /// Case-insensitive substring search on the title. An empty term clears it.
    /// Returns whether anything changed.
    pub fn set_search(&mut self, term: impl Into<String>) -> bool {
        let term = term.into();
        let next = if term.is_empty() { None } else { Some(term) };
        if next == self.search {
            return false;
        }
        self.search = next;
        true
    }

    pub fn get(&self, field: &str) -> &Criterion {
        const ALL: &Criterion = &Criterion::All;
        self.fields.get(field).unwrap_or(ALL)
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Remove every criterion and the search term.
    pub fn clear(&mut self) -> bool {
        let changed = self.search.is_some() || !self.fields.is_empty();
        self.fields.clear();
        self.search = None;
        changed
    }

    /// Whether any criterion or the search term can remove records.
    pub fn is_active(&self) -> bool {
        self.search.is_some() || self.fields.values().any(Criterion::is_active)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Criterion)> {
        self.fields.iter().map(|(f, c)| (f.as_str(), c))
    }

    /// Keyed fields that `R` does not have. Criteria on them are ignored by
    /// [`filter`].
    pub fn unknown_fields<R: Record>(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|(field, c)| c.reads_field() && !R::FIELDS.iter().any(|f| *f == field.as_str()))
            .map(|(field, _)| field.clone())
            .collect()
    }

    /// Strict variant of [`FilterCriteria::unknown_fields`].
    pub fn check_fields<R: Record>(&self) -> Result<(), EngineError> {
        let fields = self.unknown_fields::<R>();
        if fields.is_empty() {
            Ok(())
        } else {
            Err(EngineError::UnknownFields {
                record: std::any::type_name::<R>(),
                fields,
            })
        }
    }

    /// Whether `record` passes every criterion and the search term.
    pub fn accepts<R: Record>(&self, record: &R) -> bool {
        if let Some(term) = &self.search {
            if !record.title().to_lowercase().contains(&term.to_lowercase()) {
                return false;
            }
        }
        self.fields
            .iter()
            .all(|(field, c)| c.accepts(field, record).unwrap_or(true))
    }
}

/// Return the records that pass all active criteria, in input order.
///
/// A record passes a field criterion when:
/// * The criterion is `All`, or an empty multi-select → passes
/// * The field is unknown to the record type → passes (criterion ignored)
/// * The record's value for that field is null → fails exact and multi-select,
///   counts as 0 for ranges
pub fn filter<R: Record>(records: &[R], criteria: &FilterCriteria) -> Vec<R> {
    let unknown = criteria.unknown_fields::<R>();
    if !unknown.is_empty() {
        log::warn!("Ignoring filter criteria on unknown field(s) {unknown:?}");
    }
    let kept: Vec<R> = records
        .iter()
        .filter(|r| criteria.accepts(*r))
        .cloned()
        .collect();
    log::debug!("filter kept {} of {} records", kept.len(), records.len());
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ContentRecord;

    fn movie(id: &str, title: &str, year: Option<i64>, rating: Option<f64>) -> ContentRecord {
        let mut r = ContentRecord::new(id, title);
        r.year = year;
        r.rating = rating;
        r
    }

    fn ids(records: &[ContentRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    fn catalog() -> Vec<ContentRecord> {
        let mut a = movie("a", "Dune", Some(2025), Some(8.5));
        a.industry = Some("Hollywood".into());
        a.platforms.insert("Netflix".into(), true);
        a.platforms.insert("Disney+".into(), true);
        let mut b = movie("b", "Pushpa", Some(2026), None);
        b.industry = Some("Tollywood".into());
        b.platforms.insert("Prime Video".into(), true);
        let mut c = movie("c", "Elio", Some(2025), Some(6.0));
        c.industry = Some("Hollywood".into());
        c.platforms.insert("Disney+".into(), true);
        let d = movie("d", "Untitled", None, Some(9.1));
        vec![a, b, c, d]
    }

    #[test]
    fn empty_criteria_keep_everything_in_order() {
        let out = filter(&catalog(), &FilterCriteria::new());
        assert_eq!(ids(&out), ["a", "b", "c", "d"]);
    }

    #[test]
    fn exact_match_on_stringified_year() {
        let criteria = FilterCriteria::new().with("release_year", Criterion::Exact("2025".into()));
        assert_eq!(ids(&filter(&catalog(), &criteria)), ["a", "c"]);
    }

    #[test]
    fn null_field_is_excluded_once_filter_is_active() {
        let criteria = FilterCriteria::new().with("year", Criterion::Exact(FieldValue::Integer(2025)));
        let out = filter(&catalog(), &criteria);
        assert!(out.iter().all(|r| r.id != "d"));
    }

    #[test]
    fn multi_select_is_or_within_and_across_fields() {
        let criteria = FilterCriteria::new()
            .with("industry", Criterion::any_of(["Hollywood", "Tollywood"]))
            .with("year", Criterion::Exact(FieldValue::Integer(2025)));
        assert_eq!(ids(&filter(&catalog(), &criteria)), ["a", "c"]);
    }

    #[test]
    fn empty_multi_select_is_unset() {
        let criteria = FilterCriteria::new().with("industry", Criterion::AnyOf(BTreeSet::new()));
        assert!(!criteria.is_active());
        assert_eq!(filter(&catalog(), &criteria).len(), 4);
    }

    #[test]
    fn range_coerces_missing_to_zero() {
        let criteria = FilterCriteria::new().with("rating", Criterion::Range { min: 0.0, max: 10.0 });
        assert_eq!(filter(&catalog(), &criteria).len(), 4);

        let criteria = FilterCriteria::new().with("rating", Criterion::Range { min: 6.0, max: 9.0 });
        assert_eq!(ids(&filter(&catalog(), &criteria)), ["a", "c"]);
    }

    #[test]
    fn platform_multi_select_keeps_record_on_any_listed_platform() {
        let criteria = FilterCriteria::new().with("platform", Criterion::platforms(["Netflix", "Hulu"]));
        assert_eq!(ids(&filter(&catalog(), &criteria)), ["a"]);
    }

    #[test]
    fn single_platform_checks_membership_flag() {
        let criteria = FilterCriteria::new().with("platform", Criterion::Platform("Disney+".into()));
        assert_eq!(ids(&filter(&catalog(), &criteria)), ["a", "c"]);
    }

    #[test]
    fn search_is_case_insensitive_substring_on_title() {
        let criteria = FilterCriteria::new().with_search("LI");
        assert_eq!(ids(&filter(&catalog(), &criteria)), ["c"]);
    }

    #[test]
    fn unknown_field_is_a_no_op_but_reported() {
        let criteria = FilterCriteria::new().with("mood", Criterion::Exact("grim".into()));
        assert_eq!(filter(&catalog(), &criteria).len(), 4);
        assert_eq!(criteria.unknown_fields::<ContentRecord>(), ["mood"]);
        assert!(criteria.check_fields::<ContentRecord>().is_err());
    }

    #[test]
    fn set_reports_changes() {
        let mut criteria = FilterCriteria::new();
        assert!(criteria.set("industry", Criterion::Exact("Hollywood".into())));
        assert!(!criteria.set("industry", Criterion::Exact("Hollywood".into())));
        assert!(criteria.set("industry", Criterion::All));
        assert!(!criteria.set("industry", Criterion::All));
        assert!(criteria.set_search("dune"));
        assert!(!criteria.set_search("dune"));
        assert!(criteria.set_search(""));
    }
}
