use std::cmp::Ordering;

use serde::Serialize;

use super::model::{FieldValue, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ascending,
    #[default]
    Descending,
}

impl Direction {
    pub fn flip(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }

    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Direction::Ascending => "↑",
            Direction::Descending => "↓",
        }
    }
}

/// What a null numeric key sorts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Missing {
    /// Same as a real zero.
    #[default]
    Zero,
    /// `-1`: below every real score, so unknown values rank last descending.
    BelowAll,
}

impl Missing {
    fn sentinel(self) -> f64 {
        match self {
            Missing::Zero => 0.0,
            Missing::BelowAll => -1.0,
        }
    }
}

/// Secondary ordering applied when primary keys are equal.
/// It keeps its own direction when the primary direction flips.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TieBreak {
    pub key: String,
    pub direction: Direction,
    pub missing: Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortSpec {
    pub key: String,
    pub direction: Direction,
    pub missing: Missing,
    pub tie_break: Option<TieBreak>,
}

impl SortSpec {
    pub fn new(key: impl Into<String>, direction: Direction) -> Self {
        SortSpec {
            key: key.into(),
            direction,
            missing: Missing::Zero,
            tie_break: None,
        }
    }

    pub fn ascending(key: impl Into<String>) -> Self {
        Self::new(key, Direction::Ascending)
    }

    pub fn descending(key: impl Into<String>) -> Self {
        Self::new(key, Direction::Descending)
    }

    pub fn missing(mut self, missing: Missing) -> Self {
        self.missing = missing;
        self
    }

    pub fn then(mut self, key: impl Into<String>, direction: Direction, missing: Missing) -> Self {
        self.tie_break = Some(TieBreak {
            key: key.into(),
            direction,
            missing,
        });
        self
    }

    /// Column-header behaviour: a new key starts descending, the same key
    /// toggles direction. The tie-break is kept.
    pub fn request(&mut self, key: &str) {
        if self.key == key {
            self.direction = self.direction.flip();
        } else {
            self.key = key.to_string();
            self.direction = Direction::Descending;
        }
    }

    /// Compare two records under this spec.
    pub fn compare<R: Record>(&self, a: &R, b: &R) -> Ordering {
        let primary = self
            .direction
            .apply(compare_key(a, b, &self.key, self.missing));
        match (&self.tie_break, primary) {
            (Some(tb), Ordering::Equal) => tb.direction.apply(compare_key(a, b, &tb.key, tb.missing)),
            _ => primary,
        }
    }
}

/// Null-substituted sort key. Nulls become the numeric sentinel unless the
/// other side is a string, in which case they become `""`.
fn sort_value(value: Option<FieldValue>, other_is_text: bool, missing: Missing) -> FieldValue {
    match value {
        Some(FieldValue::Null) | None if other_is_text => FieldValue::String(String::new()),
        Some(FieldValue::Null) | None => FieldValue::Float(missing.sentinel()),
        Some(v) => v,
    }
}

fn compare_key<R: Record>(a: &R, b: &R, key: &str, missing: Missing) -> Ordering {
    let (va, vb) = (a.field(key), b.field(key));
    if va.is_none() && vb.is_none() {
        // Unknown key: leave input order alone.
        return Ordering::Equal;
    }
    let a_text = matches!(va, Some(FieldValue::String(_)));
    let b_text = matches!(vb, Some(FieldValue::String(_)));
    let va = sort_value(va, b_text, missing);
    let vb = sort_value(vb, a_text, missing);
    match (&va, &vb) {
        (FieldValue::String(x), FieldValue::String(y)) => x.cmp(y),
        _ => match (va.as_f64(), vb.as_f64()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => va.cmp(&vb),
        },
    }
}

/// Stable sort; records with equal keys keep their relative input order.
pub fn sort<R: Record>(records: &[R], spec: &SortSpec) -> Vec<R> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| spec.compare(a, b));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ContentRecord;

    fn movie(id: &str, rating: Option<f64>, collection: Option<f64>) -> ContentRecord {
        let mut r = ContentRecord::new(id, id.to_uppercase());
        r.rating = rating;
        r.collection = collection;
        r
    }

    fn ids(records: &[ContentRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn rating_then_collection_descending() {
        let spec = SortSpec::descending("rating").then("collection", Direction::Descending, Missing::Zero);
        let records = vec![
            movie("a", Some(7.0), Some(10.0)),
            movie("b", Some(8.0), None),
            movie("c", Some(7.0), Some(50.0)),
            movie("d", None, Some(900.0)),
        ];
        assert_eq!(ids(&sort(&records, &spec)), ["b", "c", "a", "d"]);
    }

    #[test]
    fn direction_does_not_flip_tie_break() {
        let spec = SortSpec::ascending("rating").then("collection", Direction::Descending, Missing::Zero);
        let records = vec![
            movie("a", Some(7.0), Some(10.0)),
            movie("b", Some(7.0), Some(50.0)),
            movie("c", Some(6.0), None),
        ];
        assert_eq!(ids(&sort(&records, &spec)), ["c", "b", "a"]);
    }

    #[test]
    fn below_all_ranks_unrated_after_real_zero() {
        let records = vec![movie("none", None, None), movie("zero", Some(0.0), None)];
        let spec = SortSpec::descending("rating").missing(Missing::BelowAll);
        assert_eq!(ids(&sort(&records, &spec)), ["zero", "none"]);

        // With zero semantics they tie and keep input order.
        let spec = SortSpec::descending("rating");
        assert_eq!(ids(&sort(&records, &spec)), ["none", "zero"]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let records = vec![
            movie("a", Some(5.0), None),
            movie("b", Some(5.0), None),
            movie("c", Some(5.0), None),
        ];
        for spec in [SortSpec::ascending("rating"), SortSpec::descending("rating")] {
            assert_eq!(ids(&sort(&records, &spec)), ["a", "b", "c"]);
        }
    }

    #[test]
    fn strings_compare_raw_and_null_is_empty() {
        let mut a = ContentRecord::new("a", "b");
        a.industry = Some("bollywood".into());
        let mut b = ContentRecord::new("b", "B");
        b.industry = Some("Hollywood".into());
        let c = ContentRecord::new("c", "a");
        let spec = SortSpec::ascending("industry");
        assert_eq!(ids(&sort(&[a.clone(), b.clone(), c.clone()], &spec)), ["c", "b", "a"]);

        let spec = SortSpec::ascending("title");
        assert_eq!(ids(&sort(&[a, b, c], &spec)), ["b", "c", "a"]);
    }

    #[test]
    fn unknown_key_is_identity() {
        let records = vec![movie("b", Some(1.0), None), movie("a", Some(9.0), None)];
        assert_eq!(ids(&sort(&records, &SortSpec::descending("mood"))), ["b", "a"]);
    }

    #[test]
    fn request_toggles_same_key_and_resets_new_key() {
        let mut spec = SortSpec::descending("rating");
        spec.request("rating");
        assert_eq!(spec.direction, Direction::Ascending);
        spec.request("title");
        assert_eq!((spec.key.as_str(), spec.direction), ("title", Direction::Descending));
    }
}
