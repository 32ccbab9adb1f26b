//! Chart-ready reductions over a filtered collection.
//!
//! Every function here is total: empty input yields empty series or zero
//! counts, and null values are skipped instead of failing.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::error::EngineError;

use super::model::{FieldValue, Record};

/// Label used for records without a value in group-by charts.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Standard rating histogram edges: `[0,4) [4,6) [6,7) [7,8) [8,9) [9,10]`.
pub const RATING_EDGES: [f64; 7] = [0.0, 4.0, 6.0, 7.0, 8.0, 9.0, 10.0];

/// Longest top-N label kept intact; longer ones are cut and get `...`.
pub const TOP_LABEL_BUDGET: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSum {
    pub label: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopEntry<R> {
    pub label: String,
    pub value: f64,
    pub record: R,
}

/// Chart label of a group key. Floats print at full precision so distinct
/// keys never share a label.
fn group_label(value: &FieldValue) -> String {
    match value {
        FieldValue::Null => UNKNOWN_LABEL.to_string(),
        FieldValue::Float(v) => format!("{v}"),
        other => other.to_string(),
    }
}

fn numeric<R: Record>(record: &R, field: &str) -> Option<f64> {
    record.field(field)?.as_f64().filter(|v| !v.is_nan())
}

// ---------------------------------------------------------------------------
// Group-by
// ---------------------------------------------------------------------------

/// One entry per distinct value of `field`, in order of first appearance.
/// Nulls are grouped under [`UNKNOWN_LABEL`]; an unknown field yields nothing.
pub fn group_count<R: Record>(records: &[R], field: &str) -> Vec<GroupCount> {
    let mut out: Vec<GroupCount> = Vec::new();
    let mut slot: HashMap<FieldValue, usize> = HashMap::new();
    for rec in records {
        let Some(value) = rec.field(field) else {
            continue;
        };
        match slot.get(&value) {
            Some(&i) => out[i].count += 1,
            None => {
                out.push(GroupCount { label: group_label(&value), count: 1 });
                slot.insert(value, out.len() - 1);
            }
        }
    }
    out
}

/// Sum of the non-null `value_field` per `group_field`, first-appearance order.
/// Records without a value do not create a group.
pub fn group_sum<R: Record>(records: &[R], group_field: &str, value_field: &str) -> Vec<GroupSum> {
    let mut out: Vec<GroupSum> = Vec::new();
    let mut slot: HashMap<FieldValue, usize> = HashMap::new();
    for rec in records {
        let (Some(group), Some(value)) = (rec.field(group_field), numeric(rec, value_field)) else {
            continue;
        };
        match slot.get(&group) {
            Some(&i) => out[i].total += value,
            None => {
                out.push(GroupSum { label: group_label(&group), total: value });
                slot.insert(group, out.len() - 1);
            }
        }
    }
    out
}

/// Records per platform, one entry per requested platform in the given order.
/// Membership is not exclusive, so the counts can add up to more than
/// `records.len()`.
pub fn platform_counts<R: Record>(records: &[R], platforms: &[&str]) -> Vec<GroupCount> {
    platforms
        .iter()
        .map(|p| GroupCount {
            label: (*p).to_string(),
            count: records.iter().filter(|r| r.on_platform(p)).count(),
        })
        .collect()
}

/// Count per year. With `years`, exactly those years in that order; otherwise
/// every observed year ascending, then [`UNKNOWN_LABEL`] if any year is missing.
pub fn year_trend<R: Record>(records: &[R], field: &str, years: Option<&[i64]>) -> Vec<GroupCount> {
    match years {
        Some(years) => years
            .iter()
            .map(|y| GroupCount {
                label: y.to_string(),
                count: records
                    .iter()
                    .filter(|r| r.field(field).is_some_and(|v| v.matches(&FieldValue::Integer(*y))))
                    .count(),
            })
            .collect(),
        None => {
            let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
            let mut unknown = 0;
            for rec in records {
                match numeric(rec, field) {
                    Some(y) => *counts.entry(y as i64).or_default() += 1,
                    None if rec.field(field).is_some() => unknown += 1,
                    None => {}
                }
            }
            let mut out: Vec<GroupCount> = counts
                .into_iter()
                .map(|(y, count)| GroupCount {
                    label: y.to_string(),
                    count,
                })
                .collect();
            if unknown > 0 {
                out.push(GroupCount {
                    label: UNKNOWN_LABEL.to_string(),
                    count: unknown,
                });
            }
            out
        }
    }
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Fixed-edge histogram. Bucket `i` holds `edges[i] <= v < edges[i + 1]`,
/// except the last bucket, which also holds `v == edges[last]`.
/// Values below the first edge or above the last are dropped, not
/// collected into an overflow bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    edges: Vec<f64>,
}

fn fmt_edge(e: f64) -> String {
    if e.fract() == 0.0 {
        format!("{e:.0}")
    } else {
        format!("{e}")
    }
}

impl Histogram {
    pub fn new(edges: Vec<f64>) -> Result<Self, EngineError> {
        let increasing = edges.windows(2).all(|w| w[0] < w[1]);
        if edges.len() < 2 || !increasing || edges.iter().any(|e| !e.is_finite()) {
            return Err(EngineError::InvalidEdges(edges));
        }
        Ok(Histogram { edges })
    }

    /// The standard rating histogram ([`RATING_EDGES`]).
    pub fn ratings() -> Self {
        Histogram {
            edges: RATING_EDGES.to_vec(),
        }
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Bucket labels such as `"0-4"` and `"9-10"`.
    pub fn labels(&self) -> Vec<String> {
        self.edges
            .windows(2)
            .map(|w| format!("{}-{}", fmt_edge(w[0]), fmt_edge(w[1])))
            .collect()
    }

    /// Index of the bucket holding `value`, if any.
    pub fn bucket_of(&self, value: f64) -> Option<usize> {
        let last = self.edges.len() - 1;
        let above = self.edges.partition_point(|e| *e <= value);
        match above {
            0 => None,
            n if n <= last => Some(n - 1),
            _ if value == self.edges[last] => Some(last - 1),
            _ => None,
        }
    }

    pub fn bucket_values(&self, values: impl IntoIterator<Item = f64>) -> Vec<BucketCount> {
        let mut counts = vec![0usize; self.edges.len() - 1];
        for v in values {
            if let Some(i) = self.bucket_of(v) {
                counts[i] += 1;
            }
        }
        self.labels()
            .into_iter()
            .zip(counts)
            .map(|(label, count)| BucketCount { label, count })
            .collect()
    }

    /// Histogram of `field`; null and non-numeric values are dropped.
    pub fn bucket<R: Record>(&self, records: &[R], field: &str) -> Vec<BucketCount> {
        self.bucket_values(records.iter().filter_map(|r| numeric(r, field)))
    }
}

/// One-shot histogram. Invalid edges are logged and yield no buckets.
pub fn bucket<R: Record>(records: &[R], field: &str, edges: &[f64]) -> Vec<BucketCount> {
    match Histogram::new(edges.to_vec()) {
        Ok(h) => h.bucket(records, field),
        Err(e) => {
            log::warn!("{e}");
            Vec::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Top-N
// ---------------------------------------------------------------------------

/// Cut `label` to `budget` characters, ending in `...` when it was longer.
pub fn truncate_label(label: &str, budget: usize) -> String {
    if label.chars().count() <= budget {
        return label.to_string();
    }
    let keep = budget.saturating_sub(3);
    let mut out: String = label.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// The `n` records with the highest `field`, nulls excluded. Ties keep input
/// order. Each entry carries the title cut to `label_budget`.
pub fn top_n<R: Record>(records: &[R], field: &str, n: usize, label_budget: usize) -> Vec<TopEntry<R>> {
    let mut scored: Vec<(f64, &R)> = records
        .iter()
        .filter_map(|r| numeric(r, field).map(|v| (v, r)))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored
        .into_iter()
        .take(n)
        .map(|(value, rec)| TopEntry {
            label: truncate_label(rec.title(), label_budget),
            value,
            record: rec.clone(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Scalar KPIs
// ---------------------------------------------------------------------------

pub fn count_where<R>(records: &[R], pred: impl Fn(&R) -> bool) -> usize {
    records.iter().filter(|r| pred(r)).count()
}

/// Non-null numeric values of `field`, in input order.
pub fn values<'a, R: Record>(records: &'a [R], field: &'a str) -> impl Iterator<Item = f64> + 'a {
    records.iter().filter_map(move |r| numeric(r, field))
}

/// Summary of a numeric field over the non-null values.
/// `mean`, `min` and `max` are `None` when there are no values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NumericSummary {
    pub count: usize,
    pub sum: f64,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericSummary {
    pub fn of(values: impl IntoIterator<Item = f64>) -> Self {
        let mut s = NumericSummary::default();
        for v in values {
            s.count += 1;
            s.sum += v;
            s.min = Some(s.min.map_or(v, |m| m.min(v)));
            s.max = Some(s.max.map_or(v, |m| m.max(v)));
        }
        if s.count > 0 {
            s.mean = Some(s.sum / s.count as f64);
        }
        s
    }
}

pub fn summarize<R: Record>(records: &[R], field: &str) -> NumericSummary {
    NumericSummary::of(values(records, field))
}

pub fn sum<R: Record>(records: &[R], field: &str) -> f64 {
    values(records, field).sum()
}

/// Mean of the non-null values; `None` for an empty set.
pub fn mean<R: Record>(records: &[R], field: &str) -> Option<f64> {
    summarize(records, field).mean
}

pub fn max<R: Record>(records: &[R], field: &str) -> Option<f64> {
    summarize(records, field).max
}

pub fn min<R: Record>(records: &[R], field: &str) -> Option<f64> {
    summarize(records, field).min
}

/// KPI display: one decimal, or `N/A` when there is no value.
pub fn fmt_kpi(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.1}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ContentRecord;

    fn rated(id: &str, rating: Option<f64>) -> ContentRecord {
        let mut r = ContentRecord::new(id, id);
        r.rating = rating;
        r
    }

    fn counts(buckets: &[BucketCount]) -> Vec<(&str, usize)> {
        buckets.iter().map(|b| (b.label.as_str(), b.count)).collect()
    }

    #[test]
    fn rating_histogram_drops_null_and_respects_edges() {
        let records: Vec<_> = [Some(3.9), Some(4.0), Some(6.0), Some(9.9), None]
            .into_iter()
            .enumerate()
            .map(|(i, r)| rated(&i.to_string(), r))
            .collect();
        let out = bucket(&records, "rating", &RATING_EDGES);
        assert_eq!(
            counts(&out),
            [("0-4", 1), ("4-6", 1), ("6-7", 1), ("7-8", 0), ("8-9", 0), ("9-10", 1)]
        );
        assert_eq!(out.iter().map(|b| b.count).sum::<usize>(), 4);
    }

    #[test]
    fn last_bucket_is_closed_and_outliers_are_dropped() {
        let h = Histogram::ratings();
        assert_eq!(h.bucket_of(10.0), Some(5));
        assert_eq!(h.bucket_of(9.0), Some(5));
        assert_eq!(h.bucket_of(0.0), Some(0));
        assert_eq!(h.bucket_of(8.999), Some(4));
        assert_eq!(h.bucket_of(10.01), None);
        assert_eq!(h.bucket_of(-0.5), None);
        assert_eq!(h.bucket_of(f64::NAN), None);
    }

    #[test]
    fn invalid_edges_are_rejected() {
        assert!(Histogram::new(vec![1.0]).is_err());
        assert!(Histogram::new(vec![0.0, 4.0, 4.0]).is_err());
        assert!(Histogram::new(vec![0.0, f64::INFINITY]).is_err());
        assert!(bucket(&[rated("a", Some(1.0))], "rating", &[5.0, 1.0]).is_empty());
    }

    #[test]
    fn fractional_edges_label_without_trailing_zero() {
        let h = Histogram::new(vec![0.0, 2.5, 5.0]).unwrap();
        assert_eq!(h.labels(), ["0-2.5", "2.5-5"]);
    }

    #[test]
    fn empty_input_gives_zero_buckets() {
        let out = Histogram::ratings().bucket::<ContentRecord>(&[], "rating");
        assert_eq!(out.len(), 6);
        assert!(out.iter().all(|b| b.count == 0));
    }

    #[test]
    fn group_count_keeps_first_appearance_order() {
        let mut records = Vec::new();
        for (id, industry) in [("a", Some("Tollywood")), ("b", Some("Hollywood")), ("c", None), ("d", Some("Tollywood"))] {
            let mut r = ContentRecord::new(id, id);
            r.industry = industry.map(String::from);
            records.push(r);
        }
        let out = group_count(&records, "industry");
        let got: Vec<_> = out.iter().map(|g| (g.label.as_str(), g.count)).collect();
        assert_eq!(got, [("Tollywood", 2), ("Hollywood", 1), ("Unknown", 1)]);
        assert!(group_count(&records, "mood").is_empty());
    }

    #[test]
    fn group_count_keeps_close_floats_apart() {
        let records: Vec<ContentRecord> = [8.46, 8.5, 8.54, 8.5]
            .into_iter()
            .enumerate()
            .map(|(i, rating)| {
                let mut r = ContentRecord::new(i.to_string(), "t");
                r.rating = Some(rating);
                r
            })
            .collect();
        let out = group_count(&records, "rating");
        let got: Vec<_> = out.iter().map(|g| (g.label.as_str(), g.count)).collect();
        assert_eq!(got, [("8.46", 1), ("8.5", 2), ("8.54", 1)]);
    }

    #[test]
    fn group_sum_skips_null_values() {
        let mut records = Vec::new();
        for (id, industry, coll) in [("a", "Bollywood", Some(10.0)), ("b", "Hollywood", None), ("c", "Bollywood", Some(5.5))] {
            let mut r = ContentRecord::new(id, id);
            r.industry = Some(industry.into());
            r.collection = coll;
            records.push(r);
        }
        assert_eq!(
            group_sum(&records, "industry", "collection"),
            [GroupSum { label: "Bollywood".into(), total: 15.5 }]
        );
    }

    #[test]
    fn platform_counts_are_not_exclusive() {
        let mut r = ContentRecord::new("a", "A");
        r.platforms.insert("Netflix".into(), true);
        r.platforms.insert("Disney+".into(), true);
        let out = platform_counts(&[r], &["Netflix", "Hulu", "Disney+"]);
        let got: Vec<_> = out.iter().map(|g| g.count).collect();
        assert_eq!(got, [1, 0, 1]);
    }

    #[test]
    fn year_trend_fixed_and_observed() {
        let mut records = Vec::new();
        for (id, year) in [("a", Some(2026)), ("b", Some(2025)), ("c", None), ("d", Some(2026))] {
            let mut r = ContentRecord::new(id, id);
            r.year = year;
            records.push(r);
        }
        let fixed = year_trend(&records, "year", Some(&[2025, 2026, 2027]));
        let got: Vec<_> = fixed.iter().map(|g| (g.label.as_str(), g.count)).collect();
        assert_eq!(got, [("2025", 1), ("2026", 2), ("2027", 0)]);

        let observed = year_trend(&records, "year", None);
        let got: Vec<_> = observed.iter().map(|g| (g.label.as_str(), g.count)).collect();
        assert_eq!(got, [("2025", 1), ("2026", 2), ("Unknown", 1)]);
    }

    #[test]
    fn top_n_excludes_nulls_and_truncates_labels() {
        let mut records = Vec::new();
        for (title, coll) in [("Short", Some(5.0)), ("A Very Long Movie Title", Some(50.0)), ("Nothing", None), ("Mid", Some(20.0))] {
            let mut r = ContentRecord::new(title, title);
            r.collection = coll;
            records.push(r);
        }
        let top = top_n(&records, "collection", 2, TOP_LABEL_BUDGET);
        let got: Vec<_> = top.iter().map(|t| (t.label.as_str(), t.value)).collect();
        assert_eq!(got, [("A Very Long ...", 50.0), ("Mid", 20.0)]);
    }

    #[test]
    fn truncate_label_counts_characters() {
        assert_eq!(truncate_label("exactly fifteen", 15), "exactly fifteen");
        assert_eq!(truncate_label("sixteen chars!!!", 15), "sixteen char...");
        assert_eq!(truncate_label("Amélie Poulain Story", 15), "Amélie Poula...");
    }

    #[test]
    fn kpis_over_empty_set_are_sentinels() {
        let empty: [ContentRecord; 0] = [];
        assert_eq!(mean(&empty, "rating"), None);
        assert_eq!(max(&empty, "rating"), None);
        assert_eq!(min(&empty, "rating"), None);
        assert_eq!(sum(&empty, "rating"), 0.0);
        assert_eq!(fmt_kpi(None), "N/A");
    }

    #[test]
    fn mean_excludes_nulls() {
        let records = vec![rated("a", Some(8.0)), rated("b", None), rated("c", Some(6.0))];
        assert_eq!(mean(&records, "rating"), Some(7.0));
        assert_eq!(count_where(&records, |r| r.rating.is_some()), 2);
        let s = summarize(&records, "rating");
        assert_eq!((s.count, s.min, s.max), (2, Some(6.0), Some(8.0)));
    }
}
