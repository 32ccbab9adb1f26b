use proptest::prelude::*;

use catalog_lens::data::aggregate::{Histogram, RATING_EDGES};
use catalog_lens::data::dedupe::{dedupe, dedupe_key};
use catalog_lens::data::filter::{filter, Criterion, FilterCriteria};
use catalog_lens::data::model::{ContentRecord, FieldValue};
use catalog_lens::data::paginate::{paginate, total_pages, PageSize};
use catalog_lens::data::sort::{sort, SortSpec};

fn arb_record() -> impl Strategy<Value = ContentRecord> {
    (
        0u32..10_000,
        prop::sample::select(vec!["Dune", "Dune 2", "Elio", "Elio 3", "Kalki", "War 2", "Heat"]),
        prop::option::of(2020i64..2028),
        prop::option::of(0.0f64..=10.0),
        prop::option::of(prop::sample::select(vec!["Hollywood", "Bollywood", "Tollywood"])),
    )
        .prop_map(|(id, title, year, rating, industry)| {
            let mut r = ContentRecord::new(format!("c{id}"), title);
            r.year = year;
            r.rating = rating;
            r.industry = industry.map(String::from);
            r
        })
}

fn arb_records() -> impl Strategy<Value = Vec<ContentRecord>> {
    prop::collection::vec(arb_record(), 0..60)
}

fn arb_criteria() -> impl Strategy<Value = FilterCriteria> {
    (
        prop::option::of(2020i64..2028),
        prop::option::of((0.0f64..10.0, 0.0f64..10.0)),
        prop::option::of(prop::sample::select(vec!["du", "EL", "x"])),
    )
        .prop_map(|(year, range, search)| {
            let mut c = FilterCriteria::new();
            if let Some(y) = year {
                c.set("year", Criterion::Exact(FieldValue::Integer(y)));
            }
            if let Some((a, b)) = range {
                c.set("rating", Criterion::Range { min: a.min(b), max: a.max(b) });
            }
            if let Some(s) = search {
                c.set_search(s);
            }
            c
        })
}

fn ids(records: &[ContentRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

proptest! {
    #[test]
    fn filter_is_idempotent(records in arb_records(), criteria in arb_criteria()) {
        let once = filter(&records, &criteria);
        let twice = filter(&once, &criteria);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn filter_preserves_input_order(records in arb_records(), criteria in arb_criteria()) {
        let kept = filter(&records, &criteria);
        let mut cursor = records.iter();
        for rec in &kept {
            prop_assert!(cursor.any(|r| r == rec), "kept record out of order");
        }
    }

    #[test]
    fn sort_is_a_stable_permutation(records in arb_records()) {
        // Ids double as input positions.
        let records: Vec<ContentRecord> = records
            .into_iter()
            .enumerate()
            .map(|(i, mut r)| {
                r.id = i.to_string();
                r
            })
            .collect();
        let pos = |r: &ContentRecord| r.id.parse::<usize>().unwrap();

        let sorted = sort(&records, &SortSpec::descending("rating"));
        prop_assert_eq!(sorted.len(), records.len());

        for pair in sorted.windows(2) {
            let (a, b) = (pair[0].rating.unwrap_or(0.0), pair[1].rating.unwrap_or(0.0));
            prop_assert!(a >= b);
            if a == b {
                prop_assert!(pos(&pair[0]) < pos(&pair[1]), "equal keys reordered");
            }
        }
    }

    #[test]
    fn histogram_covers_every_in_range_value(values in prop::collection::vec(0.0f64..=10.0, 0..80)) {
        let h = Histogram::new(RATING_EDGES.to_vec()).unwrap();
        let buckets = h.bucket_values(values.iter().copied());
        prop_assert_eq!(buckets.len(), RATING_EDGES.len() - 1);
        let total: usize = buckets.iter().map(|b| b.count).sum();
        prop_assert_eq!(total, values.len());
    }

    #[test]
    fn pages_partition_the_collection(len in 0usize..120, size in 1usize..30) {
        let rows: Vec<usize> = (0..len).collect();
        let size = PageSize::new(size).unwrap();
        let pages = total_pages(len, size);
        prop_assert!(pages >= 1);

        let mut seen = Vec::new();
        for p in 1..=pages {
            let page = paginate(&rows, p, size);
            prop_assert!(page.items.len() <= size.get());
            seen.extend_from_slice(page.items);
        }
        prop_assert_eq!(seen, rows.clone());
        prop_assert!(paginate(&rows, pages + 1, size).items.is_empty());
    }

    #[test]
    fn dedupe_never_grows_and_keys_are_unique(records in arb_records()) {
        let deduped = dedupe(&records);
        prop_assert!(deduped.len() <= records.len());

        let mut keys: Vec<&str> = deduped.iter().map(|r| dedupe_key(&r.title)).collect();
        let n = keys.len();
        keys.sort_unstable();
        keys.dedup();
        prop_assert_eq!(keys.len(), n);

        let again = dedupe(&deduped);
        prop_assert_eq!(ids(&again), ids(&deduped));
    }
}
