use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde_json::{json, Value};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

const TITLES: &[&str] = &[
    "Dune", "Elio", "Avatar Fire and Ash", "Toy Story", "Pushpa", "Kalki", "War",
    "Mission Impossible", "Zootopia", "Devara", "The Batman", "Sikandar", "Kantara",
    "Superman", "Wicked For Good", "Jawan", "Housefull", "Moana", "Coolie", "Frankenstein",
];
const INDUSTRIES: &[&str] = &["Hollywood", "Bollywood", "Tollywood"];
const CATEGORIES: &[&str] = &["Action", "Drama", "Sci-Fi", "Thriller", "Family", "Fantasy", "Romance"];
const PLATFORMS: &[&str] = &["Theatrical", "Netflix", "Prime Video", "Disney+", "Hulu"];
const LIBRARY_PLATFORMS: &[&str] = &["Netflix", "Prime Video", "Disney+", "Hulu"];
const TYPES: &[&str] = &["Movie", "Series", "TV Show"];
const TIERS: &[&str] = &["Free", "Basic", "Standard", "Premium"];
const STATUSES: &[&str] = &["Active", "Active", "Active", "Inactive", "Banned"];

/// Trending-style movie rows. Every title appears once, some also with a
/// `" 2"` suffix so the catalog contains near-duplicates.
fn movies(rng: &mut SimpleRng) -> Vec<Value> {
    let mut rows = Vec::new();
    for (i, base) in TITLES.iter().enumerate() {
        let copies = if rng.chance(0.4) { 2 } else { 1 };
        for copy in 0..copies {
            let title = if copy == 0 { base.to_string() } else { format!("{base} 2") };
            let upcoming = rng.chance(0.3);
            let year = if upcoming { 2026 } else { *rng.pick(&[2025, 2026]) };
            rows.push(json!({
                "movie_id": rows.len() + 1,
                "title": title,
                "release_year": year,
                "industry": rng.pick(INDUSTRIES),
                "category": rng.pick(CATEGORIES),
                "platform": rng.pick(PLATFORMS),
                "imdb_rating": (!upcoming).then(|| (rng.range(4.0, 9.5) * 10.0).round() / 10.0),
                "total_collection_crore": (!upcoming).then(|| (rng.range(20.0, 1200.0) * (1.0 + i as f64 / 40.0)).round()),
                "status": if upcoming { "upcoming" } else { "released" },
            }));
        }
    }
    rows
}

/// Library export in the flattened 0/1 platform-column layout.
fn library_batch(rng: &mut SimpleRng, n: usize) -> Result<RecordBatch> {
    let mut titles = Vec::with_capacity(n);
    let mut years = Vec::with_capacity(n);
    let mut imdb = Vec::with_capacity(n);
    let mut types = Vec::with_capacity(n);
    let mut flags: Vec<Vec<i64>> = vec![Vec::with_capacity(n); LIBRARY_PLATFORMS.len()];

    for i in 0..n {
        titles.push(format!("{} {}", rng.pick(TITLES), ["Returns", "Rising", "Origins", "Legacy"][i % 4]));
        years.push(if rng.chance(0.05) { None } else { Some(1990 + (rng.next_u64() % 36) as i64) });
        imdb.push(if rng.chance(0.1) { 0.0 } else { (rng.range(2.0, 9.8) * 10.0).round() / 10.0 });
        types.push(rng.pick(TYPES).to_string());
        for col in &mut flags {
            col.push(i64::from(rng.chance(0.35)));
        }
    }

    let mut fields = vec![
        Field::new("Title", DataType::Utf8, false),
        Field::new("Year", DataType::Int64, true),
        Field::new("IMDb", DataType::Float64, false),
        Field::new("Type", DataType::Utf8, false),
    ];
    fields.extend(LIBRARY_PLATFORMS.iter().map(|p| Field::new(*p, DataType::Int64, false)));
    let schema = Arc::new(Schema::new(fields));

    let mut columns: Vec<Arc<dyn arrow::array::Array>> = vec![
        Arc::new(StringArray::from(titles)),
        Arc::new(Int64Array::from(years)),
        Arc::new(Float64Array::from(imdb)),
        Arc::new(StringArray::from(types)),
    ];
    columns.extend(flags.into_iter().map(|c| Arc::new(Int64Array::from(c)) as _));

    RecordBatch::try_new(schema, columns).context("building library batch")
}

fn users(rng: &mut SimpleRng, n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| {
            let mut prefs: Vec<&str> = LIBRARY_PLATFORMS
                .iter()
                .copied()
                .filter(|_| rng.chance(0.4))
                .collect();
            prefs.push(*rng.pick(CATEGORIES));
            let mut row = json!({
                "_id": format!("u{i:03}"),
                "username": format!("viewer{i:03}"),
                "email": format!("viewer{i:03}@example.com"),
                "subscription_tier": rng.pick(TIERS),
                "preferences": prefs,
                "total_watch_time_mins": rng.next_u64() % 6000,
            });
            // Older accounts predate the status field.
            if !rng.chance(0.2) {
                row["account_status"] = json!(rng.pick(STATUSES));
            }
            row
        })
        .collect()
}

fn write_json(path: &str, rows: &[Value]) -> Result<()> {
    let text = serde_json::to_string_pretty(rows).context("serializing rows")?;
    std::fs::write(path, text).with_context(|| format!("writing {path}"))?;
    println!("Wrote {} rows to {path}", rows.len());
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    write_json("sample_movies.json", &movies(&mut rng))?;
    write_json("sample_users.json", &users(&mut rng, 57))?;

    let batch = library_batch(&mut rng, 240)?;
    let output_path = "sample_library.parquet";
    let file = std::fs::File::create(output_path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;

    println!("Wrote {} library titles to {output_path}", batch.num_rows());
    Ok(())
}
