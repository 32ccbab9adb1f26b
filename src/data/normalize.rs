use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value as JsonValue};

use super::model::{
    parse_leading_f64, ContentRecord, Dataset, Records, Status, UserRecord, LIBRARY_PLATFORMS,
};

/// One source row as handed over by the loader.
pub type RawRow = Map<String, JsonValue>;

/// Which canonical record type a set of rows normalizes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Content,
    User,
}

impl Domain {
    /// Rows carrying account fields are users, everything else is content.
    /// One such row anywhere in the file is enough.
    pub fn detect(rows: &[RawRow]) -> Self {
        let is_account = |row: &RawRow| row.contains_key("username") || row.contains_key("email");
        if rows.iter().any(is_account) {
            Domain::User
        } else {
            Domain::Content
        }
    }

    pub fn of(dataset: &Dataset) -> Self {
        match dataset.records {
            Records::Content(_) => Domain::Content,
            Records::Users(_) => Domain::User,
        }
    }
}

// ---------------------------------------------------------------------------
// Field coercions
// ---------------------------------------------------------------------------

/// First non-null value among the aliases.
fn first<'a>(row: &'a RawRow, keys: &[&str]) -> Option<&'a JsonValue> {
    keys.iter()
        .filter_map(|k| row.get(*k))
        .find(|v| !v.is_null())
}

fn text(v: &JsonValue) -> Option<String> {
    let s = match v {
        JsonValue::String(s) => s.trim().to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

fn number(v: &JsonValue) -> Option<f64> {
    let n = match v {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => parse_leading_f64(s),
        _ => None,
    };
    // `-0.0` would otherwise render as its own option.
    n.filter(|f| f.is_finite()).map(|f| if f == 0.0 { 0.0 } else { f })
}

fn integer(v: &JsonValue) -> Option<i64> {
    match v {
        JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        other => number(other).map(|f| f.trunc() as i64),
    }
}

/// `true`, `1` and `"1"`/`"true"` mark membership; anything else does not.
fn flag(v: &JsonValue) -> bool {
    match v {
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64() == Some(1.0),
        JsonValue::String(s) => matches!(s.trim(), "1" | "true" | "True"),
        _ => false,
    }
}

fn text_list(v: &JsonValue) -> Vec<String> {
    match v {
        JsonValue::Array(items) => items.iter().filter_map(text).collect(),
        JsonValue::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

fn field_text(row: &RawRow, keys: &[&str]) -> Option<String> {
    first(row, keys).and_then(text)
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

/// Map one content row, in any of the known source shapes, to a
/// [`ContentRecord`]. Rows without an id get `"{id_prefix}-{index}"`.
pub fn normalize_content(row: &RawRow, index: usize, id_prefix: &str) -> ContentRecord {
    let id = field_text(row, &["id", "_id", "movie_id", "ID"])
        .unwrap_or_else(|| format!("{id_prefix}-{index}"));
    let title = field_text(row, &["title", "Title", "name"]).unwrap_or_default();
    let mut rec = ContentRecord::new(id, title);

    rec.year = first(row, &["year", "release_year", "Year"]).and_then(integer);
    rec.rating = first(row, &["rating", "imdb_rating", "IMDb"])
        .and_then(number)
        .filter(|r| (0.0..=10.0).contains(r));
    rec.category = field_text(row, &["category", "genre", "Genres"]);
    rec.industry = field_text(row, &["industry", "Industry"]);
    rec.content_type = field_text(row, &["type", "Type", "content_type"]).map(|t| t.to_lowercase());
    rec.status = field_text(row, &["status", "Status"]).and_then(|s| Status::parse(&s));
    rec.collection = first(row, &["collection", "total_collection_crore", "box_office"]).and_then(number);
    rec.age = field_text(row, &["age", "Age"]);
    rec.runtime = field_text(row, &["runtime", "Runtime"]);
    rec.language = field_text(row, &["language", "Language"]);
    rec.country = field_text(row, &["country", "Country"]);
    rec.platforms = platforms(row);
    rec
}

fn platforms(row: &RawRow) -> BTreeMap<String, bool> {
    let mut out = BTreeMap::new();
    for name in LIBRARY_PLATFORMS {
        if let Some(v) = row.get(name) {
            out.insert(name.to_string(), flag(v));
        }
    }
    for key in ["platform", "platforms"] {
        if let Some(v) = row.get(key) {
            for name in text_list(v) {
                out.insert(name, true);
            }
        }
    }
    out
}

pub fn normalize_content_rows(rows: &[RawRow], id_prefix: &str) -> Vec<ContentRecord> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| normalize_content(row, i, id_prefix))
        .collect()
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Map one account row to a [`UserRecord`]. A missing tier is `Free`, a
/// missing status is `Active`.
pub fn normalize_user(row: &RawRow, index: usize, id_prefix: &str) -> UserRecord {
    let id = field_text(row, &["id", "_id"]).unwrap_or_else(|| format!("{id_prefix}-{index}"));
    let username = field_text(row, &["username", "name"]).unwrap_or_default();
    let mut rec = UserRecord::new(id, username);

    rec.email = field_text(row, &["email"]);
    if let Some(tier) = field_text(row, &["subscription_tier", "tier"]) {
        rec.subscription_tier = tier;
    }
    if let Some(status) = field_text(row, &["account_status"]) {
        rec.account_status = status;
    }
    rec.preferences = first(row, &["preferences"]).map(text_list).unwrap_or_default();
    rec.watch_time_mins = first(row, &["total_watch_time_mins", "watch_time_mins"]).and_then(integer);

    let mut on: BTreeSet<String> = rec
        .preferences
        .iter()
        .filter(|p| LIBRARY_PLATFORMS.contains(&p.as_str()))
        .cloned()
        .collect();
    for key in ["platform", "platforms"] {
        if let Some(v) = row.get(key) {
            on.extend(text_list(v));
        }
    }
    rec.platforms = on;
    rec
}

pub fn normalize_user_rows(rows: &[RawRow], id_prefix: &str) -> Vec<UserRecord> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| normalize_user(row, i, id_prefix))
        .collect()
}

/// Detect the domain of `rows` and build the matching dataset.
pub fn normalize_rows(rows: &[RawRow], id_prefix: &str) -> Dataset {
    match Domain::detect(rows) {
        Domain::Content => Dataset::from_content(normalize_content_rows(rows, id_prefix)),
        Domain::User => Dataset::from_users(normalize_user_rows(rows, id_prefix)),
    }
}
