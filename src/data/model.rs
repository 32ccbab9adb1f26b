use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

/// Streaming platforms carried as 0/1 columns by the library dataset.
pub const LIBRARY_PLATFORMS: [&str; 4] = ["Netflix", "Prime Video", "Disney+", "Hulu"];

// ---------------------------------------------------------------------------
// FieldValue – a single cell of a record
// ---------------------------------------------------------------------------

/// A dynamically-typed field value as seen by the query engine.
/// Using `BTreeMap` / `BTreeSet` downstream so `FieldValue` must be `Ord`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put FieldValue in BTreeSet --
// Equality, ordering and hashing all read floats through `canonical`.

/// `-0.0` folds into `0.0`; every other bit pattern is kept.
fn canonical(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for FieldValue {}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use FieldValue::*;
        fn discriminant(v: &FieldValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => canonical(*a).total_cmp(&canonical(*b)),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for FieldValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            FieldValue::String(s) => s.hash(state),
            FieldValue::Integer(i) => i.hash(state),
            FieldValue::Float(f) => canonical(*f).to_bits().hash(state),
            FieldValue::Bool(b) => b.hash(state),
            FieldValue::Null => {}
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{s}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v:.1}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Null => write!(f, "—"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(FieldValue::Null, Into::into)
    }
}

impl FieldValue {
    /// Numeric view of the value. Strings are read up to their first
    /// non-numeric character, so `"8.8/10"` yields `8.8`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::String(s) => parse_leading_f64(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Exact-match equality used by single and multi-select criteria.
    ///
    /// Strings compare case-sensitively. A string compared with a number is
    /// parsed strictly first, so `"2025"` matches `2025` but `"2025a"` does
    /// not. `Null` never matches, not even another `Null`.
    pub fn matches(&self, other: &FieldValue) -> bool {
        use FieldValue::*;
        match (self, other) {
            (Null, _) | (_, Null) => false,
            (String(a), String(b)) => a == b,
            (Bool(a), Bool(b)) => a == b,
            (String(s), n @ (Integer(_) | Float(_))) | (n @ (Integer(_) | Float(_)), String(s)) => {
                match (s.trim().parse::<f64>().ok(), n.as_f64()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }
}

/// Parse the longest numeric prefix of `s` (sign, digits, one decimal point).
pub(crate) fn parse_leading_f64(s: &str) -> Option<f64> {
    let s = s.trim();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, c) in s.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    s[..end].trim_end_matches('.').parse::<f64>().ok()
}

// ---------------------------------------------------------------------------
// Record – the engine's view of one row
// ---------------------------------------------------------------------------

/// Uniform access to a normalized record, independent of its domain.
pub trait Record: Clone {
    /// Field names understood by [`Record::field`].
    const FIELDS: &'static [&'static str];

    /// Rendering key; never used as identity.
    fn id(&self) -> &str;

    /// Human-facing identity, used for search and deduplication.
    fn title(&self) -> &str;

    /// Look up a field by name. `None` means the name is not a field of this
    /// record type; a known field without a value is `Some(FieldValue::Null)`.
    fn field(&self, name: &str) -> Option<FieldValue>;

    /// Whether the record is available on `platform`.
    fn on_platform(&self, platform: &str) -> bool;
}

// ---------------------------------------------------------------------------
// ContentRecord – a movie or show
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Released,
    Upcoming,
}

impl Status {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "released" => Some(Status::Released),
            "upcoming" => Some(Status::Upcoming),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Released => "released",
            Status::Upcoming => "upcoming",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical content record, whichever source shape it was read from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentRecord {
    pub id: String,
    pub title: String,
    pub year: Option<i64>,
    /// Score in `[0, 10]`.
    pub rating: Option<f64>,
    pub category: Option<String>,
    pub industry: Option<String>,
    /// Lower-cased: `movie`, `series`, `tv show`, …
    pub content_type: Option<String>,
    /// Platform membership; a title can be on several platforms at once.
    pub platforms: BTreeMap<String, bool>,
    pub status: Option<Status>,
    /// Box-office total, only meaningful for released titles.
    pub collection: Option<f64>,
    pub age: Option<String>,
    pub runtime: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
}

impl ContentRecord {
    /// A record with only identity fields set.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        ContentRecord {
            id: id.into(),
            title: title.into(),
            year: None,
            rating: None,
            category: None,
            industry: None,
            content_type: None,
            platforms: BTreeMap::new(),
            status: None,
            collection: None,
            age: None,
            runtime: None,
            language: None,
            country: None,
        }
    }

    /// Names of the platforms this record is available on.
    pub fn platform_names(&self) -> impl Iterator<Item = &str> {
        self.platforms
            .iter()
            .filter(|(_, on)| **on)
            .map(|(name, _)| name.as_str())
    }

    pub fn is_released(&self) -> bool {
        self.status == Some(Status::Released)
    }
}

fn opt_string(s: &Option<String>) -> FieldValue {
    s.as_deref().map_or(FieldValue::Null, FieldValue::from)
}

fn joined_or_null<'a>(names: impl Iterator<Item = &'a str>) -> FieldValue {
    let joined = names.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        FieldValue::Null
    } else {
        FieldValue::String(joined)
    }
}

impl Record for ContentRecord {
    const FIELDS: &'static [&'static str] = &[
        "id",
        "title",
        "year",
        "release_year",
        "rating",
        "imdb_rating",
        "category",
        "genre",
        "industry",
        "type",
        "status",
        "collection",
        "total_collection_crore",
        "platform",
        "age",
        "runtime",
        "language",
        "country",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value: FieldValue = match name {
            "id" => FieldValue::from(self.id.as_str()),
            "title" => FieldValue::from(self.title.as_str()),
            "year" | "release_year" => self.year.into(),
            "rating" | "imdb_rating" => self.rating.into(),
            "category" | "genre" => opt_string(&self.category),
            "industry" => opt_string(&self.industry),
            "type" => opt_string(&self.content_type),
            "status" => self.status.map(|s| s.as_str()).into(),
            "collection" | "total_collection_crore" => self.collection.into(),
            "platform" => joined_or_null(self.platform_names()),
            "age" => opt_string(&self.age),
            "runtime" => opt_string(&self.runtime),
            "language" => opt_string(&self.language),
            "country" => opt_string(&self.country),
            _ => return None,
        };
        Some(value)
    }

    fn on_platform(&self, platform: &str) -> bool {
        self.platforms.get(platform).copied().unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// UserRecord – an account shown on the admin user screens
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub subscription_tier: String,
    pub account_status: String,
    pub preferences: Vec<String>,
    pub watch_time_mins: Option<i64>,
    /// Platforms named among the user's preferences.
    pub platforms: BTreeSet<String>,
}

impl UserRecord {
    pub const DEFAULT_TIER: &'static str = "Free";
    pub const DEFAULT_STATUS: &'static str = "Active";

    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        UserRecord {
            id: id.into(),
            username: username.into(),
            email: None,
            subscription_tier: Self::DEFAULT_TIER.to_string(),
            account_status: Self::DEFAULT_STATUS.to_string(),
            preferences: Vec::new(),
            watch_time_mins: None,
            platforms: BTreeSet::new(),
        }
    }

    /// Watch time rendered as `"{h}h {m}m"`.
    pub fn watch_time_label(&self) -> String {
        match self.watch_time_mins {
            Some(mins) => format!("{}h {}m", mins / 60, mins % 60),
            None => "—".to_string(),
        }
    }
}

impl Record for UserRecord {
    const FIELDS: &'static [&'static str] = &[
        "id",
        "username",
        "title",
        "email",
        "subscription_tier",
        "account_status",
        "preferences",
        "watch_time_mins",
        "platform",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.username
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value: FieldValue = match name {
            "id" => FieldValue::from(self.id.as_str()),
            "username" | "title" => FieldValue::from(self.username.as_str()),
            "email" => opt_string(&self.email),
            "subscription_tier" => FieldValue::from(self.subscription_tier.as_str()),
            "account_status" => FieldValue::from(self.account_status.as_str()),
            "preferences" => joined_or_null(self.preferences.iter().map(String::as_str)),
            "watch_time_mins" => self.watch_time_mins.into(),
            "platform" => joined_or_null(self.platforms.iter().map(String::as_str)),
            _ => return None,
        };
        Some(value)
    }

    fn on_platform(&self, platform: &str) -> bool {
        self.platforms.contains(platform)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded collection
// ---------------------------------------------------------------------------

/// Records of one domain.
#[derive(Debug, Clone)]
pub enum Records {
    Content(Vec<ContentRecord>),
    Users(Vec<UserRecord>),
}

/// The full normalized dataset with pre-computed filter options.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Records,
    /// For each field the sorted set of distinct non-null values.
    /// `platform` lists individual platform names, not joined strings.
    pub unique_values: BTreeMap<String, BTreeSet<FieldValue>>,
}

/// Identity-like fields never offered as filter options.
const UNINDEXED: [&str; 4] = ["id", "title", "username", "email"];

fn index_fields<R: Record>(records: &[R]) -> BTreeMap<String, BTreeSet<FieldValue>> {
    let mut unique_values: BTreeMap<String, BTreeSet<FieldValue>> = BTreeMap::new();
    for rec in records {
        for field in R::FIELDS {
            if UNINDEXED.contains(field) || *field == "platform" {
                continue;
            }
            if let Some(val) = rec.field(field).filter(|v| !v.is_null()) {
                unique_values
                    .entry((*field).to_string())
                    .or_default()
                    .insert(val);
            }
        }
    }
    unique_values
}

impl Dataset {
    pub fn from_content(records: Vec<ContentRecord>) -> Self {
        let mut unique_values = index_fields(&records);
        let platforms: BTreeSet<FieldValue> = records
            .iter()
            .flat_map(|r| r.platform_names())
            .map(FieldValue::from)
            .collect();
        if !platforms.is_empty() {
            unique_values.insert("platform".to_string(), platforms);
        }
        Dataset {
            records: Records::Content(records),
            unique_values,
        }
    }

    pub fn from_users(records: Vec<UserRecord>) -> Self {
        let unique_values = index_fields(&records);
        Dataset {
            records: Records::Users(records),
            unique_values,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        match &self.records {
            Records::Content(r) => r.len(),
            Records::Users(r) => r.len(),
        }
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn content(&self) -> Option<&[ContentRecord]> {
        match &self.records {
            Records::Content(r) => Some(r),
            Records::Users(_) => None,
        }
    }

    pub fn users(&self) -> Option<&[UserRecord]> {
        match &self.records {
            Records::Users(r) => Some(r),
            Records::Content(_) => None,
        }
    }

    /// Distinct values of `field`, empty when the field was never set.
    pub fn options(&self, field: &str) -> Vec<FieldValue> {
        self.unique_values
            .get(field)
            .map(|vals| vals.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_zero_is_one_value() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let (pos, neg) = (FieldValue::Float(0.0), FieldValue::Float(-0.0));
        assert_eq!(pos, neg);
        assert_eq!(pos.cmp(&neg), std::cmp::Ordering::Equal);

        let digest = |v: &FieldValue| {
            let mut h = DefaultHasher::new();
            v.hash(&mut h);
            h.finish()
        };
        assert_eq!(digest(&pos), digest(&neg));

        let set: BTreeSet<FieldValue> = [pos, neg].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn equality_agrees_with_ordering() {
        let nan = FieldValue::Float(f64::NAN);
        assert_eq!(nan, nan.clone());
        assert_ne!(FieldValue::Float(8.46), FieldValue::Float(8.5));
        assert_ne!(FieldValue::Integer(8), FieldValue::Float(8.0));
    }

    #[test]
    fn stringified_year_matches_numeric_year() {
        assert!(FieldValue::from("2025").matches(&FieldValue::Integer(2025)));
        assert!(FieldValue::Integer(2025).matches(&FieldValue::from("2025")));
        assert!(FieldValue::Float(2025.0).matches(&FieldValue::Integer(2025)));
        assert!(!FieldValue::from("2025a").matches(&FieldValue::Integer(2025)));
    }

    #[test]
    fn string_match_is_case_sensitive_and_null_never_matches() {
        assert!(!FieldValue::from("Drama").matches(&FieldValue::from("drama")));
        assert!(!FieldValue::Null.matches(&FieldValue::Null));
        assert!(!FieldValue::Null.matches(&FieldValue::from("x")));
    }

    #[test]
    fn lenient_numeric_prefix() {
        assert_eq!(FieldValue::from("8.8/10").as_f64(), Some(8.8));
        assert_eq!(FieldValue::from(" 7 ").as_f64(), Some(7.0));
        assert_eq!(FieldValue::from("-1.5x").as_f64(), Some(-1.5));
        assert_eq!(FieldValue::from("n/a").as_f64(), None);
        assert_eq!(FieldValue::from("").as_f64(), None);
        assert_eq!(FieldValue::Bool(true).as_f64(), None);
    }

    #[test]
    fn unknown_field_is_none_known_empty_field_is_null() {
        let rec = ContentRecord::new("c-1", "Dune");
        assert_eq!(rec.field("does_not_exist"), None);
        assert_eq!(rec.field("rating"), Some(FieldValue::Null));
        assert_eq!(rec.field("platform"), Some(FieldValue::Null));
    }

    #[test]
    fn dataset_indexes_platform_names_individually() {
        let mut a = ContentRecord::new("a", "A");
        a.platforms.insert("Netflix".into(), true);
        a.platforms.insert("Hulu".into(), false);
        a.industry = Some("Hollywood".into());
        let mut b = ContentRecord::new("b", "B");
        b.platforms.insert("Disney+".into(), true);

        let ds = Dataset::from_content(vec![a, b]);
        assert_eq!(
            ds.options("platform"),
            vec![FieldValue::from("Disney+"), FieldValue::from("Netflix")]
        );
        assert_eq!(ds.options("industry"), vec![FieldValue::from("Hollywood")]);
        assert!(ds.options("title").is_empty());
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn watch_time_label_splits_hours_and_minutes() {
        let mut u = UserRecord::new("u1", "ana");
        u.watch_time_mins = Some(135);
        assert_eq!(u.watch_time_label(), "2h 15m");
    }
}
