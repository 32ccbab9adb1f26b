use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{Dataset, Records};
use super::normalize::{normalize_rows, RawRow};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read the raw rows of a record file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – `[{ "title": ..., ... }, ...]`, or an API page `{ "data": [...] }`
/// * `.csv`     – header row with field names, one record per line
/// * `.parquet` – one record per row; scalar and string-list columns
pub fn load_file(path: &Path) -> Result<Vec<RawRow>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Load and normalize one file. Ids missing from the source are derived
/// from the file stem.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let rows = load_file(path).with_context(|| format!("loading {}", path.display()))?;
    let dataset = normalize_rows(&rows, &id_prefix(path));
    log::info!("Loaded {} records from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Load several content files and concatenate them in the given order,
/// the way the content library combines its fresh and curated exports.
/// A single path loads as-is, user files included.
pub fn load_merged<P: AsRef<Path>>(paths: &[P]) -> Result<Dataset> {
    if let [single] = paths {
        return load_dataset(single.as_ref());
    }
    let mut combined = Vec::new();
    for path in paths {
        let path = path.as_ref();
        match load_dataset(path)?.records {
            Records::Content(records) => combined.extend(records),
            Records::Users(_) => bail!("{} holds user records and cannot be merged", path.display()),
        }
    }
    log::info!("Merged {} content records from {} files", combined.len(), paths.len());
    Ok(Dataset::from_content(combined))
}

fn id_prefix(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("row")
        .to_string()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "title": "Dune 2", "release_year": 2025, "imdb_rating": 8.5, ... },
///   ...
/// ]
/// ```
///
/// A paginated API response `{ "data": [...], "total": n }` is unwrapped.
fn load_json(path: &Path) -> Result<Vec<RawRow>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json_rows(&text)
}

pub fn parse_json_rows(text: &str) -> Result<Vec<RawRow>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = match &root {
        JsonValue::Array(items) => items,
        JsonValue::Object(obj) => obj
            .get("data")
            .and_then(|d| d.as_array())
            .context("Expected a JSON array or an object with a 'data' array")?,
        _ => bail!("Expected top-level JSON array"),
    };

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            rec.as_object()
                .cloned()
                .with_context(|| format!("Row {i} is not a JSON object"))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with field names, every other row one record.
/// Empty cells are null; numbers and booleans are recognised.
fn load_csv(path: &Path) -> Result<Vec<RawRow>> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

pub fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<RawRow>> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(name, value)| (name.clone(), guess_json_type(value)))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn guess_json_type(s: &str) -> JsonValue {
    let s = s.trim();
    if s.is_empty() {
        return JsonValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return JsonValue::from(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        if f.is_finite() {
            return JsonValue::from(f);
        }
    }
    if s == "true" || s == "false" {
        return JsonValue::Bool(s == "true");
    }
    JsonValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet export of the catalog.
///
/// Every column becomes a field of the same name. Scalar columns map to JSON
/// scalars, `List<Utf8>` columns (e.g. user preferences) to string arrays and
/// anything else to its display string.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        for row in 0..batch.num_rows() {
            let mut fields = Map::new();
            for (col_idx, field) in schema.fields().iter().enumerate() {
                let value = extract_json_value(batch.column(col_idx), row);
                fields.insert(field.name().clone(), value);
            }
            rows.push(fields);
        }
    }

    Ok(rows)
}

// -- Parquet / Arrow helpers --

/// Extract a single value from an Arrow column at a given row.
fn extract_json_value(col: &Arc<dyn Array>, row: usize) -> JsonValue {
    if col.is_null(row) {
        return JsonValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => JsonValue::from(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => JsonValue::from(col.as_string::<i64>().value(row)),
        DataType::Int32 => JsonValue::from(col.as_primitive::<Int32Type>().value(row)),
        DataType::Int64 => JsonValue::from(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => JsonValue::from(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => JsonValue::from(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => JsonValue::Bool(col.as_boolean().value(row)),
        DataType::List(_) => string_list(&col.as_list::<i32>().value(row)),
        DataType::LargeList(_) => string_list(&col.as_list::<i64>().value(row)),
        _ => display_value(col, row),
    }
}

/// A list cell as a JSON array of its elements' display strings.
fn string_list(values: &Arc<dyn Array>) -> JsonValue {
    let items = (0..values.len())
        .filter(|i| !values.is_null(*i))
        .map(|i| display_value(values, i))
        .collect();
    JsonValue::Array(items)
}

fn display_value(col: &Arc<dyn Array>, row: usize) -> JsonValue {
    match array_value_to_string(col, row) {
        Ok(s) => JsonValue::String(s),
        Err(e) => {
            log::warn!("Unreadable {} cell at row {row}: {e}", col.data_type());
            JsonValue::Null
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_array_and_api_page() {
        let rows = parse_json_rows(r#"[{"title": "A"}, {"title": "B"}]"#).unwrap();
        assert_eq!(rows.len(), 2);

        let rows = parse_json_rows(r#"{"data": [{"username": "u"}], "total": 1, "total_pages": 1}"#).unwrap();
        assert_eq!(rows[0]["username"], "u");
    }

    #[test]
    fn json_rejects_non_objects() {
        assert!(parse_json_rows(r#"[{"title": "A"}, 3]"#).is_err());
        assert!(parse_json_rows(r#""nope""#).is_err());
    }

    #[test]
    fn csv_cells_are_typed() {
        let data = "Title,Year,IMDb,Netflix,Note\nHeat,1995,8.3,1,\n";
        let rows = read_csv(csv::Reader::from_reader(data.as_bytes())).unwrap();
        assert_eq!(rows[0]["Title"], "Heat");
        assert_eq!(rows[0]["Year"], 1995);
        assert_eq!(rows[0]["IMDb"], 8.3);
        assert_eq!(rows[0]["Netflix"], 1);
        assert!(rows[0]["Note"].is_null());
    }

    #[test]
    fn unsupported_extension() {
        let err = load_file(Path::new("catalog.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }
}
