use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, UInt32Type,
};
use arrow::util::display::array_value_to_string;
use log::{info, warn};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{canonical_column, columns, CellValue, Roster};

// ---------------------------------------------------------------------------
// Errors and formats
// ---------------------------------------------------------------------------

/// Reasons a roster source could not be loaded. All of them are fatal: there
/// is no partial load.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("Parquet error in {path}: {source}")]
    Parquet {
        path: String,
        source: parquet::errors::ParquetError,
    },

    #[error("Arrow error in {path}: {source}")]
    Arrow {
        path: String,
        source: arrow::error::ArrowError,
    },

    #[error("{path}: {message}")]
    Malformed { path: String, message: String },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("{path} has no '{}' column", columns::PLAYER_ID)]
    MissingIdColumn { path: String },
}

/// Source formats understood by [`load_file_as`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FileFormat {
    /// Comma-separated values with a header row
    Csv,
    /// JSON array of objects
    Json,
    /// Parquet columnar format
    Parquet,
}

impl FileFormat {
    /// Detect format from the path extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "parquet" | "pq" => Some(Self::Parquet),
            _ => None,
        }
    }
}

/// Header names plus one cell per header for every row, as read.
struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a roster from a file, picking the format from its extension.
pub fn load_file(path: &Path) -> Result<Roster, LoadError> {
    let format = FileFormat::from_path(path).ok_or_else(|| {
        LoadError::UnsupportedFormat(
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_string(),
        )
    })?;
    load_file_as(path, format)
}

/// Load a roster from a file in an explicit format.
pub fn load_file_as(path: &Path, format: FileFormat) -> Result<Roster, LoadError> {
    let name = path.display().to_string();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: name.clone(),
        source,
    })?;
    let raw = match format {
        FileFormat::Csv => read_csv_table(file, &name)?,
        FileFormat::Json => read_json_table(file, &name)?,
        FileFormat::Parquet => read_parquet_table(file, &name)?,
    };
    let roster = build_roster(raw, &name)?;
    info!(
        "loaded {} players ({} columns) from {name}",
        roster.len(),
        roster.column_names.len()
    );
    Ok(roster)
}

/// Load a roster from CSV text.
pub fn read_csv<R: Read>(rdr: R) -> Result<Roster, LoadError> {
    let raw = read_csv_table(rdr, "<csv>")?;
    build_roster(raw, "<csv>")
}

/// Load a roster from a JSON array of objects.
pub fn read_json<R: Read>(rdr: R) -> Result<Roster, LoadError> {
    let raw = read_json_table(rdr, "<json>")?;
    build_roster(raw, "<json>")
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Normalize headers, require the id column, and build the roster.
fn build_roster(raw: RawTable, path: &str) -> Result<Roster, LoadError> {
    let headers: Vec<String> = raw.headers.iter().map(|h| canonical_column(h)).collect();
    if !headers.iter().any(|h| h == columns::PLAYER_ID) {
        return Err(LoadError::MissingIdColumn {
            path: path.to_string(),
        });
    }

    let mut column_names: Vec<String> = Vec::with_capacity(headers.len());
    for h in &headers {
        if column_names.contains(h) {
            warn!("{path}: column '{h}' appears more than once; the last one wins");
        } else {
            column_names.push(h.clone());
        }
    }

    let records: Vec<BTreeMap<String, CellValue>> = raw
        .rows
        .into_iter()
        .map(|row| headers.iter().cloned().zip(row).collect())
        .collect();

    Ok(Roster::from_records(column_names, &records))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one player per line. Every cell
/// is kept as text; empty cells are nulls. The id column is therefore never
/// reinterpreted as a number.
fn read_csv_table<R: Read>(rdr: R, path: &str) -> Result<RawTable, LoadError> {
    let csv_err = |source| LoadError::Csv {
        path: path.to_string(),
        source,
    };
    let mut reader = csv::Reader::from_reader(rdr);
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        CellValue::Null
                    } else {
                        CellValue::String(field.to_string())
                    }
                })
                .collect(),
        );
    }
    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "playerid": "2544", "first_name": "LeBron", "height": "6-9", "weight": 250 },
///   ...
/// ]
/// ```
///
/// Keys missing from a record read as nulls.
fn read_json_table<R: Read>(rdr: R, path: &str) -> Result<RawTable, LoadError> {
    let root: JsonValue = serde_json::from_reader(rdr).map_err(|source| LoadError::Json {
        path: path.to_string(),
        source,
    })?;
    let malformed = |message: String| LoadError::Malformed {
        path: path.to_string(),
        message,
    };

    let records = root
        .as_array()
        .ok_or_else(|| malformed("expected top-level JSON array".to_string()))?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| malformed(format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map_or(CellValue::Null, json_to_cell))
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load every record batch of a Parquet file. Column types are mapped onto
/// [`CellValue`]; anything exotic (dates, decimals) is read as its display
/// string, so a `Date32` birthday arrives as `YYYY-MM-DD`.
fn read_parquet_table(file: File, path: &str) -> Result<RawTable, LoadError> {
    let parquet_err = |source| LoadError::Parquet {
        path: path.to_string(),
        source,
    };
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(parquet_err)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().map_err(parquet_err)?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|source| LoadError::Arrow {
            path: path.to_string(),
            source,
        })?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| arrow_cell(col, row))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| LoadError::Arrow {
                    path: path.to_string(),
                    source,
                })?;
            rows.push(cells);
        }
    }
    Ok(RawTable { headers, rows })
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &Arc<dyn Array>, row: usize) -> Result<CellValue, arrow::error::ArrowError> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row).into()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row).into()),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt32 => CellValue::Integer(col.as_primitive::<UInt32Type>().value(row).into()),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row).into()),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        _ => CellValue::String(array_value_to_string(col, row)?),
    };
    Ok(cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_headers_are_normalized() {
        let data = "\
 PlayerID ,First_Name, LAST_NAME ,Position
00042,  Tim ,Duncan,F-C
";
        let roster = read_csv(data.as_bytes()).unwrap();
        assert_eq!(
            roster.column_names,
            vec!["playerid", "first_name", "last_name", "position"]
        );
        let p = &roster.players[0];
        assert_eq!(p.player_id, "00042");
        assert_eq!(p.first_name, "Tim");
        assert_eq!(p.position, "F-C");
    }

    #[test]
    fn csv_without_id_column_fails() {
        let data = "first_name,last_name\nTim,Duncan\n";
        assert!(matches!(
            read_csv(data.as_bytes()),
            Err(LoadError::MissingIdColumn { .. })
        ));
    }

    #[test]
    fn csv_ragged_row_fails() {
        let data = "playerid,first_name\n1,Tim\n2\n";
        assert!(matches!(read_csv(data.as_bytes()), Err(LoadError::Csv { .. })));
    }

    #[test]
    fn json_records_with_missing_keys() {
        let data = r#"[
            {"playerid": "7", "fname": "Dirk", "weight": 245, "draft_year": 1998},
            {"playerid": 8, "lname": "Nash", "weight": null}
        ]"#;
        let roster = read_json(data.as_bytes()).unwrap();
        assert_eq!(roster.len(), 2);
        assert!(roster.has_column("first_name"));
        assert!(roster.has_column("last_name"));
        assert_eq!(roster.players[0].first_name, "Dirk");
        assert_eq!(roster.players[0].last_name, "");
        assert_eq!(roster.players[0].weight, Some(245.0));
        assert_eq!(roster.players[1].player_id, "8");
        assert_eq!(roster.players[1].weight, None);
        assert_eq!(roster.players[1].draft_year, None);
    }

    #[test]
    fn json_must_be_array_of_objects() {
        assert!(matches!(
            read_json(r#"{"playerid": 1}"#.as_bytes()),
            Err(LoadError::Malformed { .. })
        ));
        assert!(matches!(
            read_json(r#"[1, 2]"#.as_bytes()),
            Err(LoadError::Malformed { .. })
        ));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(FileFormat::from_path(Path::new("players.CSV")), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_path(Path::new("p.pq")), Some(FileFormat::Parquet));
        assert_eq!(FileFormat::from_path(Path::new("p.xlsx")), None);
        assert!(matches!(
            load_file(Path::new("players.xlsx")),
            Err(LoadError::UnsupportedFormat(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            load_file(Path::new("/definitely/not/here/players.csv")),
            Err(LoadError::Io { .. })
        ));
    }
}
