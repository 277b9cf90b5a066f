use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::{cast, cast_with_options, CastOptions};
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{
    LaunchDataset, LaunchRecord, Outcome, COL_BOOSTER_CATEGORY, COL_BOOSTER_VERSION, COL_CLASS,
    COL_FLIGHT_NUMBER, COL_LAUNCH_SITE, COL_PAYLOAD_MASS,
};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the launch dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the launch columns; extra columns ignored
/// * `.json`    – `[{ "Flight Number": 1, "Launch Site": "...", ... }, ...]`
/// * `.parquet` – one column per field, as written by `df.to_parquet()`
pub fn load_file(path: &Path) -> Result<LaunchDataset, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    LaunchDataset::from_records(records)
}

// ---------------------------------------------------------------------------
// Row validation shared by every format
// ---------------------------------------------------------------------------

/// Untyped cells of one row, before validation.
struct RawRow {
    flight_number: i64,
    launch_site: String,
    payload_mass: f64,
    booster_version: String,
    booster_category: String,
    class: i64,
}

impl RawRow {
    /// `row` is the 1-based record number used in error messages.
    fn validate(self, row: usize) -> Result<LaunchRecord, LoadError> {
        let flight_number =
            u32::try_from(self.flight_number).map_err(|_| LoadError::InvalidValue {
                row,
                column: COL_FLIGHT_NUMBER,
                value: self.flight_number.to_string(),
            })?;

        if !self.payload_mass.is_finite() || self.payload_mass < 0.0 {
            return Err(LoadError::InvalidValue {
                row,
                column: COL_PAYLOAD_MASS,
                value: self.payload_mass.to_string(),
            });
        }

        let outcome = Outcome::from_class(self.class).ok_or_else(|| LoadError::InvalidValue {
            row,
            column: COL_CLASS,
            value: self.class.to_string(),
        })?;

        Ok(LaunchRecord {
            flight_number,
            launch_site: self.launch_site,
            payload_mass: self.payload_mass,
            booster_version: self.booster_version,
            booster_category: self.booster_category,
            outcome,
        })
    }
}

/// Whole-valued floats only: `3.0` passes, `3.5`, `NaN` and `inf` do not.
fn integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0).then_some(f as i64)
}

/// Accepts `"3"` as well as `"3.0"`, rejects `"3.5"`.
fn parse_integral(s: &str) -> Option<i64> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(i);
    }
    integral(s.parse::<f64>().ok()?)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Column positions resolved from the CSV header row.
struct CsvColumns {
    flight_number: usize,
    launch_site: usize,
    payload_mass: usize,
    booster_version: usize,
    booster_category: usize,
    class: usize,
}

impl CsvColumns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, LoadError> {
        let position = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(LoadError::MissingColumn(name))
        };
        Ok(CsvColumns {
            flight_number: position(COL_FLIGHT_NUMBER)?,
            launch_site: position(COL_LAUNCH_SITE)?,
            payload_mass: position(COL_PAYLOAD_MASS)?,
            booster_version: position(COL_BOOSTER_VERSION)?,
            booster_category: position(COL_BOOSTER_CATEGORY)?,
            class: position(COL_CLASS)?,
        })
    }
}

fn load_csv(path: &Path) -> Result<Vec<LaunchRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let columns = CsvColumns::resolve(reader.headers()?)?;

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result?;
        let row = index + 1;

        let cell = |idx: usize, column: &'static str| match record.get(idx) {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(LoadError::MissingValue { row, column }),
        };
        let invalid = |column: &'static str, value: &str| LoadError::InvalidValue {
            row,
            column,
            value: value.to_string(),
        };

        let flight = cell(columns.flight_number, COL_FLIGHT_NUMBER)?;
        let payload = cell(columns.payload_mass, COL_PAYLOAD_MASS)?;
        let class = cell(columns.class, COL_CLASS)?;

        let raw = RawRow {
            flight_number: parse_integral(flight).ok_or_else(|| invalid(COL_FLIGHT_NUMBER, flight))?,
            launch_site: cell(columns.launch_site, COL_LAUNCH_SITE)?.to_string(),
            payload_mass: payload
                .parse::<f64>()
                .map_err(|_| invalid(COL_PAYLOAD_MASS, payload))?,
            booster_version: cell(columns.booster_version, COL_BOOSTER_VERSION)?.to_string(),
            booster_category: cell(columns.booster_category, COL_BOOSTER_CATEGORY)?.to_string(),
            class: parse_integral(class).ok_or_else(|| invalid(COL_CLASS, class))?,
        };
        records.push(raw.validate(row)?);
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Flight Number": 1,
///     "Launch Site": "CCAFS LC-40",
///     "Payload Mass (kg)": 0.0,
///     "Booster Version": "F9 v1.0  B0003",
///     "Booster Version Category": "v1.0",
///     "class": 0
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<LaunchRecord>, LoadError> {
    let text = std::fs::read_to_string(path)?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let rows = root.as_array().ok_or(LoadError::NotRecordArray)?;

    rows.iter()
        .enumerate()
        .map(|(index, value)| {
            let row = index + 1;
            let raw = RawRow {
                flight_number: json_integral(value, row, COL_FLIGHT_NUMBER)?,
                launch_site: json_string(value, row, COL_LAUNCH_SITE)?,
                payload_mass: json_number(value, row, COL_PAYLOAD_MASS)?,
                booster_version: json_string(value, row, COL_BOOSTER_VERSION)?,
                booster_category: json_string(value, row, COL_BOOSTER_CATEGORY)?,
                class: json_integral(value, row, COL_CLASS)?,
            };
            raw.validate(row)
        })
        .collect()
}

fn json_field<'a>(
    obj: &'a JsonValue,
    row: usize,
    column: &'static str,
) -> Result<&'a JsonValue, LoadError> {
    match obj.get(column) {
        None | Some(JsonValue::Null) => Err(LoadError::MissingValue { row, column }),
        Some(v) => Ok(v),
    }
}

fn json_invalid(row: usize, column: &'static str, value: &JsonValue) -> LoadError {
    LoadError::InvalidValue {
        row,
        column,
        value: value.to_string(),
    }
}

fn json_string(obj: &JsonValue, row: usize, column: &'static str) -> Result<String, LoadError> {
    let v = json_field(obj, row, column)?;
    v.as_str()
        .map(str::to_string)
        .ok_or_else(|| json_invalid(row, column, v))
}

fn json_number(obj: &JsonValue, row: usize, column: &'static str) -> Result<f64, LoadError> {
    let v = json_field(obj, row, column)?;
    v.as_f64().ok_or_else(|| json_invalid(row, column, v))
}

fn json_integral(obj: &JsonValue, row: usize, column: &'static str) -> Result<i64, LoadError> {
    let v = json_field(obj, row, column)?;
    match v {
        JsonValue::Bool(b) => Ok(i64::from(*b)),
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(integral))
            .ok_or_else(|| json_invalid(row, column, v)),
        other => Err(json_invalid(row, column, other)),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per launch field.
///
/// Numeric columns may be any integer, float or boolean width, or text
/// holding numbers. Flight number and class must hold whole values; nothing
/// is truncated or rounded. Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<LaunchRecord>, LoadError> {
    let file = std::fs::File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let first_row = records.len() + 1;

        let flight = numeric_cells(&batch, COL_FLIGHT_NUMBER, first_row)?;
        let site = text_column(&batch, COL_LAUNCH_SITE)?;
        let payload = numeric_cells(&batch, COL_PAYLOAD_MASS, first_row)?;
        let version = text_column(&batch, COL_BOOSTER_VERSION)?;
        let category = text_column(&batch, COL_BOOSTER_CATEGORY)?;
        let class = numeric_cells(&batch, COL_CLASS, first_row)?;

        for i in 0..batch.num_rows() {
            let row = first_row + i;
            let raw = RawRow {
                flight_number: whole_at(&flight, i, row, COL_FLIGHT_NUMBER)?,
                launch_site: text_at(&site, i, row, COL_LAUNCH_SITE)?,
                payload_mass: number_at(&payload, i, row, COL_PAYLOAD_MASS)?,
                booster_version: text_at(&version, i, row, COL_BOOSTER_VERSION)?,
                booster_category: text_at(&category, i, row, COL_BOOSTER_CATEGORY)?,
                class: whole_at(&class, i, row, COL_CLASS)?,
            };
            records.push(raw.validate(row)?);
        }
    }

    Ok(records)
}

fn lookup<'a>(batch: &'a RecordBatch, name: &'static str) -> Result<&'a ArrayRef, LoadError> {
    batch
        .column_by_name(name)
        .ok_or(LoadError::MissingColumn(name))
}

/// Unsafe casts fail instead of turning unconvertible values into nulls.
fn strict() -> CastOptions<'static> {
    CastOptions {
        safe: false,
        ..Default::default()
    }
}

fn text_column(batch: &RecordBatch, name: &'static str) -> Result<ArrayRef, LoadError> {
    Ok(cast_with_options(lookup(batch, name)?, &DataType::Utf8, &strict())?)
}

/// Read a numeric column as `f64` cells, `None` for nulls.
///
/// Text is parsed per cell so a bad value is reported with its record
/// number. Other types are widened to `Float64`.
fn numeric_cells(
    batch: &RecordBatch,
    name: &'static str,
    first_row: usize,
) -> Result<Vec<Option<f64>>, LoadError> {
    let array = lookup(batch, name)?;
    match array.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            let text = cast(array, &DataType::Utf8)?;
            text.as_string::<i32>()
                .iter()
                .enumerate()
                .map(|(i, cell)| match cell {
                    None => Ok(None),
                    Some(s) => s.trim().parse::<f64>().map(Some).map_err(|_| {
                        LoadError::InvalidValue {
                            row: first_row + i,
                            column: name,
                            value: s.to_string(),
                        }
                    }),
                })
                .collect()
        }
        _ => {
            let floats = cast_with_options(array, &DataType::Float64, &strict())?;
            Ok(floats.as_primitive::<Float64Type>().iter().collect())
        }
    }
}

fn number_at(
    cells: &[Option<f64>],
    i: usize,
    row: usize,
    column: &'static str,
) -> Result<f64, LoadError> {
    cells[i].ok_or(LoadError::MissingValue { row, column })
}

fn whole_at(
    cells: &[Option<f64>],
    i: usize,
    row: usize,
    column: &'static str,
) -> Result<i64, LoadError> {
    let value = number_at(cells, i, row, column)?;
    integral(value).ok_or_else(|| LoadError::InvalidValue {
        row,
        column,
        value: value.to_string(),
    })
}

fn text_at(array: &ArrayRef, i: usize, row: usize, column: &'static str) -> Result<String, LoadError> {
    let strings = array.as_string::<i32>();
    if strings.is_null(i) {
        return Err(LoadError::MissingValue { row, column });
    }
    Ok(strings.value(i).to_string())
}
