use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::PipelineError;
use super::model::{RawRecord, RawTable, COLUMNS};

static JSON_NULL: JsonValue = JsonValue::Null;

/// Text the source may use for an absent value.
const NULL_TOKENS: [&str; 6] = ["", "NA", "NaN", "nan", "null", "None"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a benefit table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the benefit columns (the published format)
/// * `.parquet` – same columns, any numeric or string Arrow types
/// * `.json`    – `[{ "state": "AL", "year": 2020, ... }, ...]`
///
/// Every failure is reported as [`PipelineError::SourceRead`].
pub fn load_file(path: &Path) -> Result<RawTable, PipelineError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let loaded = match ext.as_str() {
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        other => Err(anyhow::anyhow!("unsupported file extension: .{other}")),
    };

    loaded.map_err(|e| PipelineError::SourceRead {
        path: path.to_path_buf(),
        reason: format!("{e:#}"),
    })
}

fn check_columns<'a>(found: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let found: Vec<&str> = found.into_iter().collect();
    let missing: Vec<&str> = COLUMNS
        .iter()
        .copied()
        .filter(|c| !found.contains(c))
        .collect();
    if !missing.is_empty() {
        bail!("column mismatch, missing {missing:?}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn is_null(s: &str) -> bool {
    NULL_TOKENS.contains(&s.trim())
}

fn parse_text(s: &str) -> Option<String> {
    (!is_null(s)).then(|| s.trim().to_string())
}

fn parse_float(s: &str, row: usize, col: &str) -> Result<Option<f64>> {
    if is_null(s) {
        return Ok(None);
    }
    let v = s
        .trim()
        .parse::<f64>()
        .with_context(|| format!("row {row}, '{col}': '{s}' is not a number"))?;
    Ok(Some(v))
}

/// Whole-number value of `f`, or an error naming the cell.
fn integral(f: f64, row: usize, col: &str) -> Result<i64> {
    if f.is_finite() && f.fract() == 0.0 {
        return Ok(f as i64);
    }
    bail!("row {row}, '{col}': {f} is not an integer")
}

/// Integers may arrive as `2020` or, after a float round-trip, `2020.0`.
fn parse_int(s: &str, row: usize, col: &str) -> Result<Option<i64>> {
    if is_null(s) {
        return Ok(None);
    }
    let t = s.trim();
    if let Ok(i) = t.parse::<i64>() {
        return Ok(Some(i));
    }
    let f = t
        .parse::<f64>()
        .with_context(|| format!("row {row}, '{col}': '{s}' is not an integer"))?;
    if f.is_nan() {
        return Ok(None);
    }
    integral(f, row, col).map(Some)
}

/// CSV layout: header row naming at least the benefit columns. Extra
/// columns are ignored; a row with a different field count is an error.
fn load_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();
    check_columns(headers.iter())?;

    let idx = |name: &str| headers.iter().position(|h| h == name).unwrap_or_default();
    let [
        state,
        region,
        region_name,
        divis,
        divis_name,
        year,
        monthno,
        benperhh,
        benperp,
        pop_urban,
        pop_rural,
        totpop,
        pct_urban,
        pct_rural,
    ] = COLUMNS.map(idx);

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |i: usize| record.get(i).unwrap_or("");
        let float = |i: usize| parse_float(cell(i), row_no, &headers[i]);

        rows.push(RawRecord {
            state: parse_text(cell(state)),
            region: parse_text(cell(region)),
            region_name: parse_text(cell(region_name)),
            divis: parse_text(cell(divis)),
            divis_name: parse_text(cell(divis_name)),
            year: parse_int(cell(year), row_no, "year")?,
            monthno: parse_int(cell(monthno), row_no, "monthno")?,
            benperhh: float(benperhh)?,
            benperp: float(benperp)?,
            pop_urban_2010: float(pop_urban)?,
            pop_rural_2010: float(pop_rural)?,
            totpop_2010: float(totpop)?,
            pct_pop_urban_2010: float(pct_urban)?,
            pct_pop_rural_2010: float(pct_rural)?,
        });
    }

    log::debug!("Read {} CSV rows from {}", rows.len(), path.display());
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`), `null` for
/// missing values. Cells follow the CSV rules: codes may be numbers,
/// integers may be written as floats, numbers may be quoted.
fn load_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("expected top-level JSON array")?;
    if let Some(obj) = records.first().and_then(|r| r.as_object()) {
        check_columns(obj.keys().map(String::as_str))?;
    }

    let mut rows = Vec::with_capacity(records.len());
    for (row_no, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("row {row_no} is not a JSON object"))?;
        let cell = |name: &str| obj.get(name).unwrap_or(&JSON_NULL);
        let text = |name: &str| json_text(cell(name));
        let float = |name: &str| json_float(cell(name), row_no, name);
        let int = |name: &str| json_int(cell(name), row_no, name);

        rows.push(RawRecord {
            state: text("state"),
            region: text("region"),
            region_name: text("region_name"),
            divis: text("divis"),
            divis_name: text("divis_name"),
            year: int("year")?,
            monthno: int("monthno")?,
            benperhh: float("benperhh")?,
            benperp: float("benperp")?,
            pop_urban_2010: float("pop_urban_2010")?,
            pop_rural_2010: float("pop_rural_2010")?,
            totpop_2010: float("totpop_2010")?,
            pct_pop_urban_2010: float("pct_pop_urban_2010")?,
            pct_pop_rural_2010: float("pct_pop_rural_2010")?,
        });
    }

    log::debug!("Read {} JSON rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn json_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => parse_text(s),
        other => Some(other.to_string()),
    }
}

fn json_float(val: &JsonValue, row: usize, col: &str) -> Result<Option<f64>> {
    match val {
        JsonValue::Null => Ok(None),
        JsonValue::Number(n) => Ok(n.as_f64()),
        JsonValue::String(s) => parse_float(s, row, col),
        other => bail!("row {row}, '{col}': {other} is not a number"),
    }
}

fn json_int(val: &JsonValue, row: usize, col: &str) -> Result<Option<i64>> {
    match val {
        JsonValue::Null => Ok(None),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Ok(Some(i)),
            None => integral(n.as_f64().unwrap_or(f64::NAN), row, col).map(Some),
        },
        JsonValue::String(s) => parse_int(s, row, col),
        other => bail!("row {row}, '{col}': {other} is not an integer"),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the benefit columns.
///
/// Numeric columns may be any integer or float type and string columns any
/// type castable to text (region codes are often stored as integers).
fn load_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    check_columns(builder.schema().fields().iter().map(|f| f.name().as_str()))?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let text = |name: &str| column_as(&batch, name, &DataType::Utf8);
        let num = |name: &str| column_as(&batch, name, &DataType::Float64);

        let state = text("state")?;
        let region = text("region")?;
        let region_name = text("region_name")?;
        let divis = text("divis")?;
        let divis_name = text("divis_name")?;
        let year = num("year")?;
        let monthno = num("monthno")?;
        let benperhh = num("benperhh")?;
        let benperp = num("benperp")?;
        let pop_urban = num("pop_urban_2010")?;
        let pop_rural = num("pop_rural_2010")?;
        let totpop = num("totpop_2010")?;
        let pct_urban = num("pct_pop_urban_2010")?;
        let pct_rural = num("pct_pop_rural_2010")?;

        for row in 0..batch.num_rows() {
            // Row numbers in messages count across batches.
            let row_no = rows.len();
            rows.push(RawRecord {
                state: string_at(&state, row),
                region: string_at(&region, row),
                region_name: string_at(&region_name, row),
                divis: string_at(&divis, row),
                divis_name: string_at(&divis_name, row),
                year: int_at(&year, row, row_no, "year")?,
                monthno: int_at(&monthno, row, row_no, "monthno")?,
                benperhh: float_at(&benperhh, row),
                benperp: float_at(&benperp, row),
                pop_urban_2010: float_at(&pop_urban, row),
                pop_rural_2010: float_at(&pop_rural, row),
                totpop_2010: float_at(&totpop, row),
                pct_pop_urban_2010: float_at(&pct_urban, row),
                pct_pop_rural_2010: float_at(&pct_rural, row),
            });
        }
    }

    log::debug!("Read {} parquet rows from {}", rows.len(), path.display());
    Ok(rows)
}

// -- Parquet / Arrow helpers --

/// Fetch a column by name and cast it to `to`.
fn column_as(batch: &RecordBatch, name: &str, to: &DataType) -> Result<ArrayRef> {
    let col = batch
        .column_by_name(name)
        .with_context(|| format!("parquet file missing '{name}' column"))?;
    cast(col, to).with_context(|| format!("column '{name}' ({}) is not {to}", col.data_type()))
}

fn string_at(col: &ArrayRef, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    parse_text(col.as_string::<i32>().value(row))
}

/// Arrow nulls and NaN are both missing values.
fn float_at(col: &ArrayRef, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    Some(col.as_primitive::<Float64Type>().value(row)).filter(|v| !v.is_nan())
}

/// Like [`float_at`], but a fractional value fails the load as it does in
/// CSV.
fn int_at(col: &ArrayRef, row: usize, row_no: usize, name: &str) -> Result<Option<i64>> {
    float_at(col, row)
        .map(|v| integral(v, row_no, name))
        .transpose()
}
