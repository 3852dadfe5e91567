use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::Table;
use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a numeric table with exactly `columns` cells per row.
/// Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` / `.pq` – numeric or boolean columns, in schema order
/// * `.json`            – `[[1.0, 2.0, ...], ...]`
/// * `.csv`             – headerless comma-separated rows
/// * anything else      – whitespace-separated rows, `#` starts a comment
pub fn load_table(path: &Path, columns: usize) -> Result<Table, PipelineError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let loaded = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path, columns),
        "json" => load_json(path, columns),
        "csv" => load_csv(path, columns),
        _ => load_text(path, columns),
    };

    let table = loaded.map_err(|e| PipelineError::input(path, format!("{e:#}")))?;
    if table.is_empty() {
        return Err(PipelineError::input(path, "table has no rows"));
    }
    log::debug!(
        "Loaded {} rows x {} columns from {}",
        table.len(),
        table.columns,
        path.display()
    );
    Ok(table)
}

fn check_width(row: &[f64], columns: usize, what: &str) -> Result<()> {
    if row.len() != columns {
        bail!("{what}: expected {columns} columns, found {}", row.len());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Whitespace text loader
// ---------------------------------------------------------------------------

/// One record per line, cells separated by any run of whitespace.
/// Blank lines and everything after `#` are ignored.
fn load_text(path: &Path, columns: usize) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading table file")?;
    parse_text(&text, columns)
}

pub(crate) fn parse_text(text: &str, columns: usize) -> Result<Table> {
    let mut table = Table::new(columns);

    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        let data = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        };
        if data.trim().is_empty() {
            continue;
        }

        let row = data
            .split_whitespace()
            .enumerate()
            .map(|(j, tok)| {
                tok.parse::<f64>()
                    .with_context(|| format!("Line {line_no}, column {j}: '{tok}' is not a number"))
            })
            .collect::<Result<Vec<f64>>>()?;

        check_width(&row, columns, &format!("Line {line_no}"))?;
        table.rows.push(row);
    }

    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Headerless CSV; every record must have `columns` fields.
fn load_csv(path: &Path, columns: usize) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_path(path)
        .context("opening CSV")?;

    let mut table = Table::new(columns);
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row = record
            .iter()
            .enumerate()
            .map(|(j, tok)| {
                tok.parse::<f64>()
                    .with_context(|| format!("CSV row {row_no}, column {j}: '{tok}' is not a number"))
            })
            .collect::<Result<Vec<f64>>>()?;

        check_width(&row, columns, &format!("CSV row {row_no}"))?;
        table.rows.push(row);
    }

    Ok(table)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonCell {
    Number(f64),
    Bool(bool),
}

impl JsonCell {
    fn as_f64(&self) -> f64 {
        match *self {
            JsonCell::Number(v) => v,
            JsonCell::Bool(b) => f64::from(u8::from(b)),
        }
    }
}

/// Expected JSON layout (row-major, like `np.savetxt` but as JSON):
///
/// ```json
/// [
///   [2764.6, 2764.6, 0.91, 1, 0],
///   ...
/// ]
/// ```
fn load_json(path: &Path, columns: usize) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let rows: Vec<Vec<JsonCell>> =
        serde_json::from_str(&text).context("parsing JSON: expected an array of numeric rows")?;

    let mut table = Table::new(columns);
    for (i, cells) in rows.iter().enumerate() {
        let row: Vec<f64> = cells.iter().map(JsonCell::as_f64).collect();
        check_width(&row, columns, &format!("Row {i}"))?;
        table.rows.push(row);
    }

    Ok(table)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file whose columns are the table columns in schema order.
///
/// Float, integer and boolean columns are accepted; nulls become NaN.
fn load_parquet(path: &Path, columns: usize) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut table = Table::new(columns);

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        if batch.num_columns() != columns {
            bail!(
                "expected {columns} columns, parquet schema has {}",
                batch.num_columns()
            );
        }

        let cols = batch
            .columns()
            .iter()
            .zip(batch.schema().fields())
            .map(|(col, field)| {
                column_to_f64(col).with_context(|| format!("column '{}'", field.name()))
            })
            .collect::<Result<Vec<Vec<f64>>>>()?;

        for row in 0..batch.num_rows() {
            table.rows.push(cols.iter().map(|c| c[row]).collect());
        }
    }

    Ok(table)
}

fn column_to_f64(col: &Arc<dyn Array>) -> Result<Vec<f64>> {
    let values = match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .context("expected Float64Array")?
            .iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect(),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .context("expected Float32Array")?
            .iter()
            .map(|v| v.map(f64::from).unwrap_or(f64::NAN))
            .collect(),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .context("expected Int64Array")?
            .iter()
            .map(|v| v.map(|i| i as f64).unwrap_or(f64::NAN))
            .collect(),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .context("expected Int32Array")?
            .iter()
            .map(|v| v.map(f64::from).unwrap_or(f64::NAN))
            .collect(),
        DataType::Boolean => col
            .as_any()
            .downcast_ref::<BooleanArray>()
            .context("expected BooleanArray")?
            .iter()
            .map(|v| v.map(|b| f64::from(u8::from(b))).unwrap_or(f64::NAN))
            .collect(),
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(values)
}
