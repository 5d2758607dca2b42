//! Low-level Parquet reading and column extraction.

use std::path::Path;

use arrow::array::{Array, AsArray, RecordBatch};
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use chrono::{DateTime, NaiveDateTime, TimeDelta};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::metadata::KeyValue;

use crate::error::IoError;
use crate::parquet_write::{PRECIP_COLUMN, STEP_KEY, TIMESTAMP_COLUMN};

/// Expected `(name, type)` of each column, in order.
const COLUMNS: [(&str, DataType); 2] = [
    (TIMESTAMP_COLUMN, DataType::Int64),
    (PRECIP_COLUMN, DataType::Float64),
];

/// Decoded contents of a series file.
pub(crate) struct SeriesFile {
    pub(crate) batches: Vec<RecordBatch>,
    /// Step recorded by the writer, if the file carries one.
    pub(crate) stored_step: Option<TimeDelta>,
}

/// Reads all record batches and the stored step from a Parquet file.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the file does not exist,
/// [`IoError::File`] if it cannot be opened, or [`IoError::Parquet`] if it
/// cannot be decoded.
pub(crate) fn read_batches(path: &Path) -> Result<SeriesFile, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path).map_err(|e| IoError::File {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let stored_step = stored_step(builder.metadata().file_metadata().key_value_metadata());
    let batches = builder.build()?.collect::<Result<Vec<_>, _>>()?;
    Ok(SeriesFile {
        batches,
        stored_step,
    })
}

/// Looks up a positive step under [`STEP_KEY`]; anything else is ignored.
fn stored_step(metadata: Option<&Vec<KeyValue>>) -> Option<TimeDelta> {
    let value = metadata?
        .iter()
        .find(|kv| kv.key == STEP_KEY)?
        .value
        .as_deref()?;
    value
        .parse::<i64>()
        .ok()
        .filter(|s| *s > 0)
        .map(TimeDelta::seconds)
}

/// Validates a record batch against the `timestamp`/`precip` schema.
///
/// Every mismatch is reported, not just the first.
///
/// # Errors
///
/// Returns [`IoError::Validation`] if the column count, names, or types
/// differ, or if either column contains nulls.
pub(crate) fn validate_schema(batch: &RecordBatch) -> Result<(), IoError> {
    let num_cols = batch.num_columns();
    if num_cols != COLUMNS.len() {
        return Err(IoError::Validation {
            count: 1,
            details: format!("expected {} columns, got {num_cols}", COLUMNS.len()),
        });
    }

    let schema = batch.schema();
    let mut mismatches: Vec<String> = Vec::new();

    for (i, (expected_name, expected_type)) in COLUMNS.iter().enumerate() {
        let field = schema.field(i);
        if field.name() != *expected_name {
            mismatches.push(format!(
                "column {i}: expected '{expected_name}', got '{}'",
                field.name()
            ));
        }
        if field.data_type() != expected_type {
            mismatches.push(format!(
                "column {i}: expected type {expected_type}, got {}",
                field.data_type()
            ));
        } else if batch.column(i).null_count() > 0 {
            mismatches.push(format!(
                "{expected_name} has {} null(s)",
                batch.column(i).null_count()
            ));
        }
    }

    if !mismatches.is_empty() {
        return Err(IoError::Validation {
            count: mismatches.len(),
            details: mismatches.join("; "),
        });
    }
    Ok(())
}

/// Converts epoch seconds to a naive UTC timestamp.
fn from_epoch(seconds: i64) -> Result<NaiveDateTime, IoError> {
    DateTime::from_timestamp(seconds, 0)
        .map(|t| t.naive_utc())
        .ok_or_else(|| IoError::InvalidTime {
            reason: format!("epoch timestamp {seconds} is out of range"),
        })
}

/// Flattens validated batches into `(timestamp, precip)` records in file order.
///
/// # Errors
///
/// Propagates schema validation failures and returns
/// [`IoError::InvalidTime`] for an unrepresentable timestamp.
pub(crate) fn batches_to_records(
    batches: &[RecordBatch],
) -> Result<Vec<(NaiveDateTime, f64)>, IoError> {
    let total: usize = batches.iter().map(RecordBatch::num_rows).sum();
    let mut records = Vec::with_capacity(total);

    for batch in batches {
        validate_schema(batch)?;
        let ts_col = batch.column(0).as_primitive::<Int64Type>();
        let precip_col = batch.column(1).as_primitive::<Float64Type>();
        for (&ts, &p) in ts_col.values().iter().zip(precip_col.values().iter()) {
            records.push((from_epoch(ts)?, p));
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int32Array, Int64Array};
    use arrow::datatypes::{Field, Schema};
    use chrono::NaiveDate;

    use super::*;

    fn batch(timestamps: Vec<i64>, precip: Vec<Option<f64>>) -> RecordBatch {
        let schema = Schema::new(vec![
            Field::new("timestamp", DataType::Int64, false),
            Field::new("precip", DataType::Float64, true),
        ]);
        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(Int64Array::from(timestamps)),
                Arc::new(Float64Array::from(precip)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn validate_schema_ok() {
        let b = batch(vec![0, 600], vec![Some(0.0), Some(1.0)]);
        assert!(validate_schema(&b).is_ok());
    }

    #[test]
    fn validate_schema_wrong_column_count() {
        let schema = Schema::new(vec![Field::new("timestamp", DataType::Int64, false)]);
        let b = RecordBatch::try_new(
            Arc::new(schema),
            vec![Arc::new(Int64Array::from(vec![0i64]))],
        )
        .unwrap();

        match validate_schema(&b).unwrap_err() {
            IoError::Validation { details, .. } => {
                assert!(details.contains("expected 2 columns, got 1"));
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn validate_schema_reports_all_mismatches() {
        let schema = Schema::new(vec![
            Field::new("time", DataType::Int32, false),
            Field::new("rain", DataType::Float64, false),
        ]);
        let b = RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(Int32Array::from(vec![0])),
                Arc::new(Float64Array::from(vec![0.5])),
            ],
        )
        .unwrap();

        match validate_schema(&b).unwrap_err() {
            IoError::Validation { count, details } => {
                assert_eq!(count, 3);
                assert!(details.contains("'time'"));
                assert!(details.contains("Int32"));
                assert!(details.contains("'rain'"));
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn validate_schema_rejects_nulls() {
        let b = batch(vec![0, 600], vec![Some(0.0), None]);
        match validate_schema(&b).unwrap_err() {
            IoError::Validation { details, .. } => {
                assert_eq!(details, "precip has 1 null(s)");
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn records_across_batches() {
        let b0 = batch(vec![0, 600], vec![Some(0.0), Some(1.0)]);
        let b1 = batch(vec![1200], vec![Some(2.5)]);
        let records = batches_to_records(&[b0, b1]).unwrap();

        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], (epoch, 0.0));
        assert_eq!(records[2].0, epoch + chrono::TimeDelta::minutes(20));
        assert_eq!(records[2].1, 2.5);
    }

    #[test]
    fn out_of_range_timestamp() {
        let b = batch(vec![i64::MAX], vec![Some(1.0)]);
        assert!(matches!(
            batches_to_records(&[b]).unwrap_err(),
            IoError::InvalidTime { .. }
        ));
    }

    #[test]
    fn stored_step_lookup() {
        let kv = |v: &str| vec![KeyValue::new(STEP_KEY.to_string(), v.to_string())];
        assert_eq!(stored_step(Some(&kv("3600"))), Some(chrono::TimeDelta::hours(1)));
        assert_eq!(stored_step(Some(&kv("0"))), None);
        assert_eq!(stored_step(Some(&kv("hourly"))), None);
        assert_eq!(stored_step(None), None);
    }

    #[test]
    fn read_batches_file_not_found() {
        let result = read_batches(Path::new("/nonexistent/path/file.parquet"));
        match result.err().unwrap() {
            IoError::FileNotFound { path } => {
                assert_eq!(path.to_str().unwrap(), "/nonexistent/path/file.parquet");
            }
            other => panic!("expected FileNotFound error, got {other:?}"),
        }
    }
}
