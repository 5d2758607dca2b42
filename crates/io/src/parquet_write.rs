//! Column layout of series files.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, RecordBatch};
use arrow::datatypes::{DataType, Field, Schema};
use pluvio_series::TimeSeries;

use crate::error::IoError;

/// Name of the epoch-seconds timestamp column.
pub(crate) const TIMESTAMP_COLUMN: &str = "timestamp";

/// Name of the per-step depth column.
pub(crate) const PRECIP_COLUMN: &str = "precip";

/// File metadata key holding the sampling step in seconds.
pub(crate) const STEP_KEY: &str = "pluvio.step_seconds";

/// Builds the Arrow schema for a rainfall series: `timestamp` (Int64,
/// seconds since the Unix epoch, UTC) followed by `precip` (Float64).
pub(crate) fn build_schema() -> Schema {
    Schema::new(vec![
        Field::new(TIMESTAMP_COLUMN, DataType::Int64, false),
        Field::new(PRECIP_COLUMN, DataType::Float64, false),
    ])
}

/// Converts a [`TimeSeries`] into a single Arrow [`RecordBatch`].
pub(crate) fn series_to_record_batch(
    series: &TimeSeries,
    schema: &Schema,
) -> Result<RecordBatch, IoError> {
    let timestamps: Vec<i64> = series
        .iter()
        .map(|(t, _)| t.and_utc().timestamp())
        .collect();

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(timestamps)),
        Arc::new(Float64Array::from(series.values().to_vec())),
    ];

    Ok(RecordBatch::try_new(Arc::new(schema.clone()), columns)?)
}

#[cfg(test)]
mod tests {
    use arrow::array::AsArray;
    use arrow::datatypes::{Float64Type, Int64Type};
    use chrono::{NaiveDate, TimeDelta};

    use super::*;

    #[test]
    fn schema_columns() {
        let schema = build_schema();
        assert_eq!(schema.fields().len(), 2);
        assert_eq!(schema.field(0).name(), "timestamp");
        assert_eq!(schema.field(0).data_type(), &DataType::Int64);
        assert_eq!(schema.field(1).name(), "precip");
        assert_eq!(schema.field(1).data_type(), &DataType::Float64);
    }

    #[test]
    fn record_batch_uses_epoch_seconds() {
        let t0 = NaiveDate::from_ymd_opt(1970, 1, 1)
            .unwrap()
            .and_hms_opt(1, 0, 0)
            .unwrap();
        let series = TimeSeries::new(t0, TimeDelta::minutes(10), vec![0.0, 1.5, 0.2]).unwrap();

        let batch = series_to_record_batch(&series, &build_schema()).unwrap();
        assert_eq!(batch.num_rows(), 3);

        let ts = batch.column(0).as_primitive::<Int64Type>();
        assert_eq!(ts.values().to_vec(), vec![3600, 4200, 4800]);
        let precip = batch.column(1).as_primitive::<Float64Type>();
        assert_eq!(precip.values().to_vec(), vec![0.0, 1.5, 0.2]);
    }
}
