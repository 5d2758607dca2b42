//! Integration tests: round-trip series and parameters through files.

use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, RecordBatch};
use arrow::datatypes::{DataType, Field, Schema};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use parquet::arrow::ArrowWriter;
use pluvio_io::{
    Compression, IoError, ReaderConfig, WriterConfig, load_parameters, read_series,
    save_parameters, write_series,
};
use pluvio_model::Parameters;
use pluvio_series::{SeriesError, TimeSeries};

fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 7, 14)
        .unwrap()
        .and_hms_opt(6, 0, 0)
        .unwrap()
}

fn sample_series(n: usize) -> TimeSeries {
    let values = (0..n).map(|i| ((i * 7) % 5) as f64 * 0.4).collect();
    TimeSeries::new(t0(), TimeDelta::minutes(10), values).unwrap()
}

/// Writes raw `(epoch seconds, precip)` rows without going through the series type.
fn write_raw(path: &std::path::Path, timestamps: Vec<i64>, precip: Vec<f64>) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("timestamp", DataType::Int64, false),
        Field::new("precip", DataType::Float64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(timestamps)),
            Arc::new(Float64Array::from(precip)),
        ],
    )
    .unwrap();
    let file = std::fs::File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
}

#[test]
fn series_roundtrip_all_compressions() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let series = sample_series(500);

    for compression in [Compression::None, Compression::Snappy, Compression::Zstd] {
        let path = dir.path().join(format!("series_{compression:?}.parquet"));
        let config = WriterConfig::new().with_compression(compression);
        write_series(&path, &series, &config).unwrap();

        let back = read_series(&path, &ReaderConfig::new()).unwrap();
        assert_eq!(back, series, "{compression:?}");
    }
}

#[test]
fn series_roundtrip_daily_row_groups() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("groups.parquet");
    let series = sample_series(250);

    let config = WriterConfig::new().with_group_days(1);
    write_series(&path, &series, &config).unwrap();

    let file = std::fs::File::open(&path).unwrap();
    let builder =
        parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
    assert_eq!(builder.metadata().num_row_groups(), 2);

    let back = read_series(&path, &ReaderConfig::new()).unwrap();
    assert_eq!(back.start(), t0());
    assert_eq!(back.step(), TimeDelta::minutes(10));
    assert_eq!(back.values(), series.values());
}

#[test]
fn single_row_keeps_written_step() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("one.parquet");
    write_series(&path, &sample_series(1), &WriterConfig::new()).unwrap();

    let back = read_series(&path, &ReaderConfig::new()).unwrap();
    assert_eq!(back.len(), 1);
    assert_eq!(back.step(), TimeDelta::minutes(10));

    let config = ReaderConfig::new().with_step(TimeDelta::hours(1));
    let back = read_series(&path, &config).unwrap();
    assert_eq!(back.step(), TimeDelta::hours(1));
}

#[test]
fn single_foreign_row_needs_explicit_step() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("foreign.parquet");
    write_raw(&path, vec![3600], vec![2.0]);

    let err = read_series(&path, &ReaderConfig::new()).unwrap_err();
    assert!(matches!(err, IoError::Validation { .. }), "got {err:?}");

    let config = ReaderConfig::new().with_step(TimeDelta::hours(1));
    let back = read_series(&path, &config).unwrap();
    assert_eq!(back.len(), 1);
    assert_eq!(back.total(), 2.0);
}

#[test]
fn gaps_rejected_unless_filled() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("gappy.parquet");
    // 00:00, 00:10, 00:40 at a 10-minute step
    write_raw(&path, vec![0, 600, 2400], vec![1.0, 2.0, 3.0]);

    let err = read_series(&path, &ReaderConfig::new()).unwrap_err();
    assert!(
        matches!(
            err,
            IoError::Series(SeriesError::NonUniformSpacing { index: 2, .. })
        ),
        "got {err:?}"
    );

    let filled = read_series(&path, &ReaderConfig::new().with_fill_gaps(true)).unwrap();
    assert_eq!(filled.values(), &[1.0, 2.0, 0.0, 0.0, 3.0]);
    assert_eq!(filled.total(), 6.0);
}

#[test]
fn negative_depth_rejected() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("negative.parquet");
    write_raw(&path, vec![0, 600], vec![1.0, -0.5]);

    let err = read_series(&path, &ReaderConfig::new()).unwrap_err();
    assert!(
        matches!(err, IoError::Series(SeriesError::NegativeValue { index: 1, .. })),
        "got {err:?}"
    );
}

#[test]
fn missing_series_file() {
    let err = read_series(
        std::path::Path::new("/tmp/pluvio_test_nonexistent.parquet"),
        &ReaderConfig::new(),
    )
    .unwrap_err();
    assert!(matches!(err, IoError::FileNotFound { .. }));
}

#[test]
fn parameters_roundtrip_toml_and_json() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let params = Parameters::new(0.02, 4.0, 0.1, 2.0, 1.5).unwrap();

    for name in ["fit.toml", "fit.json"] {
        let path = dir.path().join(name);
        save_parameters(&path, &params).unwrap();
        let back = load_parameters(&path).unwrap();
        assert_eq!(back, params, "{name}");
    }
}

#[test]
fn parameters_invalid_document() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("bad.toml");
    std::fs::write(
        &path,
        "lambda = 0.02\nbeta = 4.0\ngamma = 0.1\neta = 2.0\nmu = -1.0\n",
    )
    .unwrap();

    let err = load_parameters(&path).unwrap_err();
    assert!(matches!(err, IoError::Model(_)), "got {err:?}");
}

#[test]
fn parameters_unknown_extension() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("fit.yaml");
    let params = Parameters::new(0.02, 4.0, 0.1, 2.0, 1.5).unwrap();

    let err = save_parameters(&path, &params).unwrap_err();
    assert!(matches!(err, IoError::UnsupportedFormat { .. }));
    assert!(!path.exists());
}
