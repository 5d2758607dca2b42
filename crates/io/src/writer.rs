//! Series output: compression, row-group layout and step metadata.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use chrono::TimeDelta;
use parquet::arrow::ArrowWriter;
use parquet::basic::ZstdLevel;
use parquet::file::metadata::KeyValue;
use parquet::file::properties::WriterProperties;
use pluvio_series::TimeSeries;
use tracing::debug;

use crate::error::IoError;
use crate::parquet_write::{self, STEP_KEY};

const SECONDS_PER_DAY: i64 = 86_400;

/// Compression codec for series files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// Uncompressed pages.
    None,
    /// Snappy.
    #[default]
    Snappy,
    /// Zstd at level 3.
    Zstd,
}

impl Compression {
    fn codec(self) -> Result<parquet::basic::Compression, IoError> {
        Ok(match self {
            Self::None => parquet::basic::Compression::UNCOMPRESSED,
            Self::Snappy => parquet::basic::Compression::SNAPPY,
            Self::Zstd => parquet::basic::Compression::ZSTD(ZstdLevel::try_new(3)?),
        })
    }
}

impl FromStr for Compression {
    type Err = IoError;

    /// Parses `none`, `snappy` or `zstd`, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "snappy" => Ok(Self::Snappy),
            "zstd" => Ok(Self::Zstd),
            other => Err(IoError::Validation {
                count: 1,
                details: format!("unknown compression {other:?} (expected none, snappy or zstd)"),
            }),
        }
    }
}

/// How a rainfall series is laid out on disk.
///
/// Row groups cover a fixed number of days whatever the sampling step, so a
/// 10-minute record and an hourly record of the same period split at the
/// same dates.
///
/// # Example
///
/// ```
/// use pluvio_io::{Compression, WriterConfig};
///
/// let config = WriterConfig::new()
///     .with_compression(Compression::Zstd)
///     .with_group_days(30);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct WriterConfig {
    compression: Compression,
    group_days: u32,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::default(),
            group_days: 365,
        }
    }
}

impl WriterConfig {
    /// Snappy compression with one row group per 365 days.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression codec.
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Sets the number of days stored per row group.
    pub fn with_group_days(mut self, days: u32) -> Self {
        self.group_days = days;
        self
    }

    /// Returns the compression codec.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Returns the number of days per row group.
    pub fn group_days(&self) -> u32 {
        self.group_days
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if `group_days` is zero.
    pub fn validate(&self) -> Result<(), IoError> {
        if self.group_days == 0 {
            return Err(IoError::Validation {
                count: 1,
                details: "group_days must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Rows per row group for a series sampled every `step`; at least one.
    fn rows_per_group(&self, step: TimeDelta) -> usize {
        let step_s = step.num_seconds().max(1);
        let span_s = i64::from(self.group_days) * SECONDS_PER_DAY;
        usize::try_from(span_s / step_s).unwrap_or(usize::MAX).max(1)
    }
}

/// Writes a rainfall series to Parquet with `timestamp` (epoch seconds,
/// UTC) and `precip` columns.
///
/// The sampling step is stored in the file metadata, so a series of a single
/// row reads back with its step.
///
/// # Errors
///
/// Returns [`IoError::Validation`] if the configuration is invalid,
/// [`IoError::File`] if the file cannot be created, or [`IoError::Parquet`]
/// if encoding fails.
#[tracing::instrument(skip(series, config), fields(n = series.len()))]
pub fn write_series(path: &Path, series: &TimeSeries, config: &WriterConfig) -> Result<(), IoError> {
    config.validate()?;

    let rows_per_group = config.rows_per_group(series.step());
    let props = WriterProperties::builder()
        .set_compression(config.compression.codec()?)
        .set_max_row_group_size(rows_per_group)
        .set_key_value_metadata(Some(vec![KeyValue::new(
            STEP_KEY.to_string(),
            series.step().num_seconds().to_string(),
        )]))
        .build();

    let schema = Arc::new(parquet_write::build_schema());
    let batch = parquet_write::series_to_record_batch(series, &schema)?;

    let file = std::fs::File::create(path).map_err(|e| IoError::File {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    debug!(path = %path.display(), rows_per_group, "series written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_per_group_follows_step() {
        let config = WriterConfig::new().with_group_days(2);
        assert_eq!(config.rows_per_group(TimeDelta::hours(1)), 48);
        assert_eq!(config.rows_per_group(TimeDelta::minutes(10)), 288);
        assert_eq!(config.rows_per_group(TimeDelta::days(7)), 1);
    }

    #[test]
    fn compression_from_str() {
        assert_eq!("ZSTD".parse::<Compression>().unwrap(), Compression::Zstd);
        assert_eq!("none".parse::<Compression>().unwrap(), Compression::None);
        let err = "gzip".parse::<Compression>().unwrap_err();
        assert!(err.to_string().contains("gzip"), "{err}");
    }

    #[test]
    fn zero_group_days_rejected() {
        let err = WriterConfig::new().with_group_days(0).validate().unwrap_err();
        assert!(matches!(err, IoError::Validation { count: 1, .. }));
    }
}
