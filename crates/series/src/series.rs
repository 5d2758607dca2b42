//! Uniformly sampled, non-negative rainfall series.

use chrono::{NaiveDateTime, TimeDelta};

use crate::error::SeriesError;

/// Number of seconds in one hour, the time unit of the rainfall model.
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Returns `n · step`, saturating at [`TimeDelta::MAX`].
fn span_of(step: TimeDelta, n: usize) -> TimeDelta {
    i64::try_from(n)
        .ok()
        .and_then(|n| step.num_milliseconds().checked_mul(n))
        .and_then(TimeDelta::try_milliseconds)
        .unwrap_or(TimeDelta::MAX)
}

/// A rainfall series sampled at a fixed step.
///
/// Timestamps are implicit: sample `i` covers `[start + i·step, start + (i+1)·step)`.
/// Values are depths accumulated over each step (e.g. mm per 10 minutes)
/// and are always finite and non-negative.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeSeries {
    start: NaiveDateTime,
    step: TimeDelta,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Creates a series from a start time, step, and values.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::NonPositiveStep`] for a zero or negative step,
    /// [`SeriesError::NonFiniteValue`] or [`SeriesError::NegativeValue`] for
    /// an invalid sample.
    pub fn new(
        start: NaiveDateTime,
        step: TimeDelta,
        values: Vec<f64>,
    ) -> Result<Self, SeriesError> {
        validate_step(step)?;
        validate_values(&values)?;
        Ok(Self {
            start,
            step,
            values,
        })
    }

    /// Creates an all-zero series of `n` samples.
    pub fn zeros(start: NaiveDateTime, step: TimeDelta, n: usize) -> Result<Self, SeriesError> {
        Self::new(start, step, vec![0.0; n])
    }

    /// Builds a series from explicit `(timestamp, value)` records.
    ///
    /// Records must be exactly one `step` apart; gaps are rejected rather
    /// than silently skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::EmptyData`] for no records and
    /// [`SeriesError::NonUniformSpacing`] for any spacing other than `step`.
    pub fn from_records(
        records: &[(NaiveDateTime, f64)],
        step: TimeDelta,
    ) -> Result<Self, SeriesError> {
        validate_step(step)?;
        let (first, _) = records.first().ok_or(SeriesError::EmptyData)?;
        for (i, pair) in records.windows(2).enumerate() {
            let got = (pair[1].0 - pair[0].0).num_seconds();
            if got != step.num_seconds() {
                return Err(SeriesError::NonUniformSpacing {
                    index: i + 1,
                    expected: step.num_seconds(),
                    got,
                });
            }
        }
        Self::new(*first, step, records.iter().map(|&(_, v)| v).collect())
    }

    /// Builds a series from records, filling missing steps with explicit zeros.
    ///
    /// Timestamps must be strictly increasing and every spacing must be a
    /// whole number of steps.
    pub fn from_records_zero_filled(
        records: &[(NaiveDateTime, f64)],
        step: TimeDelta,
    ) -> Result<Self, SeriesError> {
        validate_step(step)?;
        let (first, _) = records.first().ok_or(SeriesError::EmptyData)?;
        let step_s = step.num_seconds();
        let mut values = Vec::with_capacity(records.len());
        values.push(records[0].1);
        for (i, pair) in records.windows(2).enumerate() {
            let got = (pair[1].0 - pair[0].0).num_seconds();
            if got <= 0 || got % step_s != 0 {
                return Err(SeriesError::NonUniformSpacing {
                    index: i + 1,
                    expected: step_s,
                    got,
                });
            }
            let missing = (got / step_s - 1) as usize;
            values.extend(std::iter::repeat_n(0.0, missing));
            values.push(pair[1].1);
        }
        Self::new(*first, step, values)
    }

    /// Returns the timestamp of the first sample.
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Returns the sampling step.
    pub fn step(&self) -> TimeDelta {
        self.step
    }

    /// Returns the sampling step in hours.
    pub fn step_hours(&self) -> f64 {
        self.step.num_seconds() as f64 / SECONDS_PER_HOUR
    }

    /// Returns the sample values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Consumes the series and returns its values.
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the series holds no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the start timestamp of sample `index`.
    pub fn timestamp(&self, index: usize) -> NaiveDateTime {
        self.start + span_of(self.step, index)
    }

    /// Returns the exclusive end of the covered period.
    pub fn end(&self) -> NaiveDateTime {
        self.timestamp(self.values.len())
    }

    /// Returns the covered duration (`len · step`).
    pub fn duration(&self) -> TimeDelta {
        span_of(self.step, self.values.len())
    }

    /// Iterates over `(timestamp, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &v)| (self.timestamp(i), v))
    }

    /// Returns the sum of all values.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Returns how many whole steps make up `span`.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::NotAMultiple`] unless `span` is a positive
    /// integer multiple of the step.
    pub fn steps_in(&self, span: TimeDelta) -> Result<usize, SeriesError> {
        steps_in(span, self.step)
    }

    /// Aggregates into non-overlapping sums of `block` samples.
    ///
    /// The trailing incomplete block is dropped.
    pub fn aggregate(&self, block: usize) -> Result<Self, SeriesError> {
        if block == 0 {
            return Err(SeriesError::NotAMultiple {
                span: 0,
                step: self.step.num_seconds(),
            });
        }
        Self::new(
            self.start,
            span_of(self.step, block),
            pluvio_stats::block_sums(&self.values, block),
        )
    }

    /// Aggregates to a coarser step that must be a multiple of the current one.
    pub fn aggregate_to(&self, step: TimeDelta) -> Result<Self, SeriesError> {
        self.aggregate(self.steps_in(step)?)
    }

    /// Returns a copy with every value outside `keep` set to zero.
    ///
    /// `keep` yields half-open index ranges into the series.
    pub fn masked<I>(&self, keep: I) -> Self
    where
        I: IntoIterator<Item = std::ops::Range<usize>>,
    {
        let mut values = vec![0.0; self.values.len()];
        for range in keep {
            let end = range.end.min(self.values.len());
            let start = range.start.min(end);
            values[start..end].copy_from_slice(&self.values[start..end]);
        }
        Self {
            start: self.start,
            step: self.step,
            values,
        }
    }
}

/// Returns how many whole `step`s make up `span`.
///
/// # Errors
///
/// Returns [`SeriesError::NotAMultiple`] unless `span` is a positive integer
/// multiple of `step`.
pub fn steps_in(span: TimeDelta, step: TimeDelta) -> Result<usize, SeriesError> {
    let span_s = span.num_seconds();
    let step_s = step.num_seconds();
    if step_s <= 0 {
        return Err(SeriesError::NonPositiveStep { seconds: step_s });
    }
    if span_s <= 0 || span_s % step_s != 0 {
        return Err(SeriesError::NotAMultiple {
            span: span_s,
            step: step_s,
        });
    }
    Ok((span_s / step_s) as usize)
}

fn validate_step(step: TimeDelta) -> Result<(), SeriesError> {
    if step.num_seconds() <= 0 {
        return Err(SeriesError::NonPositiveStep {
            seconds: step.num_seconds(),
        });
    }
    Ok(())
}

fn validate_values(values: &[f64]) -> Result<(), SeriesError> {
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(SeriesError::NonFiniteValue { index });
        }
        if value < 0.0 {
            return Err(SeriesError::NegativeValue { index, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn ten_min() -> TimeDelta {
        TimeDelta::minutes(10)
    }

    #[test]
    fn offsets_beyond_i32_range() {
        let s = TimeSeries::new(t0(), TimeDelta::seconds(1), vec![1.0]).unwrap();
        let index = 3_000_000_000usize;
        assert_eq!(s.timestamp(index), t0() + TimeDelta::seconds(3_000_000_000));
        assert_eq!(span_of(TimeDelta::seconds(1), index).num_seconds(), 3_000_000_000);
        assert_eq!(span_of(TimeDelta::days(1), usize::MAX), TimeDelta::MAX);
    }

    #[test]
    fn new_accepts_valid() {
        let s = TimeSeries::new(t0(), ten_min(), vec![0.0, 1.0, 2.5]).unwrap();
        assert_eq!(s.len(), 3);
        assert!(!s.is_empty());
        assert_relative_eq!(s.total(), 3.5);
        assert_relative_eq!(s.step_hours(), 1.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn new_rejects_negative() {
        let err = TimeSeries::new(t0(), ten_min(), vec![0.0, -1.0]).unwrap_err();
        assert_eq!(
            err,
            SeriesError::NegativeValue {
                index: 1,
                value: -1.0
            }
        );
    }

    #[test]
    fn new_rejects_nan() {
        let err = TimeSeries::new(t0(), ten_min(), vec![f64::NAN]).unwrap_err();
        assert_eq!(err, SeriesError::NonFiniteValue { index: 0 });
    }

    #[test]
    fn new_rejects_zero_step() {
        let err = TimeSeries::new(t0(), TimeDelta::zero(), vec![1.0]).unwrap_err();
        assert_eq!(err, SeriesError::NonPositiveStep { seconds: 0 });
    }

    #[test]
    fn timestamps_are_uniform() {
        let s = TimeSeries::zeros(t0(), ten_min(), 4).unwrap();
        assert_eq!(s.timestamp(3) - s.timestamp(2), ten_min());
        assert_eq!(s.end(), t0() + TimeDelta::minutes(40));
        assert_eq!(s.duration(), TimeDelta::minutes(40));
        let stamps: Vec<_> = s.iter().map(|(t, _)| t).collect();
        assert_eq!(stamps.len(), 4);
        assert_eq!(stamps[1], t0() + ten_min());
    }

    #[test]
    fn from_records_uniform() {
        let recs = vec![(t0(), 1.0), (t0() + ten_min(), 2.0)];
        let s = TimeSeries::from_records(&recs, ten_min()).unwrap();
        assert_eq!(s.values(), &[1.0, 2.0]);
        assert_eq!(s.start(), t0());
    }

    #[test]
    fn from_records_rejects_gap() {
        let recs = vec![(t0(), 1.0), (t0() + TimeDelta::minutes(30), 2.0)];
        let err = TimeSeries::from_records(&recs, ten_min()).unwrap_err();
        assert_eq!(
            err,
            SeriesError::NonUniformSpacing {
                index: 1,
                expected: 600,
                got: 1800
            }
        );
    }

    #[test]
    fn from_records_empty() {
        assert_eq!(
            TimeSeries::from_records(&[], ten_min()).unwrap_err(),
            SeriesError::EmptyData
        );
    }

    #[test]
    fn zero_filled_inserts_explicit_zeros() {
        let recs = vec![(t0(), 1.0), (t0() + TimeDelta::minutes(30), 2.0)];
        let s = TimeSeries::from_records_zero_filled(&recs, ten_min()).unwrap();
        assert_eq!(s.values(), &[1.0, 0.0, 0.0, 2.0]);
    }

    #[test]
    fn zero_filled_rejects_off_grid() {
        let recs = vec![(t0(), 1.0), (t0() + TimeDelta::minutes(15), 2.0)];
        assert!(TimeSeries::from_records_zero_filled(&recs, ten_min()).is_err());
    }

    #[test]
    fn zero_filled_rejects_unordered() {
        let recs = vec![(t0() + ten_min(), 1.0), (t0(), 2.0)];
        assert!(TimeSeries::from_records_zero_filled(&recs, ten_min()).is_err());
    }

    #[test]
    fn steps_in_multiple() {
        let s = TimeSeries::zeros(t0(), ten_min(), 1).unwrap();
        assert_eq!(s.steps_in(TimeDelta::hours(1)).unwrap(), 6);
        assert!(s.steps_in(TimeDelta::minutes(15)).is_err());
        assert!(s.steps_in(TimeDelta::zero()).is_err());
    }

    #[test]
    fn aggregate_sums_blocks() {
        let s = TimeSeries::new(t0(), ten_min(), vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let agg = s.aggregate_to(TimeDelta::minutes(20)).unwrap();
        assert_eq!(agg.values(), &[3.0, 7.0]);
        assert_eq!(agg.step(), TimeDelta::minutes(20));
        assert_eq!(agg.start(), t0());
    }

    #[test]
    fn aggregate_zero_block_is_error() {
        let s = TimeSeries::zeros(t0(), ten_min(), 3).unwrap();
        assert!(s.aggregate(0).is_err());
    }

    #[test]
    fn masked_keeps_only_ranges() {
        let s = TimeSeries::new(t0(), ten_min(), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let m = s.masked([1..2, 3..10]);
        assert_eq!(m.values(), &[0.0, 2.0, 0.0, 4.0]);
    }
}
