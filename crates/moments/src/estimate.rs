//! Estimation of aggregated moments from a rainfall series.

use chrono::TimeDelta;
use pluvio_events::RainEvent;
use pluvio_series::TimeSeries;
use tracing::debug;

use crate::error::MomentError;
use crate::set::{MomentSet, ScaleMoments, check_increasing};

/// Estimates mean, variance, lag-1 autocovariance and dry fraction of
/// `series` aggregated to each of `scales`.
///
/// Each scale is split into non-overlapping blocks; a trailing incomplete
/// block is dropped.
///
/// # Errors
///
/// - [`MomentError::NoScales`] / [`MomentError::UnorderedScales`] for a bad
///   scale list.
/// - [`MomentError::Series`] if a scale is not a positive multiple of the
///   series step.
/// - [`MomentError::InsufficientData`] if any scale has fewer than two
///   complete blocks.
#[tracing::instrument(skip(series), fields(n = series.len()))]
pub fn estimate_moments(
    series: &TimeSeries,
    scales: &[TimeDelta],
) -> Result<MomentSet, MomentError> {
    check_increasing(scales.iter().copied())?;

    let mut entries = Vec::with_capacity(scales.len());
    for &scale in scales {
        let block = series.steps_in(scale)?;
        let n = series.len() / block;
        if n < 2 {
            return Err(MomentError::InsufficientData {
                scale: scale.num_seconds(),
                n,
            });
        }
        let sums = pluvio_stats::block_sums(series.values(), block);
        let moments = ScaleMoments {
            scale,
            mean: pluvio_stats::mean(&sums),
            variance: pluvio_stats::variance(&sums),
            lag1_autocovariance: pluvio_stats::autocovariance(&sums, 1),
            dry_probability: pluvio_stats::zero_fraction(&sums),
            n_intervals: n,
        };
        debug!(
            scale_s = scale.num_seconds(),
            mean = moments.mean,
            variance = moments.variance,
            lag1 = moments.lag1_autocovariance,
            p_dry = moments.dry_probability,
            "scale moments"
        );
        entries.push(moments);
    }
    MomentSet::new(entries)
}

/// Like [`estimate_moments`], but only rain inside `events` contributes.
///
/// Samples outside every event are treated as dry, so isolated wet
/// samples that did not form a qualifying event do not bias the statistics.
///
/// # Errors
///
/// See [`estimate_moments`].
pub fn estimate_event_moments(
    series: &TimeSeries,
    events: &[RainEvent],
    scales: &[TimeDelta],
) -> Result<MomentSet, MomentError> {
    let masked = series.masked(events.iter().map(RainEvent::range));
    estimate_moments(&masked, scales)
}
