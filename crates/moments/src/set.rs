//! Per-scale moment records and the ordered set that holds them.

use std::collections::BTreeMap;

use chrono::TimeDelta;

use crate::error::MomentError;

/// Statistics of a series aggregated to one time scale.
///
/// Variance and autocovariance use the population convention (divide by
/// `n_intervals`).
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleMoments {
    /// Aggregation scale.
    pub scale: TimeDelta,
    /// Mean depth per interval.
    pub mean: f64,
    /// Population variance of interval depths.
    pub variance: f64,
    /// Lag-1 autocovariance of interval depths.
    pub lag1_autocovariance: f64,
    /// Fraction of intervals with zero depth.
    pub dry_probability: f64,
    /// Number of complete intervals the statistics were computed from.
    pub n_intervals: usize,
}

impl ScaleMoments {
    /// Returns the scale in hours.
    pub fn scale_hours(&self) -> f64 {
        self.scale.num_seconds() as f64 / 3600.0
    }

    /// Returns true when the mean and variance are both positive.
    pub fn is_informative(&self) -> bool {
        self.mean > 0.0 && self.variance > 0.0
    }
}

/// Moments at several scales, ordered by increasing scale.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MomentSet {
    by_scale: BTreeMap<TimeDelta, ScaleMoments>,
}

impl MomentSet {
    /// Builds a set from per-scale records given in strictly increasing
    /// scale order.
    ///
    /// # Errors
    ///
    /// Returns [`MomentError::NoScales`] for an empty list and
    /// [`MomentError::UnorderedScales`] if scales are not strictly increasing.
    pub fn new(entries: Vec<ScaleMoments>) -> Result<Self, MomentError> {
        check_increasing(entries.iter().map(|m| m.scale))?;
        Ok(Self {
            by_scale: entries.into_iter().map(|m| (m.scale, m)).collect(),
        })
    }

    /// Returns the moments at `scale`, if present.
    pub fn get(&self, scale: TimeDelta) -> Option<&ScaleMoments> {
        self.by_scale.get(&scale)
    }

    /// Iterates over the records in increasing scale order.
    pub fn iter(&self) -> impl Iterator<Item = &ScaleMoments> {
        self.by_scale.values()
    }

    /// Returns the scales in increasing order.
    pub fn scales(&self) -> Vec<TimeDelta> {
        self.by_scale.keys().copied().collect()
    }

    /// Returns the number of scales.
    pub fn len(&self) -> usize {
        self.by_scale.len()
    }

    /// Returns true if the set holds no scales.
    pub fn is_empty(&self) -> bool {
        self.by_scale.is_empty()
    }

    /// Returns the smallest scale's record.
    pub fn finest(&self) -> Option<&ScaleMoments> {
        self.by_scale.values().next()
    }
}

pub(crate) fn check_increasing<I>(scales: I) -> Result<(), MomentError>
where
    I: IntoIterator<Item = TimeDelta>,
{
    let mut previous: Option<TimeDelta> = None;
    let mut count = 0;
    for (index, scale) in scales.into_iter().enumerate() {
        if let Some(prev) = previous
            && scale <= prev
        {
            return Err(MomentError::UnorderedScales {
                index,
                scale: scale.num_seconds(),
                previous: prev.num_seconds(),
            });
        }
        previous = Some(scale);
        count += 1;
    }
    if count == 0 {
        return Err(MomentError::NoScales);
    }
    Ok(())
}
