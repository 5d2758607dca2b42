//! Segmentation of a rainfall series into discrete events.

use std::ops::Range;

use chrono::{NaiveDateTime, TimeDelta};
use pluvio_series::TimeSeries;
use tracing::debug;

use crate::config::EventConfig;
use crate::error::EventError;

/// A contiguous rain event bounded by qualifying dry spells.
#[derive(Clone, Debug, PartialEq)]
pub struct RainEvent {
    range: Range<usize>,
    start: NaiveDateTime,
    end: NaiveDateTime,
    step: TimeDelta,
    volume: f64,
    peak: f64,
}

impl RainEvent {
    /// Returns the half-open index range of the event in its series.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Returns the start of the first wet step.
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Returns the exclusive end of the last wet step.
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Returns the number of sampling steps spanned by the event.
    pub fn n_steps(&self) -> usize {
        self.range.len()
    }

    /// Returns the event duration.
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Returns the event duration in hours.
    pub fn duration_hours(&self) -> f64 {
        self.duration().num_seconds() as f64 / 3600.0
    }

    /// Returns the sampling step of the parent series.
    pub fn step(&self) -> TimeDelta {
        self.step
    }

    /// Returns the total depth of the event.
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Returns the largest single-step depth within the event.
    pub fn peak(&self) -> f64 {
        self.peak
    }
}

/// Converts a gap duration into a whole number of sampling steps, rounding up.
pub(crate) fn gap_steps(gap: TimeDelta, step: TimeDelta) -> Result<usize, EventError> {
    let gap_s = gap.num_seconds();
    let step_s = step.num_seconds();
    if gap_s < step_s {
        return Err(EventError::GapTooShort {
            gap: gap_s,
            step: step_s,
        });
    }
    Ok((gap_s as u64).div_ceil(step_s as u64) as usize)
}

/// Lazy, chronological iterator over the rain events of a series.
///
/// Clone the iterator before consuming it to walk the same events again.
#[derive(Clone, Debug)]
pub struct EventIter<'a> {
    series: &'a TimeSeries,
    gap_steps: usize,
    wet_threshold: f64,
    pos: usize,
    dry_run: usize,
}

impl Iterator for EventIter<'_> {
    type Item = RainEvent;

    fn next(&mut self) -> Option<RainEvent> {
        let values = self.series.values();
        let mut open: Option<(usize, usize, bool)> = None;

        while self.pos < values.len() {
            let i = self.pos;
            self.pos += 1;

            if values[i] > self.wet_threshold {
                match open.as_mut() {
                    Some((_, last_wet, _)) => *last_wet = i,
                    None => open = Some((i, i, self.dry_run >= self.gap_steps)),
                }
                self.dry_run = 0;
                continue;
            }

            self.dry_run += 1;
            if self.dry_run >= self.gap_steps
                && let Some((first, last_wet, preceded)) = open.take()
            {
                if preceded {
                    return Some(self.build(first..last_wet + 1));
                }
                debug!(start = first, "discarding event without a leading dry spell");
            }
        }

        if let Some((first, _, _)) = open {
            debug!(start = first, "discarding event still open at series end");
        }
        None
    }
}

impl EventIter<'_> {
    fn build(&self, range: Range<usize>) -> RainEvent {
        let slice = &self.series.values()[range.clone()];
        RainEvent {
            start: self.series.timestamp(range.start),
            end: self.series.timestamp(range.end),
            step: self.series.step(),
            volume: slice.iter().sum(),
            peak: slice.iter().copied().fold(0.0, f64::max),
            range,
        }
    }
}

/// Returns a lazy iterator over the rain events of `series`.
///
/// An event is a run of wet samples (depth above the configured threshold)
/// in which no dry run reaches `inter_event_gap`. It is yielded only when
/// it is both preceded and followed by a dry spell of at least
/// `inter_event_gap`; events touching the series start (unless configured
/// otherwise) or still open at the series end are dropped.
///
/// # Errors
///
/// Returns [`EventError::GapTooShort`] if `inter_event_gap` is shorter than
/// the sampling step, or [`EventError::InvalidThreshold`] for a bad config.
pub fn events_iter<'a>(
    series: &'a TimeSeries,
    inter_event_gap: TimeDelta,
    config: &EventConfig,
) -> Result<EventIter<'a>, EventError> {
    config.validate()?;
    let gap_steps = gap_steps(inter_event_gap, series.step())?;
    let dry_run = if config.assume_dry_before_start() {
        gap_steps
    } else {
        0
    };
    Ok(EventIter {
        series,
        gap_steps,
        wet_threshold: config.wet_threshold(),
        pos: 0,
        dry_run,
    })
}

/// Extracts all rain events of `series` in chronological order.
///
/// Returns an empty vector when no event qualifies.
///
/// # Errors
///
/// See [`events_iter`].
#[tracing::instrument(skip(series, config), fields(n = series.len()))]
pub fn extract_events(
    series: &TimeSeries,
    inter_event_gap: TimeDelta,
    config: &EventConfig,
) -> Result<Vec<RainEvent>, EventError> {
    let events: Vec<RainEvent> = events_iter(series, inter_event_gap, config)?.collect();
    debug!(n_events = events.len(), "events extracted");
    Ok(events)
}
