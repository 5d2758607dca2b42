//! Descriptive statistics over a set of extracted events.

use chrono::TimeDelta;
use pluvio_series::TimeSeries;

use crate::error::EventError;
use crate::extract::{RainEvent, gap_steps};

/// Aggregate statistics of the events found in one series.
///
/// Durations are in hours. Pulses are wet runs within an event separated
/// by dry runs of at least the intra-event gap.
#[derive(Clone, Debug, PartialEq)]
pub struct EventSummary {
    n_events: usize,
    record_hours: f64,
    mean_duration_hours: f64,
    mean_volume: f64,
    mean_pulses_per_event: f64,
    mean_pulse_duration_hours: f64,
}

impl EventSummary {
    /// Returns the number of events summarised.
    pub fn n_events(&self) -> usize {
        self.n_events
    }

    /// Returns the length of the source record in hours.
    pub fn record_hours(&self) -> f64 {
        self.record_hours
    }

    /// Returns the event rate (events per hour of record).
    pub fn events_per_hour(&self) -> f64 {
        self.n_events as f64 / self.record_hours
    }

    /// Returns the mean event duration in hours.
    pub fn mean_duration_hours(&self) -> f64 {
        self.mean_duration_hours
    }

    /// Returns the mean event depth.
    pub fn mean_volume(&self) -> f64 {
        self.mean_volume
    }

    /// Returns the mean number of pulses per event (always >= 1).
    pub fn mean_pulses_per_event(&self) -> f64 {
        self.mean_pulses_per_event
    }

    /// Returns the mean pulse duration in hours.
    pub fn mean_pulse_duration_hours(&self) -> f64 {
        self.mean_pulse_duration_hours
    }
}

/// Summarises `events` extracted from `series`.
///
/// # Errors
///
/// Returns [`EventError::NoEvents`] for an empty event list and
/// [`EventError::GapTooShort`] if `intra_event_gap` is shorter than the step.
pub fn summarize_events(
    series: &TimeSeries,
    events: &[RainEvent],
    intra_event_gap: TimeDelta,
    wet_threshold: f64,
) -> Result<EventSummary, EventError> {
    if events.is_empty() {
        return Err(EventError::NoEvents);
    }
    let gap = gap_steps(intra_event_gap, series.step())?;
    let step_h = series.step_hours();

    let mut pulse_counts = Vec::with_capacity(events.len());
    let mut pulse_durations = Vec::new();
    for event in events {
        let pulses = pulse_lengths(&series.values()[event.range()], gap, wet_threshold);
        pulse_counts.push(pulses.len().max(1) as f64);
        pulse_durations.extend(pulses.iter().map(|&n| n as f64 * step_h));
    }

    let durations: Vec<f64> = events.iter().map(RainEvent::duration_hours).collect();
    let volumes: Vec<f64> = events.iter().map(RainEvent::volume).collect();

    Ok(EventSummary {
        n_events: events.len(),
        record_hours: series.len() as f64 * step_h,
        mean_duration_hours: pluvio_stats::mean(&durations),
        mean_volume: pluvio_stats::mean(&volumes),
        mean_pulses_per_event: pluvio_stats::mean(&pulse_counts),
        mean_pulse_duration_hours: if pulse_durations.is_empty() {
            step_h
        } else {
            pluvio_stats::mean(&pulse_durations)
        },
    })
}

/// Splits one event into pulses and returns each pulse's length in steps.
///
/// A pulse spans from its first to its last wet sample; dry runs shorter
/// than `gap` stay inside the pulse.
fn pulse_lengths(values: &[f64], gap: usize, wet_threshold: f64) -> Vec<usize> {
    let mut lengths = Vec::new();
    let mut current: Option<(usize, usize)> = None;
    let mut dry = 0usize;

    for (i, &v) in values.iter().enumerate() {
        if v > wet_threshold {
            current = match current {
                Some((first, _)) => Some((first, i)),
                None => Some((i, i)),
            };
            dry = 0;
        } else {
            dry += 1;
            if dry >= gap
                && let Some((first, last)) = current.take()
            {
                lengths.push(last - first + 1);
            }
        }
    }
    if let Some((first, last)) = current {
        lengths.push(last - first + 1);
    }
    lengths
}
